//! Testing utilities for Dataset Workbench workspace
//!
//! Shared fixtures and in-memory persistence backends.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::Utc;
use ds_core::{
    MetadataSink, NewDataset, NewFile, NewFolder, PersistenceError, ResourceBackend,
};
use ds_metadata::{
    FieldDefinition, MetadataDefinition, MetadataId, MetadataPayload, MetadataValue, Paged,
    RequiredForItems,
};
use ds_store::{Dataset, FileItem, Folder, ResourceId};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use ulid::Ulid;

pub fn new_id() -> ResourceId {
    ResourceId::new(Ulid::new().to_string())
}

/// `GPS` with a required `lat`, required for datasets only
pub fn gps_definition() -> MetadataDefinition {
    MetadataDefinition::new("GPS")
        .with_description("Location of the sample")
        .with_field(FieldDefinition::new("lat", "FloatField").required())
        .with_field(FieldDefinition::new("lon", "FloatField"))
        .required_for(RequiredForItems {
            datasets: true,
            files: false,
        })
}

/// Select-based definition required for files only
pub fn format_definition() -> MetadataDefinition {
    MetadataDefinition::new("Format")
        .with_field(
            FieldDefinition::new("encoding", "Select")
                .required()
                .with_options(vec![json!("csv"), json!("parquet")]),
        )
        .required_for(RequiredForItems {
            datasets: false,
            files: true,
        })
}

/// Optional definition with an unknown widget, required for both kinds
pub fn notes_definition() -> MetadataDefinition {
    MetadataDefinition::new("Notes")
        .with_field(FieldDefinition::new("text", "RichTextEditor"))
        .required_for(RequiredForItems::both())
}

pub fn definitions() -> Vec<MetadataDefinition> {
    vec![gps_definition(), format_definition(), notes_definition()]
}

pub fn definitions_page() -> Arc<Paged<MetadataDefinition>> {
    Arc::new(Paged::complete(definitions()))
}

pub fn dataset(id: &str, name: &str) -> Dataset {
    Dataset::new(id, name)
}

pub fn datasets(ids: &[&str]) -> Vec<Dataset> {
    ids.iter().map(|id| Dataset::new(*id, format!("dataset {id}"))).collect()
}

pub fn file(id: &str, dataset_id: &str) -> FileItem {
    FileItem::new(id, format!("{id}.csv"), dataset_id)
}

pub fn folder(id: &str, dataset_id: &str) -> Folder {
    Folder::new(id, format!("folder {id}"), dataset_id)
}

/// Backend keeping everything in memory
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    pub datasets: Mutex<Vec<Dataset>>,
    pub folders: Mutex<Vec<Folder>>,
    pub files: Mutex<Vec<FileItem>>,
    fail_next: Mutex<Option<PersistenceError>>,
}

impl InMemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next call fail
    pub fn fail_next(&self, error: PersistenceError) {
        *self.fail_next.lock() = Some(error);
    }

    fn check(&self) -> Result<(), PersistenceError> {
        match self.fail_next.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found(kind: &str, id: &ResourceId) -> PersistenceError {
        PersistenceError::new(format!("{kind} {id} not found"))
    }
}

#[async_trait]
impl ResourceBackend for InMemoryBackend {
    async fn create_dataset(&self, new: NewDataset) -> Result<Dataset, PersistenceError> {
        self.check()?;
        let mut dataset = Dataset::new(new_id(), new.name);
        dataset.description = new.description;
        dataset.created = Some(Utc::now());
        dataset.modified = dataset.created;
        self.datasets.lock().push(dataset.clone());
        Ok(dataset)
    }

    async fn update_dataset(&self, dataset: Dataset) -> Result<Dataset, PersistenceError> {
        self.check()?;
        let mut datasets = self.datasets.lock();
        let slot = datasets
            .iter_mut()
            .find(|d| d.id == dataset.id)
            .ok_or_else(|| Self::not_found("dataset", &dataset.id))?;
        *slot = Dataset {
            modified: Some(Utc::now()),
            ..dataset
        };
        Ok(slot.clone())
    }

    async fn delete_dataset(&self, id: &ResourceId) -> Result<Dataset, PersistenceError> {
        self.check()?;
        let mut datasets = self.datasets.lock();
        let index = datasets
            .iter()
            .position(|d| d.id == *id)
            .ok_or_else(|| Self::not_found("dataset", id))?;
        Ok(datasets.remove(index))
    }

    async fn create_folder(&self, new: NewFolder) -> Result<Folder, PersistenceError> {
        self.check()?;
        let mut folder = Folder::new(new_id(), new.name, new.dataset_id);
        folder.parent_folder = new.parent_folder;
        self.folders.lock().push(folder.clone());
        Ok(folder)
    }

    async fn delete_folder(&self, id: &ResourceId) -> Result<Folder, PersistenceError> {
        self.check()?;
        let mut folders = self.folders.lock();
        let index = folders
            .iter()
            .position(|f| f.id == *id)
            .ok_or_else(|| Self::not_found("folder", id))?;
        Ok(folders.remove(index))
    }

    async fn upload_files(
        &self,
        dataset: &ResourceId,
        files: Vec<NewFile>,
    ) -> Result<Vec<FileItem>, PersistenceError> {
        self.check()?;
        let uploaded: Vec<FileItem> = files
            .into_iter()
            .map(|new| {
                let mut item = FileItem::new(new_id(), new.name, dataset.clone());
                item.folder_id = new.folder_id;
                item.content_type = new.content_type;
                item.bytes = new.content.len() as u64;
                item
            })
            .collect();
        self.files.lock().extend(uploaded.iter().cloned());
        Ok(uploaded)
    }

    async fn delete_file(&self, id: &ResourceId) -> Result<FileItem, PersistenceError> {
        self.check()?;
        let mut files = self.files.lock();
        let index = files
            .iter()
            .position(|f| f.id == *id)
            .ok_or_else(|| Self::not_found("file", id))?;
        Ok(files.remove(index))
    }
}

/// Metadata sink keeping saved values per resource
#[derive(Debug, Default)]
pub struct InMemorySink {
    pub saved: Mutex<Vec<(ResourceId, MetadataValue)>>,
    pub calls: Mutex<Vec<MetadataPayload>>,
    fail_next: Mutex<Option<PersistenceError>>,
}

impl InMemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next(&self, error: PersistenceError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Values saved for a resource
    pub fn values_for(&self, resource: &ResourceId) -> Vec<MetadataValue> {
        self.saved
            .lock()
            .iter()
            .filter(|(r, _)| r == resource)
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn inserts(&self) -> usize {
        self.calls.lock().iter().filter(|p| p.is_create()).count()
    }
}

#[async_trait]
impl MetadataSink for InMemorySink {
    async fn save(
        &self,
        resource: &ResourceId,
        payload: MetadataPayload,
    ) -> Result<MetadataValue, PersistenceError> {
        self.calls.lock().push(payload.clone());
        if let Some(error) = self.fail_next.lock().take() {
            return Err(error);
        }

        let mut saved = self.saved.lock();
        match payload {
            MetadataPayload::Create {
                definition,
                contents,
            } => {
                let value = MetadataValue {
                    id: Some(MetadataId::new(Ulid::new().to_string())),
                    definition,
                    contents,
                };
                saved.push((resource.clone(), value.clone()));
                Ok(value)
            }
            MetadataPayload::Update {
                id,
                definition,
                contents,
            } => {
                let slot = saved
                    .iter_mut()
                    .find(|(_, v)| v.id.as_ref() == Some(&id))
                    .ok_or_else(|| PersistenceError::new(format!("metadata {id} not found")))?;
                slot.1 = MetadataValue {
                    id: Some(id),
                    definition,
                    contents,
                };
                Ok(slot.1.clone())
            }
        }
    }
}
