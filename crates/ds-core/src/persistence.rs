//! Persistence boundary
//!
//! Everything durable lives behind these traits. Implementations return the
//! canonical item, which callers fold into the store through the matching
//! event.

use async_trait::async_trait;
use ds_metadata::{MetadataPayload, MetadataValue};
use ds_store::{Dataset, FileItem, Folder, ResourceId};
use serde::{Deserialize, Serialize};

/// Failed persistence call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{reason}")]
pub struct PersistenceError {
    /// Human-readable failure reason
    pub reason: String,
    /// Diagnostic trace, possibly empty
    #[serde(default)]
    pub stack: String,
}

impl PersistenceError {
    /// Error without a trace
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            stack: String::new(),
        }
    }

    /// Attach a diagnostic trace
    #[inline]
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = stack.into();
        self
    }
}

/// Saves metadata attached to a resource
#[async_trait]
pub trait MetadataSink: Send + Sync {
    /// Insert when the payload has no id, patch otherwise
    async fn save(
        &self,
        resource: &ResourceId,
        payload: MetadataPayload,
    ) -> Result<MetadataValue, PersistenceError>;
}

/// Input of dataset creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDataset {
    /// Display name
    pub name: String,
    /// Free text description
    #[serde(default)]
    pub description: String,
}

impl NewDataset {
    /// Dataset named `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Input of folder creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFolder {
    /// Owning dataset
    pub dataset_id: ResourceId,
    /// Folder name
    pub name: String,
    /// Parent folder, `None` at dataset root
    #[serde(default)]
    pub parent_folder: Option<ResourceId>,
}

/// One file to upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    /// File name
    pub name: String,
    /// Target folder, `None` at dataset root
    #[serde(default)]
    pub folder_id: Option<ResourceId>,
    /// MIME type
    #[serde(default)]
    pub content_type: Option<String>,
    /// File body
    #[serde(default)]
    pub content: Vec<u8>,
}

impl NewFile {
    /// File at dataset root
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            folder_id: None,
            content_type: None,
            content: content.into(),
        }
    }

    /// Place inside a folder
    #[inline]
    #[must_use]
    pub fn in_folder(mut self, folder: ResourceId) -> Self {
        self.folder_id = Some(folder);
        self
    }
}

/// Dataset, folder and file CRUD
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    /// Create a dataset
    async fn create_dataset(&self, new: NewDataset) -> Result<Dataset, PersistenceError>;

    /// Replace a dataset's editable fields
    async fn update_dataset(&self, dataset: Dataset) -> Result<Dataset, PersistenceError>;

    /// Delete a dataset, returning the removed item
    async fn delete_dataset(&self, id: &ResourceId) -> Result<Dataset, PersistenceError>;

    /// Create a folder
    async fn create_folder(&self, new: NewFolder) -> Result<Folder, PersistenceError>;

    /// Delete a folder, returning the removed item
    async fn delete_folder(&self, id: &ResourceId) -> Result<Folder, PersistenceError>;

    /// Upload files into a dataset
    async fn upload_files(
        &self,
        dataset: &ResourceId,
        files: Vec<NewFile>,
    ) -> Result<Vec<FileItem>, PersistenceError>;

    /// Delete a file, returning the removed item
    async fn delete_file(&self, id: &ResourceId) -> Result<FileItem, PersistenceError>;
}
