//! Dataset creation flow
//!
//! Drives the four-step wizard against the persistence boundary:
//!
//! 1. create the dataset
//! 2. fill in the metadata required for datasets
//! 3. create folders
//! 4. attach files
//!
//! Each sub-form marks its step complete when its work succeeded. The
//! metadata step is complete whenever the draft satisfies the required-field
//! gate; its draft is saved when leaving the step with Next. Attaching files
//! is optional, so the last step is complete once the dataset exists.

use crate::error::CoreError;
use crate::failure::{FailureChannel, FailureReport};
use crate::persistence::{MetadataSink, NewDataset, NewFile, NewFolder, ResourceBackend};
use ds_metadata::{
    MetadataDefinition, MetadataDraft, MetadataFormAssembler, MetadataId, MetadataPayload,
    MetadataValue, Paged, RenderableField, RequirementReport, TargetKind,
};
use ds_store::{Dataset, DatasetEvent, FileItem, Folder, MetadataEvent, ResourceId, ResourceStore};
use ds_wizard::{StepId, WizardAction, WizardController, WizardOutcome, WizardView};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// In-progress dataset creation
pub struct DatasetCreationFlow<B, S> {
    backend: Arc<B>,
    sink: Arc<S>,
    store: Arc<ResourceStore>,
    failures: Arc<FailureChannel>,
    assembler: MetadataFormAssembler,
    definitions: Arc<Paged<MetadataDefinition>>,
    wizard: WizardController,
    draft: MetadataDraft,
    saved: IndexMap<String, MetadataId>,
    dataset: Option<Dataset>,
}

impl<B, S> DatasetCreationFlow<B, S>
where
    B: ResourceBackend,
    S: MetadataSink,
{
    /// Start a flow over the given definitions snapshot
    #[must_use]
    pub fn new(
        backend: Arc<B>,
        sink: Arc<S>,
        store: Arc<ResourceStore>,
        failures: Arc<FailureChannel>,
        definitions: Arc<Paged<MetadataDefinition>>,
    ) -> Self {
        let mut flow = Self {
            backend,
            sink,
            store,
            failures,
            assembler: MetadataFormAssembler::default(),
            definitions,
            wizard: WizardController::dataset_creation(),
            draft: MetadataDraft::new(),
            saved: IndexMap::new(),
            dataset: None,
        };
        flow.refresh_metadata_gate();
        flow
    }

    /// Use a custom assembler
    #[must_use]
    pub fn with_assembler(mut self, assembler: MetadataFormAssembler) -> Self {
        self.assembler = assembler;
        self.refresh_metadata_gate();
        self
    }

    /// Wizard state
    #[inline]
    #[must_use]
    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    /// Renderable wizard snapshot
    #[inline]
    #[must_use]
    pub fn view(&self) -> WizardView {
        self.wizard.view()
    }

    /// Dataset created in the first step
    #[inline]
    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Unsaved metadata
    #[inline]
    #[must_use]
    pub fn draft(&self) -> &MetadataDraft {
        &self.draft
    }

    /// Metadata fields of the second step
    #[must_use]
    pub fn fields(&self) -> Vec<RenderableField> {
        self.assembler
            .assemble(&self.definitions.data, TargetKind::Datasets)
    }

    /// Required-field check of the current draft
    #[must_use]
    pub fn requirements(&self) -> RequirementReport {
        self.assembler
            .check(&self.definitions.data, TargetKind::Datasets, &self.draft)
    }

    /// Step 1: create the dataset
    pub async fn create_dataset(&mut self, new: NewDataset) -> Result<Dataset, CoreError> {
        if let Some(existing) = &self.dataset {
            return Err(CoreError::DatasetAlreadyCreated(existing.id.to_string()));
        }

        let result = self.backend.create_dataset(new).await;
        let dataset = self.failures.capture("create_dataset", result)?;

        self.store.dispatch(DatasetEvent::CreatedDataset(dataset.clone()));
        self.mark(StepId::CreateDataset, true);
        // Uploads are optional; Finish only needs the dataset.
        self.mark(StepId::AttachFiles, true);
        self.dataset = Some(dataset.clone());
        tracing::info!(dataset = %dataset.id, name = %dataset.name, "dataset created");
        Ok(dataset)
    }

    /// Step 2: set one metadata value
    pub fn edit_metadata(
        &mut self,
        definition: &str,
        field: &str,
        value: Value,
    ) -> Result<RequirementReport, CoreError> {
        let known = self
            .fields()
            .iter()
            .any(|f| f.widget_name == definition && f.field_name == field);
        if !known {
            return Err(CoreError::UnknownField {
                definition: definition.to_string(),
                field: field.to_string(),
            });
        }

        self.draft.set(definition, field, value);
        Ok(self.refresh_metadata_gate())
    }

    /// Step 2: merge a payload emitted by a field controller
    pub fn stage_payload(&mut self, payload: &MetadataPayload) -> RequirementReport {
        self.draft.apply(payload);
        self.refresh_metadata_gate()
    }

    /// Save the metadata draft against the new dataset
    ///
    /// Definitions saved before are patched. Every result is folded into the
    /// store; the first failure is returned after all saves settled.
    pub async fn commit_metadata(&mut self) -> Result<Vec<MetadataValue>, CoreError> {
        let resource = self.dataset_id()?.clone();

        let saves: Vec<_> = self
            .draft
            .values()
            .into_iter()
            .map(|value| {
                let payload = match self.saved.get(&value.definition) {
                    Some(id) => MetadataPayload::Update {
                        id: id.clone(),
                        definition: value.definition,
                        contents: value.contents,
                    },
                    None => MetadataPayload::Create {
                        definition: value.definition,
                        contents: value.contents,
                    },
                };
                let sink = Arc::clone(&self.sink);
                let resource = resource.clone();
                async move { sink.save(&resource, payload).await }
            })
            .collect();

        let mut persisted = Vec::with_capacity(saves.len());
        let mut failure = None;
        for result in futures::future::join_all(saves).await {
            match self.failures.capture("save_metadata", result) {
                Ok(value) => {
                    if let Some(id) = &value.id {
                        self.saved.insert(value.definition.clone(), id.clone());
                    }
                    self.store.dispatch(MetadataEvent::SavedMetadata(value.clone()));
                    persisted.push(value);
                }
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err.into()),
            None => {
                tracing::info!(dataset = %resource, saved = persisted.len(), "metadata committed");
                Ok(persisted)
            }
        }
    }

    /// Step 3: create a folder in the new dataset
    pub async fn create_folder(
        &mut self,
        name: impl Into<String>,
        parent_folder: Option<ResourceId>,
    ) -> Result<Folder, CoreError> {
        let new = NewFolder {
            dataset_id: self.dataset_id()?.clone(),
            name: name.into(),
            parent_folder,
        };

        let result = self.backend.create_folder(new).await;
        let folder = self.failures.capture("create_folder", result)?;

        self.store.dispatch(DatasetEvent::CreatedFolder(folder.clone()));
        self.mark(StepId::CreateFolders, true);
        tracing::info!(folder = %folder.id, "folder created");
        Ok(folder)
    }

    /// Step 4: upload files into the new dataset
    pub async fn attach_files(&mut self, files: Vec<NewFile>) -> Result<Vec<FileItem>, CoreError> {
        let dataset = self.dataset_id()?.clone();
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let result = self.backend.upload_files(&dataset, files).await;
        let uploaded = self.failures.capture("upload_files", result)?;

        self.store.dispatch(DatasetEvent::CreatedFiles(uploaded.clone()));
        tracing::info!(dataset = %dataset, files = uploaded.len(), "files attached");
        Ok(uploaded)
    }

    /// Advance; leaving the metadata step saves the draft first
    pub async fn next(&mut self) -> Result<WizardOutcome, CoreError> {
        self.wizard.check(WizardAction::Next)?;
        if self.wizard.active_id() == StepId::FillMetadata && !self.draft.is_empty() {
            self.commit_metadata().await?;
        }
        Ok(self.wizard.next()?)
    }

    /// Advance without completing the step
    pub fn skip(&mut self) -> Result<WizardOutcome, CoreError> {
        Ok(self.wizard.skip()?)
    }

    /// Return to the previous step
    pub fn back(&mut self) -> Result<WizardOutcome, CoreError> {
        Ok(self.wizard.back()?)
    }

    /// Finish and return the dataset to show next
    pub fn finish(&mut self) -> Result<ResourceId, CoreError> {
        self.wizard.check(WizardAction::Finish)?;
        let id = self.dataset_id()?.clone();
        self.wizard.finish()?;

        self.store.dispatch(DatasetEvent::ResetCreateDataset);
        self.store.dispatch(DatasetEvent::ResetCreateFolder);
        self.store.dispatch(DatasetEvent::ResetCreateFiles);
        tracing::info!(dataset = %id, "dataset creation finished");
        Ok(id)
    }

    /// Failure currently shown
    #[must_use]
    pub fn failure(&self) -> Option<FailureReport> {
        self.failures.current()
    }

    /// Close the failure prompt; the wizard stays where it is
    pub fn dismiss_failure(&self) -> Option<FailureReport> {
        self.failures.dismiss()
    }

    fn dataset_id(&self) -> Result<&ResourceId, CoreError> {
        self.dataset
            .as_ref()
            .map(|d| &d.id)
            .ok_or(CoreError::DatasetNotCreated)
    }

    fn refresh_metadata_gate(&mut self) -> RequirementReport {
        let report = self.requirements();
        self.mark(StepId::FillMetadata, report.is_satisfied());
        report
    }

    fn mark(&mut self, step: StepId, completed: bool) {
        if let Err(err) = self.wizard.set_completed(step, completed) {
            tracing::warn!(error = %err, "cannot update step completion");
        }
    }
}

impl<B, S> std::fmt::Debug for DatasetCreationFlow<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetCreationFlow")
            .field("wizard", &self.wizard)
            .field("dataset", &self.dataset)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}
