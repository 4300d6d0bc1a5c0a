//! Resource edits outside the creation flow

use crate::error::CoreError;
use crate::failure::FailureChannel;
use crate::persistence::ResourceBackend;
use ds_store::{Dataset, DatasetEvent, FileItem, Folder, ResourceId, ResourceStore};
use std::sync::Arc;

/// Backend calls folded into the store
pub struct ResourceService<B> {
    backend: Arc<B>,
    store: Arc<ResourceStore>,
    failures: Arc<FailureChannel>,
}

impl<B: ResourceBackend> ResourceService<B> {
    /// Create service
    #[must_use]
    pub fn new(backend: Arc<B>, store: Arc<ResourceStore>, failures: Arc<FailureChannel>) -> Self {
        Self {
            backend,
            store,
            failures,
        }
    }

    /// Save dataset edits
    pub async fn update_dataset(&self, dataset: Dataset) -> Result<Dataset, CoreError> {
        let result = self.backend.update_dataset(dataset).await;
        let updated = self.failures.capture("update_dataset", result)?;
        self.store.dispatch(DatasetEvent::UpdatedDataset(updated.clone()));
        Ok(updated)
    }

    /// Delete a dataset
    pub async fn delete_dataset(&self, id: &ResourceId) -> Result<Dataset, CoreError> {
        let result = self.backend.delete_dataset(id).await;
        let deleted = self.failures.capture("delete_dataset", result)?;
        self.store.dispatch(DatasetEvent::DeletedDataset(deleted.clone()));
        tracing::info!(dataset = %deleted.id, "dataset deleted");
        Ok(deleted)
    }

    /// Delete a folder
    pub async fn delete_folder(&self, id: &ResourceId) -> Result<Folder, CoreError> {
        let result = self.backend.delete_folder(id).await;
        let deleted = self.failures.capture("delete_folder", result)?;
        self.store.dispatch(DatasetEvent::DeletedFolder(deleted.clone()));
        Ok(deleted)
    }

    /// Delete a file
    pub async fn delete_file(&self, id: &ResourceId) -> Result<FileItem, CoreError> {
        let result = self.backend.delete_file(id).await;
        let deleted = self.failures.capture("delete_file", result)?;
        self.store.dispatch(DatasetEvent::DeletedFile(deleted.clone()));
        Ok(deleted)
    }
}

impl<B> std::fmt::Debug for ResourceService<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService").finish_non_exhaustive()
    }
}
