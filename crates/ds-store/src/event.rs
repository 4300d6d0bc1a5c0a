//! Store events
//!
//! One closed enum per state slice, each variant carrying a typed payload.
//! Events are serializable so recorded sessions can be replayed.

use crate::resource::{
    Dataset, DatasetRole, DatasetRoles, FileItem, Folder, FolderOrFile, VisualizationConfig,
    VisualizationData,
};
use ds_metadata::{MetadataValue, Paged};
use serde::{Deserialize, Serialize};

/// Dataset, file and folder events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DatasetEvent {
    /// Dataset listing fetched
    ReceivedDatasets(Paged<Dataset>),
    /// Dataset created
    CreatedDataset(Dataset),
    /// Creation result consumed
    ResetCreateDataset,
    /// Dataset updated
    UpdatedDataset(Dataset),
    /// Dataset deleted
    DeletedDataset(Dataset),
    /// Dataset detail fetched
    ReceivedAbout(Dataset),
    /// Current user's role fetched
    ReceivedRole(DatasetRole),
    /// Role grants fetched
    ReceivedRoles(DatasetRoles),
    /// Folder and file listing fetched
    ReceivedFoldersAndFiles(Paged<FolderOrFile>),
    /// File created
    CreatedFile(FileItem),
    /// Several files created
    CreatedFiles(Vec<FileItem>),
    /// File creation result consumed
    ResetCreateFile,
    /// Multi-file creation result consumed
    ResetCreateFiles,
    /// File updated
    UpdatedFile(FileItem),
    /// File deleted
    DeletedFile(FileItem),
    /// Folder created
    CreatedFolder(Folder),
    /// Folder creation result consumed
    ResetCreateFolder,
    /// Folder updated
    UpdatedFolder(Folder),
    /// Folder deleted
    DeletedFolder(Folder),
    /// Group role granted (server acknowledgement only)
    SetGroupRole,
    /// User role granted (server acknowledgement only)
    SetUserRole,
    /// Group role revoked (server acknowledgement only)
    RemovedGroupRole,
    /// User role revoked (server acknowledgement only)
    RemovedUserRole,
}

impl DatasetEvent {
    /// Event name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceivedDatasets(_) => "received_datasets",
            Self::CreatedDataset(_) => "created_dataset",
            Self::ResetCreateDataset => "reset_create_dataset",
            Self::UpdatedDataset(_) => "updated_dataset",
            Self::DeletedDataset(_) => "deleted_dataset",
            Self::ReceivedAbout(_) => "received_about",
            Self::ReceivedRole(_) => "received_role",
            Self::ReceivedRoles(_) => "received_roles",
            Self::ReceivedFoldersAndFiles(_) => "received_folders_and_files",
            Self::CreatedFile(_) => "created_file",
            Self::CreatedFiles(_) => "created_files",
            Self::ResetCreateFile => "reset_create_file",
            Self::ResetCreateFiles => "reset_create_files",
            Self::UpdatedFile(_) => "updated_file",
            Self::DeletedFile(_) => "deleted_file",
            Self::CreatedFolder(_) => "created_folder",
            Self::ResetCreateFolder => "reset_create_folder",
            Self::UpdatedFolder(_) => "updated_folder",
            Self::DeletedFolder(_) => "deleted_folder",
            Self::SetGroupRole => "set_group_role",
            Self::SetUserRole => "set_user_role",
            Self::RemovedGroupRole => "removed_group_role",
            Self::RemovedUserRole => "removed_user_role",
        }
    }
}

/// Saved metadata events for the item on display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetadataEvent {
    /// Metadata of the current item fetched
    ReceivedMetadata(Vec<MetadataValue>),
    /// A value was inserted or patched
    SavedMetadata(MetadataValue),
    /// A value was deleted
    DeletedMetadata(MetadataValue),
}

impl MetadataEvent {
    /// Event name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceivedMetadata(_) => "received_metadata",
            Self::SavedMetadata(_) => "saved_metadata",
            Self::DeletedMetadata(_) => "deleted_metadata",
        }
    }
}

/// Visualization events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum VisualizationEvent {
    /// Visualization record fetched
    ReceivedData(VisualizationData),
    /// Visualization configurations fetched
    ReceivedConfigs(Vec<VisualizationConfig>),
    /// Visualization bytes downloaded
    DownloadedBlob(Vec<u8>),
    /// Download URL generated
    GeneratedUrl(String),
    /// Presigned URL fetched
    ReceivedPresignedUrl(String),
}

impl VisualizationEvent {
    /// Event name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReceivedData(_) => "received_vis_data",
            Self::ReceivedConfigs(_) => "received_vis_configs",
            Self::DownloadedBlob(_) => "downloaded_vis_blob",
            Self::GeneratedUrl(_) => "generated_vis_url",
            Self::ReceivedPresignedUrl(_) => "received_vis_presigned_url",
        }
    }
}

/// Any store event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreEvent {
    /// Dataset slice
    Dataset(DatasetEvent),
    /// Metadata slice
    Metadata(MetadataEvent),
    /// Visualization slice
    Visualization(VisualizationEvent),
}

impl StoreEvent {
    /// Event name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dataset(e) => e.name(),
            Self::Metadata(e) => e.name(),
            Self::Visualization(e) => e.name(),
        }
    }
}

impl From<DatasetEvent> for StoreEvent {
    fn from(event: DatasetEvent) -> Self {
        Self::Dataset(event)
    }
}

impl From<MetadataEvent> for StoreEvent {
    fn from(event: MetadataEvent) -> Self {
        Self::Metadata(event)
    }
}

impl From<VisualizationEvent> for StoreEvent {
    fn from(event: VisualizationEvent) -> Self {
        Self::Visualization(event)
    }
}
