//! Store state snapshots
//!
//! All collections are `im` persistent structures: cloning a snapshot is
//! cheap and a reducer producing the next state never touches the previous
//! one.

use crate::resource::{
    CachedPage, Dataset, DatasetRole, DatasetRoles, FileItem, Folder, FolderOrFile,
    VisualizationConfig, VisualizationData,
};
use ds_metadata::{MetadataId, MetadataValue};
use std::sync::Arc;

/// Datasets, their contents and the creation staging slots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetState {
    /// Folder and file listing of the dataset on display
    pub folders_and_files: CachedPage<FolderOrFile>,
    /// Dataset on display
    pub about: Option<Dataset>,
    /// Current user's role on it
    pub dataset_role: Option<DatasetRole>,
    /// Dataset listing
    pub datasets: CachedPage<Dataset>,
    /// Last creation result
    pub new_dataset: Option<Dataset>,
    /// Last single-file creation result
    pub new_file: Option<FileItem>,
    /// Last multi-file creation result
    pub new_files: im::Vector<FileItem>,
    /// Last folder creation result
    pub new_folder: Option<Folder>,
    /// Role grants on the dataset on display
    pub roles: Option<DatasetRoles>,
}

impl DatasetState {
    /// Files of the current listing
    pub fn files(&self) -> impl Iterator<Item = &FileItem> {
        self.folders_and_files.data.iter().filter_map(|item| match item {
            FolderOrFile::File(file) => Some(file),
            FolderOrFile::Folder(_) => None,
        })
    }

    /// Folders of the current listing
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders_and_files.data.iter().filter_map(|item| match item {
            FolderOrFile::Folder(folder) => Some(folder),
            FolderOrFile::File(_) => None,
        })
    }
}

/// Saved metadata of the item on display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataState {
    /// Persisted values
    pub values: im::Vector<MetadataValue>,
}

impl MetadataState {
    /// Value for a definition
    #[must_use]
    pub fn for_definition(&self, definition: &str) -> Option<&MetadataValue> {
        self.values.iter().find(|v| v.definition == definition)
    }

    /// Value by id
    #[must_use]
    pub fn get(&self, id: &MetadataId) -> Option<&MetadataValue> {
        self.values.iter().find(|v| v.id.as_ref() == Some(id))
    }
}

/// Visualization slice
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizationState {
    /// Visualization record
    pub data: Option<VisualizationData>,
    /// Configurations
    pub configs: im::Vector<VisualizationConfig>,
    /// Generated download URL
    pub url: String,
    /// Presigned URL
    pub presigned_url: String,
    /// Downloaded bytes
    pub blob: Arc<[u8]>,
}

impl Default for VisualizationState {
    fn default() -> Self {
        Self {
            data: None,
            configs: im::Vector::new(),
            url: String::new(),
            presigned_url: String::new(),
            blob: Arc::from(Vec::new()),
        }
    }
}

/// Whole store snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Dataset slice
    pub dataset: DatasetState,
    /// Metadata slice
    pub metadata: MetadataState,
    /// Visualization slice
    pub visualization: VisualizationState,
}
