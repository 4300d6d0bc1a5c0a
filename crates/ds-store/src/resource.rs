//! Resource types held by the store
//!
//! Items are identified by an opaque server id. Every collection operation
//! in the reducers matches on [`Identified::id`].

use chrono::{DateTime, Utc};
use ds_metadata::Paged;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned resource id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Wrap an id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Anything the store can match by id
pub trait Identified {
    /// Item id
    fn id(&self) -> &ResourceId;
}

/// Creator summary attached to a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
}

/// Dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Id
    pub id: ResourceId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free text description
    #[serde(default)]
    pub description: String,
    /// Creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    /// Creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Dataset with just an id and name
    #[must_use]
    pub fn new(id: impl Into<ResourceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            creator: None,
            created: None,
            modified: None,
        }
    }
}

impl Identified for Dataset {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// File inside a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    /// Id
    pub id: ResourceId,
    /// File name
    #[serde(default)]
    pub name: String,
    /// Owning dataset
    pub dataset_id: ResourceId,
    /// Containing folder, `None` at dataset root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<ResourceId>,
    /// Size in bytes
    #[serde(default)]
    pub bytes: u64,
    /// MIME type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Version counter
    #[serde(default)]
    pub version_num: u32,
}

impl FileItem {
    /// File at dataset root
    #[must_use]
    pub fn new(
        id: impl Into<ResourceId>,
        name: impl Into<String>,
        dataset_id: impl Into<ResourceId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dataset_id: dataset_id.into(),
            folder_id: None,
            bytes: 0,
            content_type: None,
            version_num: 1,
        }
    }
}

impl Identified for FileItem {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// Folder inside a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Id
    pub id: ResourceId,
    /// Folder name
    #[serde(default)]
    pub name: String,
    /// Owning dataset
    pub dataset_id: ResourceId,
    /// Parent folder, `None` at dataset root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder: Option<ResourceId>,
}

impl Folder {
    /// Folder at dataset root
    #[must_use]
    pub fn new(
        id: impl Into<ResourceId>,
        name: impl Into<String>,
        dataset_id: impl Into<ResourceId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dataset_id: dataset_id.into(),
            parent_folder: None,
        }
    }
}

impl Identified for Folder {
    fn id(&self) -> &ResourceId {
        &self.id
    }
}

/// Entry of a dataset listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "object_type", rename_all = "lowercase")]
pub enum FolderOrFile {
    /// A file
    File(FileItem),
    /// A folder
    Folder(Folder),
}

impl Identified for FolderOrFile {
    fn id(&self) -> &ResourceId {
        match self {
            FolderOrFile::File(file) => &file.id,
            FolderOrFile::Folder(folder) => &folder.id,
        }
    }
}

impl From<FileItem> for FolderOrFile {
    fn from(file: FileItem) -> Self {
        FolderOrFile::File(file)
    }
}

impl From<Folder> for FolderOrFile {
    fn from(folder: Folder) -> Self {
        FolderOrFile::Folder(folder)
    }
}

/// Current user's role on a dataset (opaque authorization fact)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRole {
    /// Dataset the role applies to
    pub dataset_id: ResourceId,
    /// Role name as reported by the server
    pub role: String,
}

/// Role grant to a user or group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    /// User email or group id
    pub subject: String,
    /// Role name
    pub role: String,
}

/// All role grants on a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRoles {
    /// Dataset
    pub dataset_id: ResourceId,
    /// Per-user grants
    #[serde(default)]
    pub user_roles: Vec<RoleGrant>,
    /// Per-group grants
    #[serde(default)]
    pub group_roles: Vec<RoleGrant>,
}

/// Stored visualization payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationData {
    /// Id
    pub id: ResourceId,
    /// File name
    #[serde(default)]
    pub name: String,
    /// Size in bytes
    #[serde(default)]
    pub bytes: u64,
    /// Configuration that produced it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_config_id: Option<ResourceId>,
}

/// Visualization configuration for a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationConfig {
    /// Id
    pub id: ResourceId,
    /// Resource the configuration targets
    pub resource_id: ResourceId,
    /// Client component name
    #[serde(default)]
    pub client: String,
    /// Free-form parameters
    #[serde(default)]
    pub parameters: serde_json::Value,
}

/// A fetched page of items, stored as a persistent vector
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage<T: Clone> {
    /// Page metadata
    pub metadata: ds_metadata::PageMetadata,
    /// Items in server order
    pub data: im::Vector<T>,
}

impl<T: Clone> CachedPage<T> {
    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Is the page empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Clone + Identified> CachedPage<T> {
    /// Find an item by id
    #[must_use]
    pub fn get(&self, id: &ResourceId) -> Option<&T> {
        self.data.iter().find(|item| item.id() == id)
    }

    /// Ids in order
    #[must_use]
    pub fn ids(&self) -> Vec<ResourceId> {
        self.data.iter().map(|item| item.id().clone()).collect()
    }
}

impl<T: Clone> Default for CachedPage<T> {
    fn default() -> Self {
        Self {
            metadata: ds_metadata::PageMetadata::default(),
            data: im::Vector::new(),
        }
    }
}

impl<T: Clone> From<Paged<T>> for CachedPage<T> {
    fn from(page: Paged<T>) -> Self {
        Self {
            metadata: page.metadata,
            data: page.data.into_iter().collect(),
        }
    }
}
