//! Metadata values and save payloads

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field name to value mapping, in insertion order
pub type Contents = IndexMap<String, serde_json::Value>;

/// Opaque metadata id, assigned by the persistence boundary on first save
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataId(pub String);

impl MetadataId {
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

impl fmt::Display for MetadataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted (or about to be persisted) metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataValue {
    /// Absent until first successful save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MetadataId>,
    /// Name of the owning definition
    pub definition: String,
    /// Field contents
    #[serde(default)]
    pub contents: Contents,
}

impl MetadataValue {
    /// New unsaved value
    #[must_use]
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            id: None,
            definition: definition.into(),
            contents: Contents::new(),
        }
    }

    /// Set id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: MetadataId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set one field
    #[inline]
    #[must_use]
    pub fn with_entry(mut self, field: impl Into<String>, value: serde_json::Value) -> Self {
        self.contents.insert(field.into(), value);
        self
    }

    /// Value of one field
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.contents.get(field)
    }
}

/// Payload handed to the save boundary
///
/// The variant decides whether the boundary inserts or patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataPayload {
    /// Patch an existing value
    Update {
        /// Existing id
        id: MetadataId,
        /// Definition name
        definition: String,
        /// Changed contents
        contents: Contents,
    },
    /// Insert a new value
    Create {
        /// Definition name
        definition: String,
        /// Initial contents
        contents: Contents,
    },
}

impl MetadataPayload {
    /// Definition name
    #[inline]
    #[must_use]
    pub fn definition(&self) -> &str {
        match self {
            Self::Update { definition, .. } | Self::Create { definition, .. } => definition,
        }
    }

    /// Contents
    #[inline]
    #[must_use]
    pub fn contents(&self) -> &Contents {
        match self {
            Self::Update { contents, .. } | Self::Create { contents, .. } => contents,
        }
    }

    /// Id when this is a patch
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&MetadataId> {
        match self {
            Self::Update { id, .. } => Some(id),
            Self::Create { .. } => None,
        }
    }

    /// Whether the boundary must insert
    #[inline]
    #[must_use]
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }
}

impl From<MetadataPayload> for MetadataValue {
    fn from(payload: MetadataPayload) -> Self {
        match payload {
            MetadataPayload::Update {
                id,
                definition,
                contents,
            } => MetadataValue {
                id: Some(id),
                definition,
                contents,
            },
            MetadataPayload::Create {
                definition,
                contents,
            } => MetadataValue {
                id: None,
                definition,
                contents,
            },
        }
    }
}
