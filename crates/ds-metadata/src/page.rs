//! Paged collection envelope shared by fetch boundaries

use serde::{Deserialize, Serialize};

/// Page metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Total number of matching items on the server
    #[serde(default)]
    pub total_count: u64,
    /// Items skipped
    #[serde(default)]
    pub skip: u64,
    /// Page size
    #[serde(default)]
    pub limit: u64,
}

/// One fetched page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Page metadata
    #[serde(default)]
    pub metadata: PageMetadata,
    /// Items in server order
    pub data: Vec<T>,
}

impl<T> Paged<T> {
    /// Single page holding every item
    #[must_use]
    pub fn complete(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            metadata: PageMetadata {
                total_count: total,
                skip: 0,
                limit: total,
            },
            data,
        }
    }

    /// Number of items in this page
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Is this page empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            metadata: PageMetadata::default(),
            data: Vec::new(),
        }
    }
}
