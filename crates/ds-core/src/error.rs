//! Error types for the orchestration layer
//!
//! Wraps the per-crate errors so flows can use `?` across:
//! - metadata fetch and validation failures
//! - rejected wizard actions
//! - persistence failures
//! - configuration loading

use crate::persistence::PersistenceError;
use ds_metadata::MetadataError;
use ds_wizard::WizardError;
use std::path::PathBuf;

/// Main orchestration error
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Metadata layer failed
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Wizard rejected an action
    #[error("wizard error: {0}")]
    Wizard(#[from] WizardError),

    /// Persistence call failed
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    /// Step needs the dataset created in the first step
    #[error("no dataset has been created yet")]
    DatasetNotCreated,

    /// Dataset already created by this flow
    #[error("dataset {0} was already created")]
    DatasetAlreadyCreated(String),

    /// Field is not part of the form
    #[error("unknown field {definition}.{field}")]
    UnknownField {
        /// Definition name
        definition: String,
        /// Field name
        field: String,
    },

    /// Field must enter edit mode first
    #[error("field {definition}.{field} is read-only")]
    ReadOnly {
        /// Definition name
        definition: String,
        /// Field name
        field: String,
    },

    /// Configuration file could not be read
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is malformed
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl CoreError {
    /// Whether retrying the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Persistence(_) => true,
            Self::Metadata(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Whether the error only blocks progression until more input arrives
    #[inline]
    #[must_use]
    pub fn is_gating(&self) -> bool {
        matches!(self, Self::Wizard(e) if e.is_gating())
    }
}
