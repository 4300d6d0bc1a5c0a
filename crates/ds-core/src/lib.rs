//! Dataset Workbench orchestration
//!
//! Connects the metadata engine, the creation wizard and the resource store
//! to a persistence boundary.
//!
//! # Core Concepts
//!
//! - [`ResourceBackend`] / [`MetadataSink`]: async persistence boundary
//! - [`FailureChannel`]: latest-wins failure prompt with an issue report link
//! - [`DatasetCreationFlow`]: the four-step dataset creation wizard
//! - [`MetadataEditor`]: commit-on-leave editing of saved metadata
//! - [`ResourceService`]: dataset, folder and file edits folded into the store
//! - [`WorkbenchConfig`]: TOML configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use ds_core::{DatasetCreationFlow, NewDataset};
//!
//! let mut flow = DatasetCreationFlow::new(backend, sink, store, failures, registry.snapshot());
//! flow.create_dataset(NewDataset::new("survey")).await?;
//! flow.next().await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod creation;
mod editor;
mod error;
mod failure;
mod persistence;
mod resources;
mod telemetry;

pub use config::{DefinitionSettings, WorkbenchConfig};
pub use creation::DatasetCreationFlow;
pub use editor::MetadataEditor;
pub use error::CoreError;
pub use failure::{FailureChannel, FailureReport, FAILURE_TITLE, REPORT_ACTION};
pub use persistence::{
    MetadataSink, NewDataset, NewFile, NewFolder, PersistenceError, ResourceBackend,
};
pub use resources::ResourceService;
pub use telemetry::{env_filter, init_tracing, LogFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
