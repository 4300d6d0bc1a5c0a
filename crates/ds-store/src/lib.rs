//! Dataset Workbench resource store
//!
//! Normalized client-side cache of datasets, files, folders, saved metadata
//! and visualization data, driven by a closed set of typed events folded by
//! pure reducers.
//!
//! # Example
//!
//! ```rust,ignore
//! use ds_store::{DatasetEvent, ResourceStore};
//!
//! let store = ResourceStore::new();
//! store.dispatch(DatasetEvent::ReceivedDatasets(page));
//! store.dispatch(DatasetEvent::DeletedDataset(dataset));
//!
//! let snapshot = store.snapshot();
//! println!("{} datasets", snapshot.dataset.datasets.len());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod event;
mod reducer;
mod resource;
mod state;
mod store;

pub use event::{DatasetEvent, MetadataEvent, StoreEvent, VisualizationEvent};
pub use reducer::{reduce, reduce_dataset, reduce_metadata, reduce_visualization, replay};
pub use resource::{
    CachedPage, Creator, Dataset, DatasetRole, DatasetRoles, FileItem, Folder, FolderOrFile,
    Identified, ResourceId, RoleGrant, VisualizationConfig, VisualizationData,
};
pub use state::{DatasetState, MetadataState, StoreState, VisualizationState};
pub use store::ResourceStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
