//! Dataset Workbench metadata engine
//!
//! Renders, validates and edits an open-ended set of metadata fields whose
//! shape is only known at runtime through fetched definitions.
//!
//! # Core Concepts
//!
//! - [`MetadataDefinitionRegistry`]: cache of the last fetched definitions
//! - [`WidgetDispatcher`]: widget tag to [`WidgetKind`], with a default fallback
//! - [`MetadataFormAssembler`]: definitions to [`RenderableField`]s for a [`TargetKind`]
//! - [`MetadataFieldController`]: per-field edit/dirty/read-only state
//! - [`MetadataDraft`] and [`RequirementReport`]: creation payload and its gate
//!
//! # Example
//!
//! ```rust,ignore
//! use ds_metadata::{MetadataFormAssembler, MetadataDraft, TargetKind};
//!
//! let assembler = MetadataFormAssembler::default();
//! let fields = assembler.assemble(&definitions, TargetKind::Datasets);
//!
//! let mut draft = MetadataDraft::new();
//! draft.set("GPS", "lat", serde_json::json!(40.1));
//! assert!(assembler.check(&definitions, TargetKind::Datasets, &draft).is_satisfied());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod definition;
mod error;
mod field;
mod form;
mod page;
mod registry;
mod value;
mod widget;

pub use definition::{
    FieldConfig, FieldDefinition, MetadataDefinition, RequiredForItems, TargetKind,
};
pub use error::{MetadataError, WidgetError};
pub use field::{Acknowledgement, MetadataFieldController, PendingSave};
pub use form::{
    InvalidField, MetadataDraft, MetadataFormAssembler, MissingField, RenderableField,
    RequirementReport,
};
pub use page::{PageMetadata, Paged};
pub use registry::{
    DefinitionQuery, DefinitionSource, MetadataDefinitionRegistry, DEFAULT_DEFINITION_LIMIT,
};
pub use value::{Contents, MetadataId, MetadataPayload, MetadataValue};
pub use widget::{WidgetDispatcher, WidgetKind, DEFAULT_WIDGET_TAG};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
