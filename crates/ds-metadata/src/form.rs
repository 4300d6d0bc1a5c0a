//! Metadata form assembly and required-field gating
//!
//! [`MetadataFormAssembler`] turns fetched definitions into the ordered list
//! of fields to render for a target kind. [`MetadataDraft`] accumulates the
//! payloads of a creation form, and [`RequirementReport`] decides whether the
//! draft may leave the form.

use crate::definition::{MetadataDefinition, TargetKind};
use crate::error::WidgetError;
use crate::field::MetadataFieldController;
use crate::value::{Contents, MetadataPayload, MetadataValue};
use crate::widget::{WidgetDispatcher, WidgetKind};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// One field ready to render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableField {
    /// Owning definition name
    pub widget_name: String,
    /// Field name
    pub field_name: String,
    /// Resolved widget behaviour
    pub widget: WidgetKind,
    /// Select options, empty when unconfigured
    pub options: Vec<Value>,
    /// Whether a value is mandatory
    pub is_required: bool,
}

/// Builds metadata forms from definitions
#[derive(Debug, Clone, Default)]
pub struct MetadataFormAssembler {
    dispatcher: WidgetDispatcher,
}

impl MetadataFormAssembler {
    /// Create assembler using a dispatcher
    #[inline]
    #[must_use]
    pub fn new(dispatcher: WidgetDispatcher) -> Self {
        Self { dispatcher }
    }

    /// The dispatcher in use
    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &WidgetDispatcher {
        &self.dispatcher
    }

    /// Fields applicable to `target`, in definition then field order
    #[must_use]
    pub fn assemble(
        &self,
        definitions: &[MetadataDefinition],
        target: TargetKind,
    ) -> Vec<RenderableField> {
        definitions
            .iter()
            .filter(|def| def.applies_to(target))
            .flat_map(|def| {
                def.fields.iter().map(move |field| RenderableField {
                    widget_name: def.name.clone(),
                    field_name: field.name.clone(),
                    widget: self.dispatcher.resolve(field.widget_type.as_deref()),
                    options: field.options().to_vec(),
                    is_required: field.required,
                })
            })
            .collect()
    }

    /// One initialized controller per assembled field
    ///
    /// `existing` holds persisted values of the target; each controller is
    /// seeded from the value of its own definition.
    #[must_use]
    pub fn controllers(
        &self,
        definitions: &[MetadataDefinition],
        target: TargetKind,
        existing: &[MetadataValue],
        initial_read_only: bool,
    ) -> Vec<MetadataFieldController> {
        self.assemble(definitions, target)
            .iter()
            .map(|field| {
                let value = existing.iter().find(|v| v.definition == field.widget_name);
                MetadataFieldController::for_field(field).initialized(value, initial_read_only)
            })
            .collect()
    }

    /// Check a draft against the required-field policy
    #[must_use]
    pub fn check(
        &self,
        definitions: &[MetadataDefinition],
        target: TargetKind,
        draft: &MetadataDraft,
    ) -> RequirementReport {
        let mut report = RequirementReport::default();

        for field in self.assemble(definitions, target) {
            let value = draft.get(&field.widget_name, &field.field_name);
            let empty = value.map_or(true, |v| field.widget.is_empty_value(v));

            if empty {
                if field.is_required {
                    report.missing.push(MissingField {
                        definition: field.widget_name,
                        field: field.field_name,
                    });
                }
                continue;
            }

            if let Some(value) = value {
                if let Err(error) = field.widget.validate(value, &field.options) {
                    report.invalid.push(InvalidField {
                        definition: field.widget_name,
                        field: field.field_name,
                        error,
                    });
                }
            }
        }

        report
    }
}

/// Required field without a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingField {
    /// Definition name
    pub definition: String,
    /// Field name
    pub field: String,
}

/// Field whose value its widget rejects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidField {
    /// Definition name
    pub definition: String,
    /// Field name
    pub field: String,
    /// Widget error
    #[serde(serialize_with = "as_message")]
    pub error: WidgetError,
}

fn as_message<S: serde::Serializer>(error: &WidgetError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a required-field check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementReport {
    /// Required fields without a value
    pub missing: Vec<MissingField>,
    /// Values rejected by their widget
    pub invalid: Vec<InvalidField>,
}

impl RequirementReport {
    /// May the form be left
    #[inline]
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// Is one definition satisfied
    #[must_use]
    pub fn is_definition_satisfied(&self, definition: &str) -> bool {
        !self.missing.iter().any(|m| m.definition == definition)
            && !self.invalid.iter().any(|i| i.definition == definition)
    }
}

/// Metadata collected by a creation form, keyed by definition name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDraft {
    entries: IndexMap<String, Contents>,
}

impl MetadataDraft {
    /// Empty draft
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a field controller payload; later values win
    pub fn apply(&mut self, payload: &MetadataPayload) {
        let contents = self
            .entries
            .entry(payload.definition().to_string())
            .or_default();
        for (field, value) in payload.contents() {
            contents.insert(field.clone(), value.clone());
        }
    }

    /// Set one value directly
    pub fn set(&mut self, definition: &str, field: &str, value: Value) {
        self.entries
            .entry(definition.to_string())
            .or_default()
            .insert(field.to_string(), value);
    }

    /// Value of `definition.field`
    #[must_use]
    pub fn get(&self, definition: &str, field: &str) -> Option<&Value> {
        self.entries.get(definition).and_then(|c| c.get(field))
    }

    /// Drop one definition
    pub fn remove(&mut self, definition: &str) -> Option<Contents> {
        self.entries.shift_remove(definition)
    }

    /// Unsaved values, one per touched definition
    #[must_use]
    pub fn values(&self) -> Vec<MetadataValue> {
        self.entries
            .iter()
            .map(|(definition, contents)| MetadataValue {
                id: None,
                definition: definition.clone(),
                contents: contents.clone(),
            })
            .collect()
    }

    /// Number of touched definitions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nothing entered yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
