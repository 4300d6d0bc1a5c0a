//! Metadata definitions
//!
//! A definition is a server-declared schema for one named group of fields.
//! Definitions are immutable once fetched; a refetch replaces them wholesale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of item a metadata form is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Dataset-level metadata
    Datasets,
    /// File-level metadata
    Files,
}

impl TargetKind {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Datasets => "datasets",
            TargetKind::Files => "files",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "datasets" | "dataset" => Ok(TargetKind::Datasets),
            "files" | "file" => Ok(TargetKind::Files),
            other => Err(format!("unknown target kind: {other}")),
        }
    }
}

/// Which item kinds require a definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredForItems {
    /// Required on datasets
    #[serde(default)]
    pub datasets: bool,
    /// Required on files
    #[serde(default)]
    pub files: bool,
}

impl RequiredForItems {
    /// Required for both kinds
    #[inline]
    #[must_use]
    pub fn both() -> Self {
        Self {
            datasets: true,
            files: true,
        }
    }

    /// Lookup by target kind
    #[inline]
    #[must_use]
    pub fn for_target(&self, target: TargetKind) -> bool {
        match target {
            TargetKind::Datasets => self.datasets,
            TargetKind::Files => self.files,
        }
    }
}

/// Per-field widget configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Allowed options (select-style widgets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<serde_json::Value>>,
}

/// One field of a metadata definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name (key inside metadata contents)
    pub name: String,
    /// Declared widget tag, resolved through the dispatcher
    #[serde(rename = "widgetType", default, skip_serializing_if = "Option::is_none")]
    pub widget_type: Option<String>,
    /// Whether a non-empty value is mandatory
    #[serde(default)]
    pub required: bool,
    /// Widget configuration
    #[serde(default)]
    pub config: FieldConfig,
}

impl FieldDefinition {
    /// Create optional field with a widget tag
    #[must_use]
    pub fn new(name: impl Into<String>, widget_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            widget_type: Some(widget_type.into()),
            required: false,
            config: FieldConfig::default(),
        }
    }

    /// Mark field required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set select options
    #[inline]
    #[must_use]
    pub fn with_options(mut self, options: Vec<serde_json::Value>) -> Self {
        self.config.options = Some(options);
        self
    }

    /// Options, empty when unconfigured
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[serde_json::Value] {
        self.config.options.as_deref().unwrap_or(&[])
    }
}

/// Server-declared metadata schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataDefinition {
    /// Opaque server id
    #[serde(default)]
    pub id: String,
    /// Unique definition name
    pub name: String,
    /// Human readable description
    #[serde(default)]
    pub description: String,
    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Item kinds this definition applies to
    #[serde(default)]
    pub required_for_items: RequiredForItems,
}

impl MetadataDefinition {
    /// Create definition with no fields, applicable nowhere
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            description: String::new(),
            fields: Vec::new(),
            required_for_items: RequiredForItems::default(),
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Set applicability
    #[inline]
    #[must_use]
    pub fn required_for(mut self, required: RequiredForItems) -> Self {
        self.required_for_items = required;
        self
    }

    /// Does this definition apply to the target kind
    #[inline]
    #[must_use]
    pub fn applies_to(&self, target: TargetKind) -> bool {
        self.required_for_items.for_target(target)
    }

    /// Find a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn target_kind_parse() {
        assert_eq!("datasets".parse::<TargetKind>().unwrap(), TargetKind::Datasets);
        assert_eq!("files".parse::<TargetKind>().unwrap(), TargetKind::Files);
        assert!("folders".parse::<TargetKind>().is_err());
    }

    #[test]
    fn definition_deserializes_wire_shape() {
        let raw = json!({
            "id": "abc",
            "name": "GPS",
            "description": "coordinates",
            "required_for_items": {"datasets": true, "files": false},
            "fields": [
                {"name": "lat", "widgetType": "FloatField", "required": true, "config": {}},
                {"name": "unit", "widgetType": "Select", "config": {"options": ["deg", "rad"]}}
            ]
        });

        let def: MetadataDefinition = serde_json::from_value(raw).unwrap();
        assert_eq!(def.fields.len(), 2);
        assert!(def.fields[0].required);
        assert_eq!(def.fields[0].widget_type.as_deref(), Some("FloatField"));
        assert!(def.fields[0].options().is_empty());
        assert_eq!(def.fields[1].options().len(), 2);
        assert!(def.applies_to(TargetKind::Datasets));
        assert!(!def.applies_to(TargetKind::Files));
    }

    #[test]
    fn missing_widget_type_is_none() {
        let raw = json!({"name": "note"});
        let field: FieldDefinition = serde_json::from_value(raw).unwrap();
        assert!(field.widget_type.is_none());
        assert!(!field.required);
    }
}
