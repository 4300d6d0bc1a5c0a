//! Widget dispatch
//!
//! Every field declares a widget tag. Tags resolve to a closed set of
//! [`WidgetKind`]s; anything unregistered (or absent) falls back to the
//! default `"NA"` behaviour, which edits the value as plain text.

use crate::error::WidgetError;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Tag of the default widget
pub const DEFAULT_WIDGET_TAG: &str = "NA";

/// Widget behaviour for one field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Free text
    TextField,
    /// Whole numbers
    IntField,
    /// Real numbers
    FloatField,
    /// RFC 3339 timestamp
    DateTimePicker,
    /// One of the configured options
    Select,
    /// Unregistered tag; behaves like the default widget
    Unknown(String),
}

impl WidgetKind {
    /// Canonical tag
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            WidgetKind::TextField => "TextField",
            WidgetKind::IntField => "IntField",
            WidgetKind::FloatField => "FloatField",
            WidgetKind::DateTimePicker => "DateTimePicker",
            WidgetKind::Select => "Select",
            WidgetKind::Unknown(tag) => tag,
        }
    }

    /// Whether this resolution took the fallback path
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, WidgetKind::Unknown(_))
    }

    /// Whether a value counts as "not filled in"
    #[must_use]
    pub fn is_empty_value(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// Check that a value fits this widget
    ///
    /// Empty values always pass; whether they are acceptable is a
    /// required-field concern.
    pub fn validate(&self, value: &Value, options: &[Value]) -> Result<(), WidgetError> {
        if self.is_empty_value(value) {
            return Ok(());
        }

        match self {
            WidgetKind::TextField | WidgetKind::Unknown(_) => match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(()),
                other => Err(WidgetError::UnsupportedShape(other.to_string())),
            },
            WidgetKind::IntField => match value {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
                Value::String(s) if s.trim().parse::<i64>().is_ok() => Ok(()),
                other => Err(WidgetError::NotAnInteger(other.to_string())),
            },
            WidgetKind::FloatField => match value {
                Value::Number(_) => Ok(()),
                Value::String(s) if s.trim().parse::<f64>().is_ok_and(f64::is_finite) => Ok(()),
                other => Err(WidgetError::NotANumber(other.to_string())),
            },
            WidgetKind::DateTimePicker => match value {
                Value::String(s) if chrono::DateTime::parse_from_rfc3339(s.trim()).is_ok() => {
                    Ok(())
                }
                other => Err(WidgetError::NotADateTime(other.to_string())),
            },
            WidgetKind::Select => {
                if options.is_empty() || options.iter().any(|o| o == value) {
                    Ok(())
                } else {
                    Err(WidgetError::NotAnOption {
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}

impl Serialize for WidgetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Maps declared widget tags to widget behaviours
///
/// Resolution never fails: unknown or missing tags yield the default
/// behaviour.
#[derive(Debug, Clone)]
pub struct WidgetDispatcher {
    widgets: HashMap<String, WidgetKind>,
}

impl WidgetDispatcher {
    /// Dispatcher with no registered tags; everything falls back
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }

    /// Dispatcher with the built-in widget catalogue
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(DEFAULT_WIDGET_TAG, WidgetKind::TextField);
        dispatcher.register("TextField", WidgetKind::TextField);
        dispatcher.register("IntField", WidgetKind::IntField);
        dispatcher.register("FloatField", WidgetKind::FloatField);
        dispatcher.register("DateTimePicker", WidgetKind::DateTimePicker);
        dispatcher.register("Select", WidgetKind::Select);
        dispatcher
    }

    /// Register (or alias) a tag
    pub fn register(&mut self, tag: &str, kind: WidgetKind) {
        self.widgets.insert(tag.to_string(), kind);
    }

    /// Is a tag registered
    #[inline]
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.widgets.contains_key(tag)
    }

    /// Registered tags
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.widgets.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Resolve a declared widget tag
    #[must_use]
    pub fn resolve(&self, widget_type: Option<&str>) -> WidgetKind {
        let tag = widget_type.unwrap_or(DEFAULT_WIDGET_TAG);
        if let Some(kind) = self.widgets.get(tag) {
            return kind.clone();
        }

        tracing::debug!(widget_type = tag, "unregistered widget type, using default");
        WidgetKind::Unknown(tag.to_string())
    }
}

impl Default for WidgetDispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_known_tags() {
        let dispatcher = WidgetDispatcher::with_defaults();
        assert_eq!(dispatcher.resolve(Some("IntField")), WidgetKind::IntField);
        assert_eq!(dispatcher.resolve(Some("Select")), WidgetKind::Select);
        assert_eq!(
            dispatcher.resolve(Some("DateTimePicker")),
            WidgetKind::DateTimePicker
        );
    }

    #[test]
    fn resolve_missing_tag_uses_default() {
        let dispatcher = WidgetDispatcher::with_defaults();
        assert_eq!(dispatcher.resolve(None), WidgetKind::TextField);
        assert_eq!(dispatcher.resolve(Some("NA")), WidgetKind::TextField);
    }

    #[test]
    fn resolve_unknown_tag_falls_back() {
        let dispatcher = WidgetDispatcher::with_defaults();
        let kind = dispatcher.resolve(Some("ColorWheel"));
        assert!(kind.is_fallback());
        assert_eq!(kind.tag(), "ColorWheel");
        assert!(kind.validate(&json!("red"), &[]).is_ok());
    }

    #[test]
    fn empty_dispatcher_falls_back_for_everything() {
        let dispatcher = WidgetDispatcher::empty();
        assert!(dispatcher.resolve(Some("TextField")).is_fallback());
        assert!(dispatcher.resolve(None).is_fallback());
    }

    #[test]
    fn register_alias() {
        let mut dispatcher = WidgetDispatcher::with_defaults();
        dispatcher.register("DateTime", WidgetKind::DateTimePicker);
        assert!(dispatcher.contains("DateTime"));
        assert_eq!(
            dispatcher.resolve(Some("DateTime")),
            WidgetKind::DateTimePicker
        );
    }

    #[test]
    fn int_field_validation() {
        let kind = WidgetKind::IntField;
        assert!(kind.validate(&json!(42), &[]).is_ok());
        assert!(kind.validate(&json!(" 17 "), &[]).is_ok());
        assert!(kind.validate(&json!(4.5), &[]).is_err());
        assert!(kind.validate(&json!("four"), &[]).is_err());
    }

    #[test]
    fn float_field_validation() {
        let kind = WidgetKind::FloatField;
        assert!(kind.validate(&json!(4.5), &[]).is_ok());
        assert!(kind.validate(&json!("-88.2"), &[]).is_ok());
        assert!(kind.validate(&json!("NaN"), &[]).is_err());
        assert!(kind.validate(&json!(true), &[]).is_err());
    }

    #[test]
    fn date_time_validation() {
        let kind = WidgetKind::DateTimePicker;
        assert!(kind.validate(&json!("2023-04-01T10:00:00Z"), &[]).is_ok());
        assert!(kind.validate(&json!("April first"), &[]).is_err());
    }

    #[test]
    fn select_validation() {
        let options = vec![json!("deg"), json!("rad")];
        let kind = WidgetKind::Select;
        assert!(kind.validate(&json!("deg"), &options).is_ok());
        assert_eq!(
            kind.validate(&json!("grad"), &options),
            Err(WidgetError::NotAnOption {
                value: "\"grad\"".to_string()
            })
        );
        assert!(kind.validate(&json!("anything"), &[]).is_ok());
    }

    #[test]
    fn empty_values_always_validate() {
        for kind in [
            WidgetKind::IntField,
            WidgetKind::FloatField,
            WidgetKind::DateTimePicker,
            WidgetKind::Select,
        ] {
            assert!(kind.validate(&Value::Null, &[json!("x")]).is_ok());
            assert!(kind.validate(&json!("  "), &[json!("x")]).is_ok());
        }
    }

    #[test]
    fn text_field_rejects_objects() {
        let kind = WidgetKind::TextField;
        assert!(kind.validate(&json!({"a": 1}), &[]).is_err());
        assert!(!kind.is_empty_value(&json!(0)));
        assert!(kind.is_empty_value(&json!([])));
    }
}
