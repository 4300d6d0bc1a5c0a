//! Error types for metadata handling
//!
//! Widget validation failures are local to a single field value and never
//! escalate; fetch failures come from the definition source boundary.

/// Metadata subsystem error
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// Definition source could not be reached or answered with a failure
    #[error("definition fetch failed: {reason}")]
    FetchFailed {
        /// Short failure reason
        reason: String,
        /// Detail (server stack or transport detail)
        stack: String,
    },

    /// A newer refresh completed first, this result was discarded
    #[error("definition fetch superseded by generation {newer}")]
    Superseded {
        /// Generation that won
        newer: u64,
    },

    /// Field value rejected by its widget
    #[error("invalid value for {definition}.{field}: {source}")]
    InvalidValue {
        /// Owning definition name
        definition: String,
        /// Field name
        field: String,
        /// Widget-level cause
        #[source]
        source: WidgetError,
    },

    /// Unknown metadata definition
    #[error("unknown metadata definition: {0}")]
    UnknownDefinition(String),
}

impl MetadataError {
    /// Create fetch failure
    #[inline]
    pub fn fetch_failed(reason: impl Into<String>, stack: impl Into<String>) -> Self {
        Self::FetchFailed {
            reason: reason.into(),
            stack: stack.into(),
        }
    }

    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

/// Widget-level validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    /// Value is not an integer
    #[error("expected an integer, got {0}")]
    NotAnInteger(String),

    /// Value is not a number
    #[error("expected a number, got {0}")]
    NotANumber(String),

    /// Value is not an RFC 3339 timestamp
    #[error("expected an RFC 3339 date-time, got {0}")]
    NotADateTime(String),

    /// Value is not among the configured options
    #[error("{value} is not one of the allowed options")]
    NotAnOption {
        /// Rejected value
        value: String,
    },

    /// Value has a JSON shape the widget cannot hold
    #[error("unsupported value shape: {0}")]
    UnsupportedShape(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_is_retryable() {
        let err = MetadataError::fetch_failed("timeout", "gateway timed out");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn invalid_value_display() {
        let err = MetadataError::InvalidValue {
            definition: "GPS".to_string(),
            field: "lat".to_string(),
            source: WidgetError::NotANumber("\"north\"".to_string()),
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("GPS.lat"));
    }
}
