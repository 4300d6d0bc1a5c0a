//! Failure aggregation
//!
//! Operations return their own `Result`s. On top of that, failures are
//! handed to a [`FailureChannel`] which decides what the user sees: a single
//! slot holding the most recent failure, a "Report" link to the issue
//! tracker and a dismiss action.
//!
//! The slot is latest-wins. Concurrent failures from unrelated operations
//! overwrite each other; only the newest is shown.

use crate::persistence::PersistenceError;
use ds_metadata::MetadataError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Title of the failure prompt
pub const FAILURE_TITLE: &str = "Something went wrong...";

/// Label of the report action
pub const REPORT_ACTION: &str = "Report";

/// A failure shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    /// Short reason, shown as the prompt text
    pub reason: String,
    /// Diagnostic trace forwarded when reporting
    #[serde(default)]
    pub stack: String,
    /// Operation that failed, for logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl FailureReport {
    /// Report from reason and trace
    #[must_use]
    pub fn new(reason: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            stack: stack.into(),
            operation: None,
        }
    }

    /// Tag with the failing operation
    #[inline]
    #[must_use]
    pub fn during(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Issue tracker link: `{base}+{reason}&body={url-encoded stack}`
    #[must_use]
    pub fn issue_url(&self, base: &str) -> String {
        format!(
            "{base}+{}&body={}",
            self.reason,
            urlencoding::encode(&self.stack)
        )
    }
}

impl From<&PersistenceError> for FailureReport {
    fn from(err: &PersistenceError) -> Self {
        Self::new(err.reason.clone(), err.stack.clone())
    }
}

impl From<&MetadataError> for FailureReport {
    fn from(err: &MetadataError) -> Self {
        match err {
            MetadataError::FetchFailed { reason, stack } => {
                Self::new(reason.clone(), stack.clone())
            }
            other => Self::new(other.to_string(), String::new()),
        }
    }
}

/// Process-wide failure slot
#[derive(Debug)]
pub struct FailureChannel {
    slot: watch::Sender<Option<FailureReport>>,
    issue_base_url: Option<String>,
    reported: AtomicU64,
}

impl FailureChannel {
    /// Channel without an issue tracker
    #[must_use]
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot,
            issue_base_url: None,
            reported: AtomicU64::new(0),
        }
    }

    /// Enable the report link
    #[inline]
    #[must_use]
    pub fn with_issue_base_url(mut self, base: impl Into<String>) -> Self {
        self.issue_base_url = Some(base.into());
        self
    }

    /// Show a failure, replacing any previous one
    pub fn report(&self, report: FailureReport) {
        tracing::warn!(
            reason = %report.reason,
            operation = report.operation.as_deref().unwrap_or("unknown"),
            "operation failed"
        );
        self.reported.fetch_add(1, Ordering::SeqCst);
        self.slot.send_replace(Some(report));
    }

    /// Report the error of a failed result and pass the result through
    pub fn capture<T>(
        &self,
        operation: &str,
        result: Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        if let Err(err) = &result {
            self.report(FailureReport::from(err).during(operation));
        }
        result
    }

    /// Failure currently shown
    #[must_use]
    pub fn current(&self) -> Option<FailureReport> {
        self.slot.borrow().clone()
    }

    /// Whether a failure is shown
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Close the prompt, returning what was shown
    pub fn dismiss(&self) -> Option<FailureReport> {
        let dismissed = self.slot.send_replace(None);
        if dismissed.is_some() {
            tracing::debug!("failure dismissed");
        }
        dismissed
    }

    /// Report link for the current failure
    #[must_use]
    pub fn issue_url(&self) -> Option<String> {
        let base = self.issue_base_url.as_deref()?;
        self.slot.borrow().as_ref().map(|r| r.issue_url(base))
    }

    /// Observe the slot
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<FailureReport>> {
        self.slot.subscribe()
    }

    /// Failures reported since creation
    #[inline]
    #[must_use]
    pub fn reported(&self) -> u64 {
        self.reported.load(Ordering::SeqCst)
    }
}

impl Default for FailureChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_url_encodes_stack_only() {
        let report = FailureReport::new("Timeout", "at save (a.rs:1)\nnext line");
        assert_eq!(
            report.issue_url("https://tracker/new?title=Bug"),
            "https://tracker/new?title=Bug+Timeout&body=at%20save%20%28a.rs%3A1%29%0Anext%20line"
        );
    }

    #[test]
    fn latest_failure_wins() {
        let channel = FailureChannel::new();
        channel.report(FailureReport::new("first", ""));
        channel.report(FailureReport::new("second", ""));

        assert_eq!(channel.current().map(|r| r.reason), Some("second".to_string()));
        assert_eq!(channel.reported(), 2);
    }

    #[test]
    fn dismiss_clears_slot() {
        let channel = FailureChannel::new();
        channel.report(FailureReport::new("boom", "trace"));

        let dismissed = channel.dismiss();
        assert_eq!(dismissed.map(|r| r.reason), Some("boom".to_string()));
        assert!(!channel.is_open());
        assert!(channel.dismiss().is_none());
    }

    #[test]
    fn issue_url_requires_base_and_failure() {
        let channel = FailureChannel::new().with_issue_base_url("https://tracker/new?title=Bug");
        assert!(channel.issue_url().is_none());

        channel.report(FailureReport::new("x", "y"));
        assert_eq!(
            channel.issue_url().as_deref(),
            Some("https://tracker/new?title=Bug+x&body=y")
        );
        assert!(FailureChannel::new().issue_url().is_none());
    }

    #[test]
    fn capture_reports_errors_and_passes_values() {
        let channel = FailureChannel::new();
        assert_eq!(channel.capture("noop", Ok::<_, PersistenceError>(1)), Ok(1));
        assert!(!channel.is_open());

        let err = channel.capture::<()>("save", Err(PersistenceError::new("down")));
        assert!(err.is_err());
        assert_eq!(
            channel.current().and_then(|r| r.operation),
            Some("save".to_string())
        );
    }
}
