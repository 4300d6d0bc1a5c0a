//! Workbench configuration
//!
//! Loaded from TOML; every field has a default so a partial file is valid.
//!
//! ```toml
//! app_name = "workbench"
//! issue_base_url = "https://tracker.example/issues/new?title=Bug"
//! log_filter = "info,ds_core=debug"
//!
//! [definitions]
//! skip = 0
//! limit = 100
//! ```

use crate::error::CoreError;
use crate::failure::FailureChannel;
use ds_metadata::{DefinitionQuery, DEFAULT_DEFINITION_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which definitions to fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionSettings {
    /// Only definitions whose name starts with this
    pub name_prefix: Option<String>,
    /// Page offset
    pub skip: u64,
    /// Page size
    pub limit: u64,
}

impl Default for DefinitionSettings {
    fn default() -> Self {
        Self {
            name_prefix: None,
            skip: 0,
            limit: DEFAULT_DEFINITION_LIMIT,
        }
    }
}

/// Workbench configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    /// Name used in logs
    pub app_name: String,
    /// Issue tracker link prefix; the report action is disabled without it
    pub issue_base_url: Option<String>,
    /// Definition fetch settings
    pub definitions: DefinitionSettings,
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            app_name: "ds-workbench".to_string(),
            issue_base_url: None,
            definitions: DefinitionSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl WorkbenchConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// With application name
    #[inline]
    #[must_use]
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// With issue tracker link prefix
    #[inline]
    #[must_use]
    pub fn with_issue_base_url(mut self, base: impl Into<String>) -> Self {
        self.issue_base_url = Some(base.into());
        self
    }

    /// With definition page
    #[inline]
    #[must_use]
    pub fn with_definition_page(mut self, skip: u64, limit: u64) -> Self {
        self.definitions.skip = skip;
        self.definitions.limit = limit;
        self
    }

    /// With definition name prefix
    #[inline]
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.definitions.name_prefix = Some(prefix.into());
        self
    }

    /// With tracing filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Failure channel with the configured report link
    #[must_use]
    pub fn failure_channel(&self) -> FailureChannel {
        match &self.issue_base_url {
            Some(base) => FailureChannel::new().with_issue_base_url(base.clone()),
            None => FailureChannel::new(),
        }
    }

    /// Query for the definition registry
    #[must_use]
    pub fn definition_query(&self) -> DefinitionQuery {
        let query = DefinitionQuery::new().with_page(self.definitions.skip, self.definitions.limit);
        match &self.definitions.name_prefix {
            Some(prefix) => query.with_name_prefix(prefix.clone()),
            None => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = WorkbenchConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorkbenchConfig::default());
        assert_eq!(config.definitions.limit, 100);
    }

    #[test]
    fn partial_definitions_section() {
        let config =
            WorkbenchConfig::from_toml_str("[definitions]\nname_prefix = \"GP\"\n").unwrap();
        let query = config.definition_query();
        assert_eq!(query.name_prefix.as_deref(), Some("GP"));
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let err = WorkbenchConfig::from_toml_str("limit = [").unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse(_)));
    }
}
