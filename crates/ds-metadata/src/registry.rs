//! Read-only cache of fetched metadata definitions
//!
//! Each refresh replaces the cached page wholesale. Refreshes are numbered
//! when issued; a result arriving after a newer refresh has already landed is
//! discarded, so the most recently *requested* page always wins.

use crate::definition::MetadataDefinition;
use crate::error::MetadataError;
use crate::page::Paged;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default page size for definition fetches
pub const DEFAULT_DEFINITION_LIMIT: u64 = 100;

/// Parameters of a definition fetch (passed through untouched)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionQuery {
    /// Optional name prefix filter
    pub name_prefix: Option<String>,
    /// Items to skip
    pub skip: u64,
    /// Page size
    pub limit: u64,
}

impl DefinitionQuery {
    /// First page, default size, no filter
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by name prefix
    #[inline]
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = Some(prefix.into());
        self
    }

    /// Set skip/limit
    #[inline]
    #[must_use]
    pub fn with_page(mut self, skip: u64, limit: u64) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}

impl Default for DefinitionQuery {
    fn default() -> Self {
        Self {
            name_prefix: None,
            skip: 0,
            limit: DEFAULT_DEFINITION_LIMIT,
        }
    }
}

/// Where definitions come from
#[async_trait]
pub trait DefinitionSource: Send + Sync {
    /// Fetch one page of definitions
    async fn fetch(
        &self,
        query: &DefinitionQuery,
    ) -> Result<Paged<MetadataDefinition>, MetadataError>;
}

#[derive(Debug, Default)]
struct Installed {
    page: Arc<Paged<MetadataDefinition>>,
    generation: u64,
}

/// Cache of the last fetched definition page
#[derive(Debug, Default)]
pub struct MetadataDefinitionRegistry {
    installed: RwLock<Installed>,
    issued: AtomicU64,
}

impl MetadataDefinitionRegistry {
    /// Empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with definitions
    #[must_use]
    pub fn with_definitions(definitions: Vec<MetadataDefinition>) -> Self {
        let registry = Self::new();
        registry.replace(Paged::complete(definitions));
        registry
    }

    /// Fetch from `source` and install the result
    pub async fn refresh<S>(
        &self,
        source: &S,
        query: &DefinitionQuery,
    ) -> Result<Arc<Paged<MetadataDefinition>>, MetadataError>
    where
        S: DefinitionSource + ?Sized,
    {
        let generation = self.next_generation();
        tracing::debug!(generation, ?query, "fetching metadata definitions");

        let page = source.fetch(query).await.map_err(|e| {
            tracing::warn!(generation, error = %e, "metadata definition fetch failed");
            e
        })?;
        self.install(generation, page)
    }

    /// Reserve a generation number for a fetch about to be issued
    #[inline]
    pub fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a page fetched under `generation`
    ///
    /// Fails with [`MetadataError::Superseded`] when a newer generation is
    /// already installed.
    pub fn install(
        &self,
        generation: u64,
        page: Paged<MetadataDefinition>,
    ) -> Result<Arc<Paged<MetadataDefinition>>, MetadataError> {
        let mut installed = self.installed.write();
        if generation < installed.generation {
            return Err(MetadataError::Superseded {
                newer: installed.generation,
            });
        }

        tracing::info!(generation, count = page.len(), "metadata definitions installed");
        installed.generation = generation;
        installed.page = Arc::new(page);
        Ok(Arc::clone(&installed.page))
    }

    /// Install a page unconditionally
    pub fn replace(&self, page: Paged<MetadataDefinition>) -> Arc<Paged<MetadataDefinition>> {
        let mut installed = self.installed.write();
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        installed.generation = generation;
        installed.page = Arc::new(page);
        Arc::clone(&installed.page)
    }

    /// Current page snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<Paged<MetadataDefinition>> {
        Arc::clone(&self.installed.read().page)
    }

    /// Current definitions
    #[must_use]
    pub fn definitions(&self) -> Vec<MetadataDefinition> {
        self.snapshot().data.clone()
    }

    /// Find a definition by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<MetadataDefinition> {
        self.installed
            .read()
            .page
            .data
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    /// Number of cached definitions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.installed.read().page.len()
    }

    /// Is the cache empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generation of the installed page
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.installed.read().generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::RequiredForItems;

    struct FixedSource(Vec<MetadataDefinition>);

    #[async_trait]
    impl DefinitionSource for FixedSource {
        async fn fetch(
            &self,
            query: &DefinitionQuery,
        ) -> Result<Paged<MetadataDefinition>, MetadataError> {
            let data = self
                .0
                .iter()
                .filter(|d| {
                    query
                        .name_prefix
                        .as_deref()
                        .map_or(true, |p| d.name.starts_with(p))
                })
                .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
                .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
                .cloned()
                .collect();
            Ok(Paged::complete(data))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DefinitionSource for FailingSource {
        async fn fetch(
            &self,
            _query: &DefinitionQuery,
        ) -> Result<Paged<MetadataDefinition>, MetadataError> {
            Err(MetadataError::fetch_failed("unavailable", "503"))
        }
    }

    fn defs() -> Vec<MetadataDefinition> {
        vec![
            MetadataDefinition::new("GPS").required_for(RequiredForItems::both()),
            MetadataDefinition::new("Grant"),
            MetadataDefinition::new("Units"),
        ]
    }

    #[test]
    fn default_query_matches_original_page() {
        let query = DefinitionQuery::new();
        assert_eq!(query.skip, 0);
        assert_eq!(query.limit, 100);
        assert!(query.name_prefix.is_none());
    }

    #[tokio::test]
    async fn refresh_replaces_wholesale() {
        let registry = MetadataDefinitionRegistry::new();
        let source = FixedSource(defs());

        registry.refresh(&source, &DefinitionQuery::new()).await.unwrap();
        assert_eq!(registry.len(), 3);

        registry
            .refresh(&source, &DefinitionQuery::new().with_name_prefix("G"))
            .await
            .unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("Units").is_none());
        assert!(registry.get("GPS").is_some());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous() {
        let registry = MetadataDefinitionRegistry::with_definitions(defs());
        let err = registry
            .refresh(&FailingSource, &DefinitionQuery::new())
            .await
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn stale_install_is_discarded() {
        let registry = MetadataDefinitionRegistry::new();
        let older = registry.next_generation();
        let newer = registry.next_generation();

        registry.install(newer, Paged::complete(defs())).unwrap();
        let err = registry
            .install(older, Paged::complete(Vec::new()))
            .unwrap_err();

        assert!(matches!(err, MetadataError::Superseded { newer: n } if n == newer));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn snapshots_are_not_affected_by_replace() {
        let registry = MetadataDefinitionRegistry::with_definitions(defs());
        let before = registry.snapshot();
        registry.replace(Paged::complete(Vec::new()));
        assert_eq!(before.len(), 3);
        assert!(registry.is_empty());
    }
}
