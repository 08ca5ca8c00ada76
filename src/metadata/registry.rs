//! Provider registry for managing multiple [`MetadataProvider`] implementations.
//!
//! The [`ProviderRegistry`] aggregates metadata providers and exposes a unified
//! interface for searching across all configured backends. Results from multiple
//! providers are merged, deduplicated, and sorted by confidence.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use super::provider::{EpisodeMetadata, MetadataProvider, SearchResult, SeriesMetadata};

/// Series details together with the provider that supplied them.
#[derive(Debug, Clone)]
pub struct SeriesMatch {
    pub provider: &'static str,
    pub metadata: SeriesMetadata,
}

/// A registry that manages multiple [`MetadataProvider`] implementations.
///
/// Providers are stored in registration order. When performing a search the
/// registry queries every *available* provider, merges the results, deduplicates
/// entries that share the same title and year (keeping the highest-confidence
/// hit), and returns them sorted by descending confidence.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vidshelf::metadata::registry::ProviderRegistry;
///
/// let mut registry = ProviderRegistry::new();
/// registry.register(Arc::new(my_provider));
///
/// let found = registry.lookup("Breaking Bad", Some(2008)).await?;
/// ```
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Register a new metadata provider.
    ///
    /// Providers are stored in the order they are registered. The first
    /// available provider becomes the *primary* provider.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) {
        self.providers.push(provider);
    }

    /// Return references to all providers that are currently available
    /// (i.e. configured with valid credentials).
    pub fn available(&self) -> Vec<&dyn MetadataProvider> {
        self.providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.as_ref())
            .collect()
    }

    /// Return the first available provider, or `None` if no providers are
    /// configured / available.
    pub fn primary(&self) -> Option<&dyn MetadataProvider> {
        self.providers
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.as_ref())
    }

    /// Look up a provider by its [`MetadataProvider::name`].
    ///
    /// Returns `None` if no provider with the given name has been registered.
    pub fn get(&self, name: &str) -> Option<&dyn MetadataProvider> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// Search for series across all available providers.
    ///
    /// Results are merged and deduplicated: when multiple providers return
    /// results with the same title (case-insensitive) **and** year, only the
    /// entry with the highest confidence is kept. The final list is sorted by
    /// descending confidence.
    pub async fn search_series(
        &self,
        title: &str,
        year: Option<u16>,
    ) -> Result<Vec<SearchResult>> {
        let available = self.available();
        if available.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_results: Vec<SearchResult> = Vec::new();
        for provider in &available {
            match provider.search_series(title, year).await {
                Ok(results) => all_results.extend(results),
                Err(e) => {
                    warn!(provider = provider.name(), title, error = %e, "Series search failed");
                    continue;
                }
            }
        }

        let mut seen = HashMap::<(String, Option<u16>), usize>::new();
        let mut deduped: Vec<SearchResult> = Vec::new();

        for result in all_results {
            let key = (result.title.to_lowercase(), result.year);
            if let Some(&idx) = seen.get(&key) {
                if result.confidence > deduped[idx].confidence {
                    deduped[idx] = result;
                }
            } else {
                seen.insert(key, deduped.len());
                deduped.push(result);
            }
        }

        deduped.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(deduped)
    }

    /// Resolve a title to full series details using the best search hit.
    ///
    /// Returns `Ok(None)` when nothing matched.
    pub async fn lookup(&self, title: &str, year: Option<u16>) -> Result<Option<SeriesMatch>> {
        let results = self.search_series(title, year).await?;
        let Some(best) = results.into_iter().next() else {
            debug!(title, ?year, "No series match");
            return Ok(None);
        };

        let provider = self
            .get(&best.provider_name)
            .ok_or_else(|| anyhow!("unknown provider: {}", best.provider_name))?;
        let metadata = provider
            .get_series(&best.id)
            .await
            .with_context(|| format!("failed to fetch series {} from {}", best.id, provider.name()))?;

        Ok(Some(SeriesMatch {
            provider: provider.name(),
            metadata,
        }))
    }

    /// Fetch series details by a known id from the primary provider.
    pub async fn fetch_series(&self, provider_id: &str) -> Result<SeriesMatch> {
        let provider = self
            .primary()
            .ok_or_else(|| anyhow!("no metadata provider available"))?;
        let metadata = provider
            .get_series(provider_id)
            .await
            .with_context(|| format!("failed to fetch series {provider_id} from {}", provider.name()))?;
        Ok(SeriesMatch {
            provider: provider.name(),
            metadata,
        })
    }

    /// Fetch one season's episodes from the named provider.
    pub async fn season_episodes(
        &self,
        provider: &str,
        provider_id: &str,
        season: u32,
    ) -> Result<Vec<EpisodeMetadata>> {
        let provider = self
            .get(provider)
            .ok_or_else(|| anyhow!("unknown provider: {provider}"))?;
        provider.get_season_episodes(provider_id, season).await
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// A minimal stub provider used for testing.
    struct StubProvider {
        provider_name: &'static str,
        available: bool,
        fail_search: bool,
        results: Vec<SearchResult>,
    }

    impl StubProvider {
        fn new(provider_name: &'static str, available: bool, results: Vec<SearchResult>) -> Self {
            Self {
                provider_name,
                available,
                fail_search: false,
                results,
            }
        }
    }

    #[async_trait]
    impl MetadataProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.provider_name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn search_series(
            &self,
            _title: &str,
            _year: Option<u16>,
        ) -> Result<Vec<SearchResult>> {
            if self.fail_search {
                anyhow::bail!("search unavailable");
            }
            Ok(self.results.clone())
        }

        async fn get_series(&self, provider_id: &str) -> Result<SeriesMetadata> {
            let hit = self
                .results
                .iter()
                .find(|r| r.id == provider_id)
                .ok_or_else(|| anyhow!("not found"))?;
            Ok(SeriesMetadata {
                canonical_id: hit.id.clone(),
                title: hit.title.clone(),
                year: hit.year,
                ..SeriesMetadata::default()
            })
        }

        async fn get_season_episodes(
            &self,
            _provider_id: &str,
            _season: u32,
        ) -> Result<Vec<EpisodeMetadata>> {
            Ok(Vec::new())
        }
    }

    fn make_result(title: &str, year: Option<u16>, confidence: f64, provider: &str) -> SearchResult {
        SearchResult {
            id: format!("{provider}-{title}"),
            title: title.to_string(),
            year,
            overview: None,
            confidence,
            provider_name: provider.to_string(),
            poster_url: None,
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ProviderRegistry::new();
        assert!(registry.available().is_empty());
        assert!(registry.primary().is_none());
        assert!(registry.get("tmdb").is_none());
    }

    #[test]
    fn register_and_lookup_by_name() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new("tmdb", true, Vec::new())));
        registry.register(Arc::new(StubProvider::new("tvdb", false, Vec::new())));

        assert_eq!(registry.available().len(), 1);
        assert_eq!(registry.primary().unwrap().name(), "tmdb");
        assert!(registry.get("tmdb").is_some());
        assert!(registry.get("tvdb").is_some()); // registered but not available
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn primary_returns_first_available() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new("offline", false, Vec::new())));
        registry.register(Arc::new(StubProvider::new("online", true, Vec::new())));

        assert_eq!(registry.primary().unwrap().name(), "online");
    }

    #[tokio::test]
    async fn search_merges_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new(
            "provider_a",
            true,
            vec![make_result("Breaking Bad", Some(2008), 0.95, "provider_a")],
        )));
        registry.register(Arc::new(StubProvider::new(
            "provider_b",
            true,
            vec![make_result("Better Call Saul", Some(2015), 0.90, "provider_b")],
        )));

        let results = registry.search_series("test", None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Breaking Bad");
        assert_eq!(results[1].title, "Better Call Saul");
    }

    #[tokio::test]
    async fn search_deduplicates_case_insensitively() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new(
            "low",
            true,
            vec![make_result("dark", Some(2017), 0.70, "low")],
        )));
        registry.register(Arc::new(StubProvider::new(
            "high",
            true,
            vec![make_result("Dark", Some(2017), 0.99, "high")],
        )));

        let results = registry.search_series("Dark", Some(2017)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].provider_name, "high");
        assert!((results[0].confidence - 0.99).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn search_skips_unavailable_and_failing_providers() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new(
            "offline",
            false,
            vec![make_result("Ghost", Some(1990), 0.99, "offline")],
        )));
        registry.register(Arc::new(StubProvider {
            fail_search: true,
            ..StubProvider::new("broken", true, Vec::new())
        }));
        registry.register(Arc::new(StubProvider::new(
            "online",
            true,
            vec![make_result("Real Result", Some(2020), 0.85, "online")],
        )));

        let results = registry.search_series("test", None).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Real Result");
    }

    #[tokio::test]
    async fn lookup_fetches_best_hit() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(StubProvider::new(
            "tmdb",
            true,
            vec![
                make_result("The Office", Some(2001), 0.6, "tmdb"),
                make_result("The Office", Some(2005), 0.9, "tmdb"),
            ],
        )));

        let found = registry.lookup("The Office", Some(2005)).await.unwrap().unwrap();
        assert_eq!(found.provider, "tmdb");
        assert_eq!(found.metadata.year, Some(2005));
    }

    #[tokio::test]
    async fn lookup_without_hits_is_none() {
        let registry = ProviderRegistry::new();
        assert!(registry.lookup("anything", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_series_requires_primary() {
        let registry = ProviderRegistry::new();
        assert!(registry.fetch_series("1396").await.is_err());
    }
}
