//! Pokedex Service
//!
//! Memoizes the upstream listing, filters it by a search query and ranks the
//! result with a named sort strategy.

mod upstream;

pub use upstream::{JsonFetch, UpstreamFetch};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ExpiringCache};
use crate::config::Config;
use crate::error::ServiceError;
use crate::models::Pokemon;
use crate::sort::StrategyRegistry;
use crate::tasks::ObservabilitySink;

/// Cache key for the full upstream listing.
pub const ALL_POKEMONS_KEY: &str = "all_pokemons";

/// Marker wrapped around matches in highlighted names.
const HIGHLIGHT_OPEN: &str = "<pre>";
const HIGHLIGHT_CLOSE: &str = "</pre>";

type ListingCache = ExpiringCache<String, Arc<Vec<Pokemon>>>;

/// Search and ranking over the upstream pokemon listing.
pub struct PokedexService<F> {
    upstream: F,
    cache: ListingCache,
    registry: StrategyRegistry<Pokemon>,
    cache_ttl: Duration,
    default_sort: String,
}

impl<F: UpstreamFetch> PokedexService<F> {
    /// Builds the service with the built-in sort strategies.
    ///
    /// Must run inside a tokio runtime, which hosts the cache sweep.
    pub fn new(upstream: F, config: &Config) -> Result<Self, ServiceError> {
        let cache = ExpiringCache::new(&config.cache_config())?;
        Ok(Self::with_parts(upstream, cache, StrategyRegistry::with_defaults(), config))
    }

    /// Builds the service reporting sweep failures to `sink`.
    pub fn with_sink(
        upstream: F,
        config: &Config,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Result<Self, ServiceError> {
        let cache = ExpiringCache::with_sink(&config.cache_config(), sink)?;
        Ok(Self::with_parts(upstream, cache, StrategyRegistry::with_defaults(), config))
    }

    /// Replaces the strategy table, e.g. to plug in extra rules.
    pub fn with_registry(mut self, registry: StrategyRegistry<Pokemon>) -> Self {
        self.registry = registry;
        self
    }

    fn with_parts(
        upstream: F,
        cache: ListingCache,
        registry: StrategyRegistry<Pokemon>,
        config: &Config,
    ) -> Self {
        Self {
            upstream,
            cache,
            registry,
            cache_ttl: config.cache_ttl(),
            default_sort: config.default_sort.clone(),
        }
    }

    // == Listing ==
    /// Returns the full listing, fetching it upstream on a cache miss.
    ///
    /// Transport failures and empty payloads both surface as
    /// [`ServiceError::UpstreamUnavailable`]; nothing is retried.
    pub fn all_pokemons(&self) -> Result<Arc<Vec<Pokemon>>, ServiceError> {
        if let Some(cached) = self.cache.get(ALL_POKEMONS_KEY)? {
            debug!("listing served from cache ({} records)", cached.len());
            return Ok(cached);
        }

        let page = self.upstream.fetch().map_err(|err| {
            warn!(error = %err, "upstream fetch failed");
            ServiceError::UpstreamUnavailable(format!("Failed to fetch data from upstream: {err}"))
        })?;

        let pokemons = page
            .and_then(|page| page.results)
            .filter(|results| !results.is_empty())
            .map(Arc::new)
            .ok_or_else(|| {
                warn!("upstream returned an empty listing");
                ServiceError::UpstreamUnavailable("Empty or invalid response from upstream".to_string())
            })?;

        self.cache
            .put(ALL_POKEMONS_KEY.to_string(), Arc::clone(&pokemons), self.cache_ttl)?;
        info!("listing fetched upstream and cached ({} records)", pokemons.len());
        Ok(pokemons)
    }

    // == Filter ==
    /// Keeps records whose name contains `query`, ignoring case.
    ///
    /// A missing or empty query keeps everything.
    pub fn filter(&self, records: &[Pokemon], query: Option<&str>) -> Vec<Pokemon> {
        match query.filter(|q| !q.is_empty()) {
            None => records.to_vec(),
            Some(query) => {
                let needle = query.to_lowercase();
                records
                    .iter()
                    .filter(|p| p.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
        }
    }

    // == Sort ==
    /// Sorts `records` in place with the named strategy, falling back to the
    /// configured default when `strategy` is `None`.
    pub fn sort<'a>(
        &self,
        records: &'a mut [Pokemon],
        strategy: Option<&str>,
    ) -> Result<&'a mut [Pokemon], ServiceError> {
        let name = strategy.unwrap_or(self.default_sort.as_str());
        Ok(self.registry.resolve_and_sort(records, name)?)
    }

    // == Highlight ==
    /// Annotates every record with its name, wrapping occurrences of `query`
    /// in `<pre>` markers when the name matches.
    ///
    /// Matching ignores case but the replacement is literal, so a name that
    /// only matches case-insensitively keeps its plain spelling.
    pub fn highlight(&self, records: &mut [Pokemon], query: Option<&str>) {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return;
        };

        let needle = query.to_lowercase();
        let marked = format!("{HIGHLIGHT_OPEN}{query}{HIGHLIGHT_CLOSE}");
        for record in records.iter_mut() {
            let highlighted = if record.name.to_lowercase().contains(&needle) {
                record.name.replace(query, &marked)
            } else {
                record.name.clone()
            };
            record.highlight = Some(highlighted);
        }
    }

    // == Pipelines ==
    /// Fetch, filter and sort.
    pub fn list(&self, query: Option<&str>, strategy: Option<&str>) -> Result<Vec<Pokemon>, ServiceError> {
        let all = self.all_pokemons()?;
        let mut records = self.filter(&all, query);
        self.sort(&mut records, strategy)?;
        Ok(records)
    }

    /// Same as [`list`](Self::list), reduced to names.
    pub fn list_names(&self, query: Option<&str>, strategy: Option<&str>) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .list(query, strategy)?
            .into_iter()
            .map(|p| p.name)
            .collect())
    }

    /// Fetch, filter, sort and highlight.
    pub fn list_highlighted(
        &self,
        query: Option<&str>,
        strategy: Option<&str>,
    ) -> Result<Vec<Pokemon>, ServiceError> {
        let mut records = self.list(query, strategy)?;
        self.highlight(&mut records, query);
        Ok(records)
    }

    // == Lifecycle ==
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops the memoized listing so the next call refetches.
    pub fn invalidate(&self) -> Result<(), ServiceError> {
        self.cache.remove(ALL_POKEMONS_KEY)?;
        Ok(())
    }

    /// Stops the cache's background sweep.
    pub fn shutdown(&self) {
        self.cache.shutdown();
    }
}
