//! Expiring Cache Module
//!
//! Couples a [`CacheStore`] with the background sweep that owns its lifecycle.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, Sentinel};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, ObservabilitySink, TracingSink};

// == Expiring Cache ==
/// Generic TTL cache with a background reaper.
///
/// Construction starts the sweep on the current tokio runtime; [`shutdown`]
/// or dropping the cache stops it.
///
/// [`shutdown`]: ExpiringCache::shutdown
#[derive(Debug)]
pub struct ExpiringCache<K, V>
where
    K: Eq + Hash,
{
    store: Arc<CacheStore<K, V>>,
    sweep: JoinHandle<()>,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Sentinel + Send + Sync + 'static,
    V: Clone + Sentinel + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache whose sweep failures are logged through `tracing`.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(TracingSink))
    }

    /// Creates a cache that reports sweep failures to `sink`.
    ///
    /// Fails with [`CacheError::NoRuntime`] when called outside a tokio runtime.
    pub fn with_sink(config: &CacheConfig, sink: Arc<dyn ObservabilitySink>) -> Result<Self> {
        Handle::try_current().map_err(|err| CacheError::NoRuntime(err.to_string()))?;

        let store = Arc::new(CacheStore::new());
        let sweep = spawn_sweep_task(Arc::clone(&store), config.sweep_interval, sink);
        info!(
            "Expiring cache initialized: sweep_interval={:?}",
            config.sweep_interval
        );

        Ok(Self { store, sweep })
    }

    /// Stores `value` under `key` for `ttl`, replacing any existing entry.
    pub fn put(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.store.put(key, value, ttl)
    }

    /// Returns the live value for `key`, or `None` when absent or expired.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Sentinel + ?Sized,
    {
        self.store.get(key)
    }

    pub fn remove<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Sentinel + ?Sized,
    {
        self.store.remove(key)
    }

    /// Runs a sweep pass immediately, outside the schedule.
    pub fn purge_expired(&self) -> usize {
        self.store.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Raw presence check that ignores expiry.
    pub fn contains_raw<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains_raw(key)
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
{
    // == Shutdown ==
    /// Stops the background sweep. Reads and writes keep working.
    pub fn shutdown(&self) {
        if !self.sweep.is_finished() {
            self.sweep.abort();
            debug!("TTL sweep task aborted");
        }
    }

    /// Returns true until the sweep has fully stopped.
    pub fn is_sweeping(&self) -> bool {
        !self.sweep.is_finished()
    }
}

impl<K, V> Drop for ExpiringCache<K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        self.sweep.abort();
    }
}
