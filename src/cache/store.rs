//! Cache Store Module
//!
//! Sharded key/value storage with per-entry TTL and lazy expiry on read.

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, Sentinel};
use crate::error::{CacheError, Result};
use crate::tasks::Sweep;

// == Cache Store ==
/// Concurrent storage backing an [`ExpiringCache`](crate::cache::ExpiringCache).
///
/// Entries live in a `DashMap`, so operations on unrelated keys only contend
/// when they hash to the same shard.
#[derive(Debug)]
pub struct CacheStore<K, V>
where
    K: Eq + Hash,
{
    /// Key-value storage
    entries: DashMap<K, CacheEntry<V>>,
    /// Performance statistics
    stats: StatsCounters,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Sentinel,
    V: Clone + Sentinel,
{
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsCounters::default(),
        }
    }

    // == Put ==
    /// Stores a value that expires `ttl` from now.
    ///
    /// Any existing entry for the key is replaced, including its expiry.
    pub fn put(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        if key.is_sentinel() {
            return Err(CacheError::InvalidKey("Key cannot be null.".to_string()));
        }
        if value.is_sentinel() {
            return Err(CacheError::InvalidValue(
                "Value cannot be null.".to_string(),
            ));
        }

        self.entries.insert(key, CacheEntry::new(value, ttl));
        Ok(())
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns `Ok(None)` when the key is absent or its entry has expired.
    /// An expired entry is removed unless a concurrent `put` replaced it first.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Sentinel + ?Sized,
    {
        if key.is_sentinel() {
            return Err(CacheError::InvalidKey("Key cannot be null.".to_string()));
        }

        let now = current_timestamp_ms();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.record_hit();
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
            None => false,
        };

        // The shard guard is released here; removing while holding it would deadlock.
        if expired
            && self
                .entries
                .remove_if(key, |_, entry| entry.is_expired_at(now))
                .is_some()
        {
            self.stats.record_lazy_eviction();
        }

        self.stats.record_miss();
        Ok(None)
    }

    // == Remove ==
    /// Removes an entry regardless of expiry, returning its value.
    pub fn remove<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Sentinel + ?Sized,
    {
        if key.is_sentinel() {
            return Err(CacheError::InvalidKey("Key cannot be null.".to_string()));
        }
        Ok(self.entries.remove(key).map(|(_, entry)| entry.value))
    }

    // == Purge Expired ==
    /// Removes all expired entries, locking one shard at a time.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        self.stats.record_swept(removed);
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included until
    /// they are read or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw presence check that ignores expiry.
    pub fn contains_raw<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }
}

impl<K, V> Default for CacheStore<K, V>
where
    K: Eq + Hash + Sentinel,
    V: Clone + Sentinel,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Sweep for CacheStore<K, V>
where
    K: Eq + Hash + Sentinel + Send + Sync + 'static,
    V: Clone + Sentinel + Send + Sync + 'static,
{
    fn sweep(&self) -> usize {
        self.purge_expired()
    }
}
