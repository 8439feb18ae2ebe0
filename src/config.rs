//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::sort::ALPHABETICAL;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL in seconds for the memoized upstream listing
    pub cache_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Strategy used when a caller names none
    pub default_sort: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Listing TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `DEFAULT_SORT` - Fallback sort strategy (default: alphabetical)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            default_sort: env::var("DEFAULT_SORT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.default_sort),
        }
    }

    /// TTL applied to the memoized listing.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Settings for the expiring cache.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            sweep_interval: Duration::from_secs(self.sweep_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: 300,
            sweep_interval: 60,
            default_sort: ALPHABETICAL.to_string(),
        }
    }
}

/// Expiring cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time between two background sweep passes
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
