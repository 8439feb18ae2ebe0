//! Pokedex Core - Expiring cache and pluggable sort engine
//!
//! Memoizes an upstream pokemon listing behind a TTL cache with background
//! sweeping, and ranks results with named partition-sort strategies.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod sort;
pub mod tasks;
pub mod telemetry;

pub use cache::ExpiringCache;
pub use config::{CacheConfig, Config};
pub use service::PokedexService;
pub use sort::StrategyRegistry;
pub use tasks::spawn_sweep_task;
