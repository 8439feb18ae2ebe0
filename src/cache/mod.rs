//! Cache Module
//!
//! Provides a generic in-memory cache with TTL expiration and background sweeping.

mod entry;
mod expiring;
mod sentinel;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiring::ExpiringCache;
pub use sentinel::Sentinel;
pub use stats::CacheStats;
pub use store::CacheStore;
