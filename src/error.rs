//! Error types for the cache, sort engine and service layer
//!
//! Provides unified error handling using thiserror.

use std::any::Any;

use thiserror::Error;

/// Boxed error raised by a comparison rule.
pub type ComparatorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Boxed transport error raised by an upstream fetch.
pub type UpstreamError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Errors raised by the expiring cache.
///
/// A missing or expired key is not an error; `get` reports it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is the null/zero sentinel for its type
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value is the null/zero sentinel for its type
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A background sweep pass failed
    #[error("Cache cleanup failed: {0}")]
    CleanupFailed(String),

    /// The cache was built outside a tokio runtime
    #[error("No async runtime available for the sweep task: {0}")]
    NoRuntime(String),
}

// == Sort Error Enum ==
/// Errors raised by the partition sort.
#[derive(Error, Debug)]
pub enum SortError {
    /// Sorting requires at least one element
    #[error("List of items cannot be empty")]
    EmptySequence,

    /// Partition or swap touched an index outside the slice
    #[error("Invalid indices: left={left}, right={right}, len={len}")]
    IndexOutOfRange {
        left: usize,
        right: usize,
        len: usize,
    },

    /// The comparison rule returned an error
    #[error("Error occurred during comparison of records")]
    ComparisonFailed {
        #[source]
        source: ComparatorError,
    },
}

// == Strategy Error Enum ==
/// Errors raised while resolving a named sort strategy.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Strategy name was empty or whitespace only
    #[error("Sort type cannot be null or empty")]
    InvalidStrategyName,

    /// No rule registered under the normalized name
    #[error("Unknown sort strategy: {0}")]
    UnknownStrategy(String),

    /// The engine failed while applying the resolved rule
    #[error("An error occurred while sorting the list")]
    SortingFailed {
        #[source]
        source: SortError,
    },
}

// == Service Error Enum ==
/// Errors surfaced by the data service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Upstream fetch failed or returned an empty payload
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Extracts the message carried by a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
