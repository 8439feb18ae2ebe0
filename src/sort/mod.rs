//! Sort Module
//!
//! Partition sort engine and the named strategies that drive it.

pub mod engine;
mod strategy;


pub use engine::{infallible, sort, CompareResult, Comparator};
pub use strategy::{alphabetical, by_length, SharedRule, StrategyRegistry, ALPHABETICAL, LENGTH};

/// A record the built-in strategies know how to order.
pub trait SortableRecord {
    /// Name used by the alphabetical and length rules.
    fn name(&self) -> &str;
}

impl SortableRecord for String {
    fn name(&self) -> &str {
        self
    }
}

impl SortableRecord for &str {
    fn name(&self) -> &str {
        self
    }
}
