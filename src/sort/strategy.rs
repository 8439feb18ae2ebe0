//! Sort Strategy Registry
//!
//! Maps strategy names to comparison rules and runs the partition sort with
//! the resolved rule.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::StrategyError;
use crate::sort::engine::{self, CompareResult, Comparator};
use crate::sort::SortableRecord;

/// Name of the lexicographic strategy.
pub const ALPHABETICAL: &str = "alphabetical";
/// Name of the name-length strategy.
pub const LENGTH: &str = "length";

/// A comparison rule shared across callers.
pub type SharedRule<T> = Arc<dyn Comparator<T> + Send + Sync>;

// == Built-in Rules ==
/// Orders records lexicographically by name, ascending.
pub fn alphabetical<T: SortableRecord>(left: &T, right: &T) -> CompareResult {
    Ok(left.name().cmp(right.name()))
}

/// Orders records by the character count of their name, ascending.
///
/// Equal-length names come out in no particular order.
pub fn by_length<T: SortableRecord>(left: &T, right: &T) -> CompareResult {
    Ok(left.name().chars().count().cmp(&right.name().chars().count()))
}

// == Strategy Registry ==
/// Lookup table from normalized strategy name to rule.
///
/// Names are matched after trimming surrounding whitespace and lower-casing,
/// so `" Alphabetical "` resolves to `"alphabetical"`.
pub struct StrategyRegistry<T> {
    rules: HashMap<String, SharedRule<T>>,
}

impl<T> StrategyRegistry<T> {
    /// Creates a registry with no strategies.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces the rule registered under `name`.
    ///
    /// A blank name could never be resolved, so the rule is dropped and a
    /// warning logged.
    pub fn register<R>(mut self, name: &str, rule: R) -> Self
    where
        R: Comparator<T> + Send + Sync + 'static,
    {
        let normalized = normalize(name);
        if normalized.is_empty() {
            warn!("ignoring sort strategy registered under a blank name");
            return self;
        }

        self.rules.insert(normalized, Arc::new(rule));
        self
    }

    /// Looks up the rule for `name`.
    pub fn resolve(&self, name: &str) -> Result<SharedRule<T>, StrategyError> {
        let normalized = normalize(name);
        if normalized.is_empty() {
            return Err(StrategyError::InvalidStrategyName);
        }

        self.rules
            .get(&normalized)
            .cloned()
            .ok_or(StrategyError::UnknownStrategy(normalized))
    }

    /// Sorts `records` in place with the rule registered under `name` and
    /// hands the same slice back.
    ///
    /// Slices of zero or one record are returned untouched once the name has
    /// resolved.
    pub fn resolve_and_sort<'a>(
        &self,
        records: &'a mut [T],
        name: &str,
    ) -> Result<&'a mut [T], StrategyError> {
        let rule = self.resolve(name)?;
        if records.len() <= 1 {
            return Ok(records);
        }

        debug!(strategy = %normalize(name), len = records.len(), "sorting records");
        engine::sort(records, rule.as_ref())
            .map_err(|source| StrategyError::SortingFailed { source })?;
        Ok(records)
    }

    /// Returns registered names in ascending order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<T: SortableRecord + 'static> StrategyRegistry<T> {
    /// Creates a registry holding the built-in strategies.
    pub fn with_defaults() -> Self {
        Self::empty()
            .register(ALPHABETICAL, alphabetical::<T>)
            .register(LENGTH, by_length::<T>)
    }
}

impl<T: SortableRecord + 'static> Default for StrategyRegistry<T> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<T> fmt::Debug for StrategyRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SortError;
    use crate::models::Pokemon;
    use std::cmp::Ordering;

    fn pokemons(names: &[&str]) -> Vec<Pokemon> {
        names.iter().map(|name| Pokemon::new(*name)).collect()
    }

    fn names(records: &[Pokemon]) -> Vec<&str> {
        records.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_alphabetical_scenario() {
        let registry = StrategyRegistry::with_defaults();
        let mut records = pokemons(&["charizard", "pikachu", "bulbasaur"]);

        let sorted = registry.resolve_and_sort(&mut records, "alphabetical").unwrap();

        assert_eq!(names(sorted), vec!["bulbasaur", "charizard", "pikachu"]);
    }

    #[test]
    fn test_length_scenario() {
        let registry = StrategyRegistry::with_defaults();
        let mut records = pokemons(&["pikachu", "bulbasaur", "charizard"]);

        registry.resolve_and_sort(&mut records, "length").unwrap();

        assert_eq!(records[0].name, "pikachu");
        let mut tail = names(&records[1..]);
        tail.sort_unstable();
        assert_eq!(tail, vec!["bulbasaur", "charizard"]);
    }

    #[test]
    fn test_name_is_trimmed_and_case_insensitive() {
        let registry = StrategyRegistry::with_defaults();
        let mut records = pokemons(&["charizard", "pikachu", "bulbasaur"]);

        registry.resolve_and_sort(&mut records, " Alphabetical ").unwrap();

        assert_eq!(names(&records), vec!["bulbasaur", "charizard", "pikachu"]);
        assert!(registry.resolve("\tLENGTH\n").is_ok());
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let registry = StrategyRegistry::<Pokemon>::with_defaults();
        let mut records = pokemons(&["mew"]);

        for name in ["", "   ", "\t\n"] {
            let result = registry.resolve_and_sort(&mut records, name);
            assert!(matches!(result, Err(StrategyError::InvalidStrategyName)));
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let registry = StrategyRegistry::<Pokemon>::with_defaults();
        let mut records = pokemons(&["mew", "abra"]);

        let result = registry.resolve_and_sort(&mut records, " Weight ");
        assert!(matches!(result, Err(StrategyError::UnknownStrategy(name)) if name == "weight"));
        // Input untouched on a failed lookup.
        assert_eq!(names(&records), vec!["mew", "abra"]);
    }

    #[test]
    fn test_unknown_name_rejected_even_for_empty_input() {
        let registry = StrategyRegistry::<Pokemon>::with_defaults();
        let mut records: Vec<Pokemon> = Vec::new();

        let result = registry.resolve_and_sort(&mut records, "weight");
        assert!(matches!(result, Err(StrategyError::UnknownStrategy(_))));
    }

    #[test]
    fn test_trivial_inputs_skip_engine() {
        let registry = StrategyRegistry::<Pokemon>::with_defaults();

        let mut empty: Vec<Pokemon> = Vec::new();
        assert!(registry.resolve_and_sort(&mut empty, "length").unwrap().is_empty());

        let mut single = pokemons(&["ditto"]);
        let sorted = registry.resolve_and_sort(&mut single, "alphabetical").unwrap();
        assert_eq!(names(sorted), vec!["ditto"]);
    }

    #[test]
    fn test_engine_failure_is_wrapped_with_cause() {
        let registry = StrategyRegistry::<Pokemon>::empty().register(
            "broken",
            |_: &Pokemon, _: &Pokemon| -> CompareResult { Err("rule exploded".into()) },
        );
        let mut records = pokemons(&["mew", "abra"]);

        let err = registry.resolve_and_sort(&mut records, "broken").unwrap_err();
        match err {
            StrategyError::SortingFailed {
                source: SortError::ComparisonFailed { source },
            } => assert_eq!(source.to_string(), "rule exploded"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_panicking_rule_is_wrapped_as_sorting_failure() {
        let registry = StrategyRegistry::<Pokemon>::empty().register(
            "boom",
            |a: &Pokemon, b: &Pokemon| -> CompareResult {
                Ok(a.name.as_bytes()[10].cmp(&b.name.as_bytes()[10]))
            },
        );
        let mut records = pokemons(&["mew", "abra"]);

        let err = registry.resolve_and_sort(&mut records, "boom").unwrap_err();
        assert!(matches!(
            err,
            StrategyError::SortingFailed {
                source: SortError::ComparisonFailed { .. }
            }
        ));
        let mut after = names(&records);
        after.sort_unstable();
        assert_eq!(after, vec!["abra", "mew"]);
    }

    #[test]
    fn test_blank_registration_is_ignored() {
        let registry = StrategyRegistry::<Pokemon>::empty()
            .register("  ", engine::infallible(|a: &Pokemon, b: &Pokemon| a.name.cmp(&b.name)))
            .register("", alphabetical::<Pokemon>);

        assert!(registry.names().is_empty());
        assert!(matches!(
            registry.resolve(" "),
            Err(StrategyError::InvalidStrategyName)
        ));
    }

    #[test]
    fn test_new_strategy_plugs_in_without_engine_changes() {
        let registry = StrategyRegistry::<Pokemon>::with_defaults().register(
            "Reverse",
            engine::infallible(|a: &Pokemon, b: &Pokemon| b.name.cmp(&a.name)),
        );
        let mut records = pokemons(&["abra", "mew", "ditto"]);

        registry.resolve_and_sort(&mut records, "reverse").unwrap();

        assert_eq!(names(&records), vec!["mew", "ditto", "abra"]);
        assert_eq!(registry.names(), vec!["alphabetical", "length", "reverse"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let a = Pokemon::new("flabébé");
        let b = Pokemon::new("flabebes");
        assert_eq!(by_length(&a, &b).unwrap(), Ordering::Less);
    }
}
