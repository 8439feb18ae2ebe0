//! Pokemon records
//!
//! Upstream listing payload and the record type ranked by the sort engine.

use serde::{Deserialize, Serialize};

use crate::sort::SortableRecord;

/// A named pokemon, optionally annotated with a highlighted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Name with the search query wrapped in `<pre>` markers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

impl Pokemon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            highlight: None,
        }
    }
}

impl SortableRecord for Pokemon {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One page of the upstream pokemon listing.
///
/// Unknown fields (`count`, `next`, per-entry `url`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokedexPage {
    #[serde(default)]
    pub results: Option<Vec<Pokemon>>,
}

impl PokedexPage {
    pub fn new(results: Vec<Pokemon>) -> Self {
        Self {
            results: Some(results),
        }
    }

    /// Parses a listing body as returned by the upstream API.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_from_upstream_json() {
        let body = br#"{
            "count": 2,
            "next": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }"#;

        let page = PokedexPage::from_json(body).unwrap();
        let results = page.results.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], Pokemon::new("bulbasaur"));
        assert!(results[1].highlight.is_none());
    }

    #[test]
    fn test_page_without_results() {
        let page = PokedexPage::from_json(br#"{"count": 0}"#).unwrap();
        assert!(page.results.is_none());
    }

    #[test]
    fn test_highlight_omitted_when_absent() {
        let json = serde_json::to_value(Pokemon::new("mew")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "mew"}));
    }
}
