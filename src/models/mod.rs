//! Data models
//!
//! Records fetched from the upstream API and handed to the sort engine.

mod pokemon;

pub use pokemon::{PokedexPage, Pokemon};
