//! Upstream fetch contract
//!
//! The service only needs a synchronous call that yields one listing page.

use std::fmt;

use crate::error::UpstreamError;
use crate::models::PokedexPage;

/// Fetches the full pokemon listing from the upstream API.
///
/// `Ok(None)` stands for an empty or absent payload.
pub trait UpstreamFetch: Send + Sync {
    fn fetch(&self) -> Result<Option<PokedexPage>, UpstreamError>;
}

impl<F> UpstreamFetch for F
where
    F: Fn() -> Result<Option<PokedexPage>, UpstreamError> + Send + Sync,
{
    fn fetch(&self) -> Result<Option<PokedexPage>, UpstreamError> {
        self()
    }
}

/// Adapts a raw body transport into an [`UpstreamFetch`] by decoding the
/// listing JSON.
///
/// An empty body is treated as an absent payload.
pub struct JsonFetch<T> {
    transport: T,
}

impl<T> JsonFetch<T>
where
    T: Fn() -> Result<Vec<u8>, UpstreamError> + Send + Sync,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T> UpstreamFetch for JsonFetch<T>
where
    T: Fn() -> Result<Vec<u8>, UpstreamError> + Send + Sync,
{
    fn fetch(&self) -> Result<Option<PokedexPage>, UpstreamError> {
        let body = (self.transport)()?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(PokedexPage::from_json(&body)?))
    }
}

impl<T> fmt::Debug for JsonFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFetch").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pokemon;

    #[test]
    fn test_json_fetch_decodes_body() {
        let fetch = JsonFetch::new(|| Ok(br#"{"results":[{"name":"mew"}]}"#.to_vec()));

        let page = fetch.fetch().unwrap().unwrap();
        assert_eq!(page, PokedexPage::new(vec![Pokemon::new("mew")]));
    }

    #[test]
    fn test_json_fetch_empty_body_is_absent() {
        let fetch = JsonFetch::new(|| Ok(b"  \n".to_vec()));
        assert!(fetch.fetch().unwrap().is_none());
    }

    #[test]
    fn test_json_fetch_surfaces_decode_and_transport_errors() {
        let garbled = JsonFetch::new(|| Ok(b"<html>".to_vec()));
        assert!(garbled.fetch().is_err());

        let down = JsonFetch::new(|| Err("connection refused".into()));
        let err = down.fetch().unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }
}
