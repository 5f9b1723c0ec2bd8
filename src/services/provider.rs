use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ArticleDetails, Candidate, Coordinate};

/// Errors that can occur when talking to a search provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

/// External geosearch / text-search backend
///
/// Implemented by `WikipediaClient` in production and by in-memory stubs
/// in tests. An empty result is a normal answer, not an error.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Articles within `radius_m` meters of `center`, at most `limit`.
    async fn geosearch(
        &self,
        center: Coordinate,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<Candidate>, ProviderError>;

    /// Articles matching a free-text query, at most `limit`.
    /// Returned candidates carry neither coordinate nor thumbnail.
    async fn text_search(&self, query: &str, limit: usize)
        -> Result<Vec<Candidate>, ProviderError>;

    /// Coordinate and thumbnail for each requested identity.
    /// Identities the provider knows nothing about may be absent from the map.
    async fn article_details(
        &self,
        identities: &[String],
    ) -> Result<HashMap<String, ArticleDetails>, ProviderError>;

    /// Largest radius `geosearch` honours. Wider requests behave like this one.
    fn max_radius_m(&self) -> Option<f64> {
        None
    }
}
