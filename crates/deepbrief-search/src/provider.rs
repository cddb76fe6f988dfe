//! Search provider trait

pub use deepbrief_core::SearchResult;
use deepbrief_core::SearchDepth;

/// Search error types
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited")]
    RateLimited,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Search provider trait.
///
/// `depth` is forwarded opaquely; what it means (result quality, crawl
/// effort) is the provider's business.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
