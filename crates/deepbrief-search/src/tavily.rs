//! Tavily search API client

use crate::provider::{SearchError, SearchProvider};
use deepbrief_core::{SearchDepth, SearchResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const TAVILY_API_URL: &str = "https://api.tavily.com";
const DEFAULT_MAX_RESULTS: u32 = 2;

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_results: u32,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: TAVILY_API_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Cap on results per query (clamped to 1-10 by the API).
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, 10);
        self
    }
}

#[async_trait::async_trait]
impl SearchProvider for TavilyClient {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(
        &self,
        query: &str,
        depth: SearchDepth,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let body = TavilyRequest {
            api_key: self.api_key.clone(),
            query: query.to_string(),
            search_depth: depth.as_str().to_string(),
            max_results: self.max_results,
            include_answer: false,
        };

        debug!("Tavily search: '{}' depth={}", query, depth);

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Tavily error {}: {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => SearchError::AuthFailed(error_text),
                429 => SearchError::RateLimited,
                _ => SearchError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(map_results(parsed))
    }
}

/// Flatten the Tavily payload into search results, dropping entries with no url.
pub fn map_results(response: TavilyResponse) -> Vec<SearchResult> {
    response
        .results
        .into_iter()
        .filter(|r| !r.url.is_empty())
        .map(|r| SearchResult {
            url: r.url,
            title: r.title,
            snippet: r.content,
        })
        .collect()
}

#[derive(Serialize)]
pub struct TavilyRequest {
    pub api_key: String,
    pub query: String,
    pub search_depth: String,
    pub max_results: u32,
    pub include_answer: bool,
}

#[derive(Deserialize)]
pub struct TavilyResponse {
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
pub struct TavilyResult {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}
