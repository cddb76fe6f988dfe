//! Deepbrief Search - web search provider adapters

pub mod provider;
pub mod tavily;

pub use provider::{SearchError, SearchProvider, SearchResult};
pub use tavily::TavilyClient;
