//! Generator trait and request types

use serde::{Deserialize, Serialize};

/// Result type for generator operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Generator error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("rate limited: retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {elapsed_ms}ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("{schema} failed validation after {attempts} attempts: {message}")]
    SchemaViolation {
        schema: &'static str,
        attempts: u32,
        message: String,
    },

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Generator capability tier.
///
/// Fast handles high-volume short tasks (context recall, per-source
/// summaries); Smart handles planning and synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Fast,
    Smart,
}

/// A single generation request
#[derive(Clone, Debug)]
pub struct GenRequest {
    pub prompt: String,
    pub tier: Tier,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenRequest {
    pub fn fast(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            tier: Tier::Fast,
            max_tokens: Some(2048),
            temperature: Some(0.2),
        }
    }

    pub fn smart(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            tier: Tier::Smart,
            max_tokens: Some(8192),
            temperature: Some(0.6),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Generator trait - one completion per call, no streaming
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Model id used for the given tier.
    fn model_for(&self, tier: Tier) -> &str;

    async fn generate(&self, request: GenRequest) -> LlmResult<String>;
}
