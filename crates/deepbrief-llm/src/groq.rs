//! Groq chat-completions provider (OpenAI-compatible API)

use crate::provider::{GenRequest, Generator, LlmError, LlmResult, Tier};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_FAST_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_SMART_MODEL: &str = "deepseek-r1-distill-llama-70b";

pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
    fast_model: String,
    smart_model: String,
}

impl GroqProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: GROQ_API_URL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            smart_model: DEFAULT_SMART_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_models(mut self, fast: impl Into<String>, smart: impl Into<String>) -> Self {
        self.fast_model = fast.into();
        self.smart_model = smart.into();
        self
    }
}

#[async_trait::async_trait]
impl Generator for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn model_for(&self, tier: Tier) -> &str {
        match tier {
            Tier::Fast => &self.fast_model,
            Tier::Smart => &self.smart_model,
        }
    }

    async fn generate(&self, request: GenRequest) -> LlmResult<String> {
        let body = ChatRequest {
            model: self.model_for(request.tier).to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: request.prompt,
            }],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!("Groq request: model={}", body.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Groq error {}: {}", status, error_text);

            return Err(match status.as_u16() {
                401 => LlmError::AuthFailed(error_text),
                429 => LlmError::RateLimited { retry_after_ms: 60000 },
                _ => LlmError::RequestFailed(format!("{}: {}", status, error_text)),
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::InvalidResponse("completion had no content".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
