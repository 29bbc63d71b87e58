//! Text-generation backend for personalized notes

use crate::config::GenerationConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Generation backend errors. All of them are recoverable at the engine
/// level: the affected development falls back to the rule templates.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("text generation is disabled")]
    Disabled,

    #[error("initialization error: {0}")]
    InitializationError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("network error: {0}")]
    NetworkError(String),
}

/// Seam over the text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a prompt. Single attempt with a bounded timeout; a slow
    /// backend is reported as a network error, not awaited indefinitely.
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, GenerationError>;
}

/// OpenAI-compatible chat-completions client.
pub struct LlmGenerator {
    client: Client,
    config: GenerationConfig,
}

impl LlmGenerator {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| GenerationError::InitializationError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, GenerationError> {
        if !self.config.enabled {
            return Err(GenerationError::Disabled);
        }

        debug!("Requesting completion: {} prompt chars", prompt.len());

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a prenatal care assistant. Answer only with the \
                              requested JSON object, no surrounding prose."
                        .to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: Some(max_tokens),
            temperature: Some(self.config.temperature),
        };

        let mut req = self.client.post(&self.config.api_url).json(&request);
        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req
            .send()
            .await
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ApiError(format!("failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::ApiError("no choices in response".to_string()))
    }
}

// OpenAI-compatible API types
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
