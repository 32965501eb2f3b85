//! OpenAI-compatible provider implementation
//!
//! Speaks the `/chat/completions` wire format with bearer authentication.
//! Any endpoint implementing that shape works; the configurable API base
//! also allows tests to point the provider at a mock server.

use crate::config::OpenAiConfig;
use crate::error::{Result, ReviewdError};
use crate::providers::{GenerationOptions, Message, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

/// Request structure for the chat completions API
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Message structure for the chat completions API
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from the chat completions API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Choice in a chat completions response
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiProvider {
    /// Create a new provider instance
    ///
    /// The API key is read from the environment variable named in the
    /// configuration (default `OPENAI_API_KEY`).
    ///
    /// # Errors
    ///
    /// Returns `ReviewdError::MissingCredentials` if the key variable is
    /// unset or empty, and a provider error if client initialization
    /// fails.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
        if api_key.is_empty() {
            return Err(ReviewdError::MissingCredentials(format!(
                "openai (expected key in ${})",
                config.api_key_env
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("reviewd/0.1.0")
            .build()
            .map_err(|e| ReviewdError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized OpenAI-compatible provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(&self, messages: &[Message], options: GenerationOptions) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let url = format!("{}/chat/completions", self.config.api_base);
        tracing::debug!("Sending chat request: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach inference endpoint: {}", e);
                ReviewdError::Provider(format!("Failed to connect to inference endpoint: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Inference endpoint returned {}: {}", status, error_text);
            return Err(ReviewdError::Provider(format!(
                "Inference endpoint returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completions response: {}", e);
            ReviewdError::Provider(format!("Failed to parse completions response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        if content.is_empty() {
            return Err(
                ReviewdError::Provider("Inference endpoint returned no completion".to_string())
                    .into(),
            );
        }

        Ok(content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
