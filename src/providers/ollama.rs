//! Ollama provider implementation
//!
//! Connects to a local or remote Ollama server via its `/api/chat`
//! endpoint, non-streaming, and returns the generated message content.

use crate::config::OllamaConfig;
use crate::error::{Result, ReviewdError};
use crate::providers::{GenerationOptions, Message, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use reviewd::config::OllamaConfig;
/// use reviewd::providers::{GenerationOptions, Message, OllamaProvider, Provider};
///
/// # async fn example() -> reviewd::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "qwen2.5-coder:latest".to_string(),
/// };
/// let provider = OllamaProvider::new(config)?;
/// let messages = vec![Message::user("Review this")];
/// let options = GenerationOptions { max_tokens: 1024, temperature: 0.3 };
/// let review = provider.generate(&messages, options).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/chat
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

/// Generation options in Ollama format
#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
}

/// Message structure for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama's /api/chat
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("reviewd/0.1.0")
            .build()
            .map_err(|e| ReviewdError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// The configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, messages: &[Message], options: GenerationOptions) -> Result<String> {
        let request = OllamaRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                num_predict: options.max_tokens,
                temperature: options.temperature,
            },
        };

        let url = format!("{}/api/chat", self.config.host);
        tracing::debug!("Sending chat request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to reach Ollama: {}", e);
                ReviewdError::Provider(format!("Failed to connect to Ollama server: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(ReviewdError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            ReviewdError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        if ollama_response.message.content.is_empty() {
            return Err(
                ReviewdError::Provider("Ollama returned an empty completion".to_string()).into(),
            );
        }

        Ok(ollama_response.message.content)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
