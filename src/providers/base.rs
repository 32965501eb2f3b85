//! Base provider trait and common types
//!
//! This module defines the `Provider` trait that all inference providers
//! implement, along with the role-tagged message type and generation
//! parameters shared across implementations.

use crate::config::ReviewConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role-tagged message sent to the inference service
///
/// A review request always carries exactly one system message and one
/// user message; the type stays general so providers remain reusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use reviewd::providers::Message;
    ///
    /// let msg = Message::system("You are a code reviewer");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use reviewd::providers::Message;
    ///
    /// let msg = Message::user("Review this code");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Generation parameters forwarded with every inference request
#[derive(Debug, Clone, Copy)]
pub struct GenerationOptions {
    /// Maximum output length in tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl From<ReviewConfig> for GenerationOptions {
    fn from(config: ReviewConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Provider trait for inference services
///
/// The inference call is treated as a black box: role-tagged messages and
/// generation parameters in, generated text or failure out. No retry and
/// no timeout handling beyond the HTTP client's own.
///
/// # Examples
///
/// ```no_run
/// use reviewd::providers::{GenerationOptions, Message, Provider};
/// use reviewd::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn generate(
///         &self,
///         _messages: &[Message],
///         _options: GenerationOptions,
///     ) -> Result<String> {
///         Ok("Looks fine.".to_string())
///     }
///
///     fn name(&self) -> &str {
///         "my-provider"
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for the given messages
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn generate(&self, messages: &[Message], options: GenerationOptions) -> Result<String>;

    /// Short provider name for logging
    fn name(&self) -> &str;
}
