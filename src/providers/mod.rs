//! Inference provider abstraction and implementations
//!
//! This module contains the provider trait plus the Ollama and
//! OpenAI-compatible clients, and a scripted double used by tests.

pub mod base;
pub mod fake;
pub mod ollama;
pub mod openai;

pub use base::{GenerationOptions, Message, Provider};
pub use fake::{FakeProvider, RecordedCall};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, ReviewdError};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone())?)),
        "openai" => Ok(Arc::new(OpenAiProvider::new(config.openai.clone())?)),
        other => Err(ReviewdError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
