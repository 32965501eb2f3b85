//! Configuration management for reviewd
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ReviewdError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for reviewd
///
/// Holds everything the service needs: the listen address, the inference
/// provider settings, review generation parameters, and the session
/// storage location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Inference provider configuration (Ollama, OpenAI-compatible)
    pub provider: ProviderConfig,
    /// Review generation parameters
    #[serde(default)]
    pub review: ReviewConfig,
    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8787
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Provider configuration
///
/// Specifies which inference provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("ollama" or "openai")
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: "ollama".to_string(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for reviews
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5-coder:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL; any OpenAI-compatible endpoint works here, which
    /// also allows tests to point the provider at a mock server
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to use for reviews
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key_env: default_openai_key_env(),
        }
    }
}

/// Review generation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Maximum tokens the provider may generate for one review
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature for review generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.3
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory; defaults to the user data directory when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolve the database directory
    ///
    /// Precedence: explicit config value, then the user's application
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns `ReviewdError::Storage` if no data directory can be
    /// determined for the platform.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "reviewd")
            .ok_or_else(|| ReviewdError::Storage("Could not determine data directory".into()))?;
        Ok(proj_dirs.data_dir().join("sessions"))
    }
}

impl Config {
    /// Load configuration from a file with env and CLI overrides applied
    ///
    /// Missing files are not an error; defaults are used so the service
    /// can run with zero configuration against a local Ollama.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReviewdError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ReviewdError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("REVIEWD_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(host) = std::env::var("REVIEWD_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("REVIEWD_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(model) = std::env::var("REVIEWD_OPENAI_MODEL") {
            self.provider.openai.model = model;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ReviewdError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ReviewdError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["ollama", "openai"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(ReviewdError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        url::Url::parse(&self.provider.ollama.host).map_err(|e| {
            ReviewdError::Config(format!(
                "Invalid Ollama host '{}': {}",
                self.provider.ollama.host, e
            ))
        })?;

        url::Url::parse(&self.provider.openai.api_base).map_err(|e| {
            ReviewdError::Config(format!(
                "Invalid OpenAI API base '{}': {}",
                self.provider.openai.api_base, e
            ))
        })?;

        if self.server.port == 0 {
            return Err(ReviewdError::Config("server.port cannot be 0".to_string()).into());
        }

        if self.review.max_tokens == 0 {
            return Err(
                ReviewdError::Config("review.max_tokens must be greater than 0".to_string()).into(),
            );
        }

        if !(0.0..=2.0).contains(&self.review.temperature) {
            return Err(ReviewdError::Config(
                "review.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            provider: ProviderConfig::default(),
            review: ReviewConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}
