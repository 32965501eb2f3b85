//! Error types for reviewd
//!
//! This module defines all error types used throughout the service,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for reviewd operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, request validation, inference calls, and
/// session persistence.
#[derive(Error, Debug)]
pub enum ReviewdError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request validation errors (missing or empty required fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inference provider errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Session storage errors (load/save of persisted state)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for reviewd operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
