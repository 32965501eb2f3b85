//! reviewd - session-aware AI code review service
//!
//! This library provides the building blocks of the reviewd service: the
//! per-session review store, prompt templates, inference provider
//! abstractions, the review orchestration flow, and the HTTP API.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: durable per-session review history (the stateful core)
//! - `prompts`: system and user prompt templates
//! - `providers`: inference provider abstraction and implementations
//! - `review`: the submit flow tying store, prompts, and provider together
//! - `server`: axum HTTP API over the review service
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use reviewd::{Cli, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Cli::default())?;
//!     config.validate()?;
//!
//!     // Server startup would go here
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod review;
pub mod server;
pub mod store;

// Re-export commonly used types
pub use cli::Cli;
pub use config::Config;
pub use error::{Result, ReviewdError};
pub use review::{ReviewOutcome, ReviewService, SubmitRequest};
pub use store::SessionStore;

#[cfg(test)]
pub mod test_utils;
