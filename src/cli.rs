//! Command-line interface definition for reviewd
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the server command and session inspection commands.

use clap::{Parser, Subcommand};

/// reviewd - session-aware AI code review service
///
/// Serves an HTTP API that reviews submitted code through an inference
/// provider and keeps a per-session history so later submissions are
/// reviewed as follow-ups.
#[derive(Parser, Debug, Clone)]
#[command(name = "reviewd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the session database directory
    #[arg(long, env = "REVIEWD_STORE_PATH")]
    pub storage_path: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for reviewd
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP review server
    Serve {
        /// Override the bind address from config
        #[arg(long)]
        host: Option<String>,

        /// Override the port from config
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect and manage stored review sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List stored sessions
    List,

    /// Print a session's review history
    Show {
        /// Session id
        id: String,
    },

    /// Clear a session's review history
    Clear {
        /// Session id
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            storage_path: None,
            verbose: false,
            command: Commands::Serve {
                host: None,
                port: None,
            },
        }
    }
}
