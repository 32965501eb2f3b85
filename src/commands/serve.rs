//! The `serve` command: wire up the store, provider, and HTTP server

use crate::config::Config;
use crate::error::Result;
use crate::providers::{create_provider, GenerationOptions};
use crate::review::ReviewService;
use crate::server::{self, AppState};
use crate::store::SessionStore;
use std::sync::Arc;

/// Run the HTTP review server until shutdown
pub async fn run_serve(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(host) = host {
        server_config.host = host;
    }
    if let Some(port) = port {
        server_config.port = port;
    }

    let db_path = config.storage.resolve_path()?;
    tracing::info!("Opening session store at {}", db_path.display());
    let store = Arc::new(SessionStore::open(&db_path)?);

    let provider = create_provider(&config.provider)?;
    let service = ReviewService::new(store, provider, GenerationOptions::from(config.review));

    let state = Arc::new(AppState { service });
    server::serve(&server_config, state).await
}
