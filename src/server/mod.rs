//! HTTP server for the review API
//!
//! Thin mapping from routes to the review service and session store,
//! with permissive CORS so a browser frontend can call the API directly.

use crate::config::ServerConfig;
use crate::error::Result;
use crate::review::ReviewService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;

pub use handlers::{
    ApiError, ClearSessionResponse, ErrorBody, HealthResponse, SubmitReviewBody,
    SubmitReviewResponse,
};

/// Shared state handed to every handler
pub struct AppState {
    /// The review orchestration service (owns the session store)
    pub service: ReviewService,
}

/// Build the API router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/review", post(handlers::submit_review))
        .route("/api/sessions/:id", get(handlers::session_metadata))
        .route(
            "/api/sessions/:id/reviews",
            get(handlers::list_reviews).delete(handlers::clear_session),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown
pub async fn serve(config: &ServerConfig, state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(state);

    info!("Starting review API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
