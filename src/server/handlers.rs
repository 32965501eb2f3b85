//! Request handlers and wire types for the review API
//!
//! The handlers validate required fields before any state is touched,
//! then delegate to the review service and session store. Failures map
//! to a JSON error body: validation problems as 400, inference failures
//! as 502, storage and all other failures as 500.

use crate::error::ReviewdError;
use crate::review::SubmitRequest;
use crate::server::AppState;
use crate::store::{ReviewEntry, SessionMetadata};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inbound body for review submission
///
/// Required fields are optional here so their absence yields the API's
/// own validation response rather than a generic deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response for a completed submission
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewResponse {
    pub session_id: String,
    pub review_id: String,
    pub review: String,
    pub is_follow_up: bool,
    pub timestamp: i64,
}

/// Acknowledgement for a cleared session
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearSessionResponse {
    pub session_id: String,
    pub cleared: bool,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

/// JSON error body returned for every failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level error with an HTTP status
#[derive(Debug)]
pub enum ApiError {
    /// Missing or empty required field; the operation was not attempted
    Validation(String),
    /// The inference service failed
    Upstream(String),
    /// Storage or any other internal failure
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Validation(m) | ApiError::Upstream(m) | ApiError::Internal(m) => m,
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::warn!("request failed: {:#}", err);
        match err.downcast_ref::<ReviewdError>() {
            Some(ReviewdError::Validation(m)) => ApiError::Validation(m.clone()),
            Some(ReviewdError::Provider(m)) => ApiError::Upstream(m.clone()),
            Some(ReviewdError::MissingCredentials(m)) => {
                ApiError::Upstream(format!("Missing credentials for provider: {}", m))
            }
            Some(ReviewdError::Storage(m)) => ApiError::Internal(m.clone()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

/// POST /api/review
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitReviewBody>,
) -> Result<Json<SubmitReviewResponse>, ApiError> {
    let code = match body.code {
        Some(code) if !code.trim().is_empty() => code,
        _ => return Err(ApiError::Validation("code is required".to_string())),
    };
    let language = match body.language {
        Some(language) if !language.trim().is_empty() => language,
        _ => return Err(ApiError::Validation("language is required".to_string())),
    };

    let outcome = state
        .service
        .submit(SubmitRequest {
            code,
            language,
            context: body.context,
            session_id: body.session_id.filter(|s| !s.trim().is_empty()),
        })
        .await?;

    Ok(Json(SubmitReviewResponse {
        session_id: outcome.session_id,
        review_id: outcome.review_id,
        review: outcome.review,
        is_follow_up: outcome.is_follow_up,
        timestamp: outcome.timestamp,
    }))
}

/// GET /api/sessions/:id/reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ReviewEntry>>, ApiError> {
    let reviews = state.service.store().get_reviews(&session_id).await?;
    Ok(Json(reviews))
}

/// GET /api/sessions/:id
pub async fn session_metadata(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionMetadata>, ApiError> {
    let metadata = state.service.store().get_metadata(&session_id).await?;
    Ok(Json(metadata))
}

/// DELETE /api/sessions/:id/reviews
pub async fn clear_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ClearSessionResponse>, ApiError> {
    state.service.store().clear_reviews(&session_id).await?;
    Ok(Json(ClearSessionResponse {
        session_id,
        cleared: true,
    }))
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp_millis(),
    })
}
