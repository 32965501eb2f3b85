//! Review submission flow
//!
//! Glue between the session store, the prompt templates, and the
//! inference provider. A submission against a session with prior history
//! becomes a follow-up review evaluated in the context of the most
//! recent prior entry; a failed inference call never produces a store
//! append.

use crate::error::Result;
use crate::prompts::{format_follow_up_prompt, format_initial_prompt, SYSTEM_PROMPT};
use crate::providers::{GenerationOptions, Message, Provider};
use crate::store::SessionStore;
use std::sync::Arc;
use uuid::Uuid;

/// One validated review submission
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Source text to review
    pub code: String,
    /// Language label, forwarded into the prompt fence
    pub language: String,
    /// Optional hint supplied by the caller
    pub context: Option<String>,
    /// Existing session to continue; a fresh session is created when absent
    pub session_id: Option<String>,
}

/// Result of a completed submission
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Session the review was stored under (generated when not supplied)
    pub session_id: String,
    /// Id of the appended entry
    pub review_id: String,
    /// The generated review text
    pub review: String,
    /// Whether the review was evaluated against a prior entry
    pub is_follow_up: bool,
    /// Entry creation time (ms since epoch)
    pub timestamp: i64,
}

/// Review orchestration service
pub struct ReviewService {
    store: Arc<SessionStore>,
    provider: Arc<dyn Provider>,
    options: GenerationOptions,
}

impl ReviewService {
    /// Create a service over an injected store and provider
    pub fn new(
        store: Arc<SessionStore>,
        provider: Arc<dyn Provider>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            store,
            provider,
            options,
        }
    }

    /// Run one submission end to end
    ///
    /// The request is follow-up if and only if the session's history is
    /// non-empty at the time of the call, and the follow-up prompt embeds
    /// exactly the most recently appended entry's review text, never an
    /// older one.
    ///
    /// # Errors
    ///
    /// Provider and storage failures are propagated; neither results in a
    /// stored entry.
    pub async fn submit(&self, request: SubmitRequest) -> Result<ReviewOutcome> {
        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let previous = self.store.get_latest_review(&session_id).await?;
        let is_follow_up = previous.is_some();

        let user_prompt = match &previous {
            Some(prior) => format_follow_up_prompt(&prior.review, &request.code, &request.language),
            None => format_initial_prompt(
                &request.code,
                &request.language,
                request.context.as_deref(),
            ),
        };

        tracing::info!(
            session_id,
            provider = self.provider.name(),
            is_follow_up,
            "requesting review"
        );

        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(user_prompt)];
        let review = self.provider.generate(&messages, self.options).await?;

        let entry = self
            .store
            .add_review(
                &session_id,
                &request.code,
                &request.language,
                &review,
                request.context.as_deref(),
            )
            .await?;

        Ok(ReviewOutcome {
            session_id,
            review_id: entry.id,
            review: entry.review,
            is_follow_up,
            timestamp: entry.timestamp,
        })
    }

    /// The underlying session store
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }
}
