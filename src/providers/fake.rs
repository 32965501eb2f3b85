//! Scripted provider double for tests
//!
//! Records every call and replays queued responses, so the review flow
//! can be exercised without a live inference endpoint.

use crate::error::{Result, ReviewdError};
use crate::providers::{GenerationOptions, Message, Provider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted provider outcome
#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Failure(String),
}

/// A recorded `generate` invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Messages passed to the provider
    pub messages: Vec<Message>,
    /// Generation options passed to the provider
    pub options: GenerationOptions,
}

/// Scripted inference provider
///
/// Queued responses are consumed in order; once the queue is empty the
/// default response is returned, so simple tests need no scripting at
/// all.
pub struct FakeProvider {
    default_response: String,
    scripted: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeProvider {
    /// Create a fake with a canned default review text
    pub fn new() -> Self {
        Self::with_default_response("The code is straightforward and has no obvious defects.")
    }

    /// Create a fake with a specific default response
    pub fn with_default_response(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response for the next unscripted call
    pub fn push_response(&self, text: impl Into<String>) {
        self.scripted
            .lock()
            .expect("scripted lock poisoned")
            .push_back(Scripted::Text(text.into()));
    }

    /// Queue a failure for the next unscripted call
    pub fn push_failure(&self, message: impl Into<String>) {
        self.scripted
            .lock()
            .expect("scripted lock poisoned")
            .push_back(Scripted::Failure(message.into()));
    }

    /// All calls recorded so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    async fn generate(&self, messages: &[Message], options: GenerationOptions) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                messages: messages.to_vec(),
                options,
            });

        let next = self
            .scripted
            .lock()
            .expect("scripted lock poisoned")
            .pop_front();

        match next {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(ReviewdError::Provider(message).into()),
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}
