//! Session-scoped review history
//!
//! The store keeps one durable, ordered log of review entries per session
//! key plus creation and last-access timestamps. Each operation is a full
//! load-modify-persist cycle and is atomic from the caller's point of
//! view: a per-key mutex is held for the whole cycle, so two operations
//! against the same key never interleave while distinct keys never
//! contend. Sessions are materialized lazily; the first access to an
//! unseen key starts from empty state rather than going through an
//! explicit create call.

use crate::error::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use ulid::Ulid;

pub mod backend;
pub mod types;

pub use backend::{MemoryBackend, SledBackend, StorageBackend};
pub use types::{ReviewEntry, SessionMetadata, SessionState};

/// Current wall-clock time in milliseconds since the Unix epoch
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generate a new review entry id
///
/// ULIDs are preferred over UUIDs here as they are sortable by timestamp,
/// which keeps entry ids aligned with append order.
pub fn new_review_id() -> String {
    Ulid::new().to_string()
}

/// Durable per-session review log
///
/// All operations are keyed by an opaque session id. The backing
/// [`StorageBackend`] is injected so the store can run against the
/// embedded database in production and an in-memory double in tests.
pub struct SessionStore {
    backend: Arc<dyn StorageBackend>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionStore {
    /// Create a store over an injected backend
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Open a store backed by the embedded database at `path`
    ///
    /// # Errors
    ///
    /// Returns `ReviewdError::Storage` if the database cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let backend = SledBackend::open(path)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Fetch (or create) the mutex guarding one session key
    ///
    /// Guards are never evicted; the map is bounded by the number of
    /// distinct session keys, same as the persisted state itself.
    async fn key_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Load persisted state for a key, falling back to fresh defaults
    ///
    /// The caller is expected to hold the key lock. Every caller stamps
    /// `last_accessed_at` and persists, so a read also refreshes the
    /// access time on disk.
    fn load_or_default(&self, session_id: &str, now: i64) -> Result<SessionState> {
        match self.backend.get(session_id)? {
            Some(state) => Ok(state),
            None => Ok(SessionState::new(now)),
        }
    }

    /// Append a completed review to a session's history
    ///
    /// Constructs a new entry with a fresh id and current timestamp,
    /// appends it, updates the access time, and persists the full state.
    /// The entry content is stored verbatim; validation is the HTTP
    /// layer's responsibility before this is invoked.
    ///
    /// # Errors
    ///
    /// Fails only on underlying storage failure, which is fatal to the
    /// operation: the append is not reported as successful unless the
    /// persist completed.
    pub async fn add_review(
        &self,
        session_id: &str,
        code: &str,
        language: &str,
        review: &str,
        context: Option<&str>,
    ) -> Result<ReviewEntry> {
        let lock = self.key_lock(session_id).await;
        let _guard = lock.lock().await;

        let now = now_millis();
        let mut state = self.load_or_default(session_id, now)?;

        let entry = ReviewEntry {
            id: new_review_id(),
            timestamp: now,
            code: code.to_string(),
            language: language.to_string(),
            review: review.to_string(),
            context: context.map(|c| c.to_string()),
        };

        state.reviews.push(entry.clone());
        state.last_accessed_at = now;
        self.backend.put(session_id, &state)?;

        tracing::debug!(
            session_id,
            review_id = %entry.id,
            count = state.reviews.len(),
            "appended review entry"
        );

        Ok(entry)
    }

    /// Full review history for a session, oldest first
    ///
    /// A read refreshes `last_accessed_at` and re-persists, keeping the
    /// access time authoritative on disk.
    pub async fn get_reviews(&self, session_id: &str) -> Result<Vec<ReviewEntry>> {
        let state = self.touch(session_id).await?;
        Ok(state.reviews)
    }

    /// Look up a single entry by id
    ///
    /// Absence is not an error; an unknown id yields `None`.
    pub async fn get_review(&self, session_id: &str, review_id: &str) -> Result<Option<ReviewEntry>> {
        let state = self.touch(session_id).await?;
        Ok(state.reviews.into_iter().find(|r| r.id == review_id))
    }

    /// The most recently appended entry, if any
    pub async fn get_latest_review(&self, session_id: &str) -> Result<Option<ReviewEntry>> {
        let state = self.touch(session_id).await?;
        Ok(state.reviews.into_iter().next_back())
    }

    /// Summary of a session without its entry contents
    pub async fn get_metadata(&self, session_id: &str) -> Result<SessionMetadata> {
        let state = self.touch(session_id).await?;
        Ok(SessionMetadata {
            review_count: state.reviews.len(),
            created_at: state.created_at,
            last_accessed_at: state.last_accessed_at,
        })
    }

    /// Reset a session's history to empty
    ///
    /// Creation time is preserved; the access time is updated. Clearing
    /// an already-empty session is a no-op in effect.
    pub async fn clear_reviews(&self, session_id: &str) -> Result<()> {
        let lock = self.key_lock(session_id).await;
        let _guard = lock.lock().await;

        let now = now_millis();
        let mut state = self.load_or_default(session_id, now)?;

        state.reviews.clear();
        state.last_accessed_at = now;
        self.backend.put(session_id, &state)?;

        tracing::debug!(session_id, "cleared session reviews");

        Ok(())
    }

    /// All session keys currently persisted
    pub fn session_ids(&self) -> Result<Vec<String>> {
        self.backend.keys()
    }

    /// Shared read path: load, stamp the access time, persist, return
    async fn touch(&self, session_id: &str) -> Result<SessionState> {
        let lock = self.key_lock(session_id).await;
        let _guard = lock.lock().await;

        let now = now_millis();
        let mut state = self.load_or_default(session_id, now)?;
        state.last_accessed_at = now;
        self.backend.put(session_id, &state)?;

        Ok(state)
    }
}
