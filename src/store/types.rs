use serde::{Deserialize, Serialize};

/// One completed review in a session's history
///
/// Entries are immutable once created; the store only ever appends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Unique identifier for the entry (ULID), generated at creation
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// The submitted source text, stored verbatim
    pub code: String,
    /// Short language label supplied by the caller, not validated here
    pub language: String,
    /// The generated review text
    pub review: String,
    /// Optional short hint string supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The persisted unit per session key
///
/// Serialized as a single JSON record; there are no partial updates and
/// no secondary indices. Insertion order of `reviews` is chronological
/// order and is never reordered or deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Ordered review history, oldest first
    pub reviews: Vec<ReviewEntry>,
    /// Set once, at first materialization of the session (ms since epoch)
    pub created_at: i64,
    /// Updated on every read or write operation (ms since epoch)
    pub last_accessed_at: i64,
}

impl SessionState {
    /// Fresh state for a previously-unseen session key
    pub fn new(now: i64) -> Self {
        Self {
            reviews: Vec::new(),
            created_at: now,
            last_accessed_at: now,
        }
    }
}

/// Read-only summary of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    /// Number of reviews currently stored
    pub review_count: usize,
    /// Session creation time (ms since epoch)
    pub created_at: i64,
    /// Last read or write time (ms since epoch)
    pub last_accessed_at: i64,
}
