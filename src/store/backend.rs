//! Persistence backends for session state
//!
//! The storage boundary is one get/put pair per session key, with the full
//! [`SessionState`] serialized as a single record. Backends are injected as
//! a capability so the store logic can be tested without touching disk.

use crate::error::{Result, ReviewdError};
use crate::store::types::SessionState;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Capability interface over the persisted session records
///
/// One logical record per session key; `put` replaces the whole record.
pub trait StorageBackend: Send + Sync {
    /// Load the persisted state for a key, if any
    fn get(&self, key: &str) -> Result<Option<SessionState>>;

    /// Replace the persisted state for a key
    fn put(&self, key: &str, state: &SessionState) -> Result<()>;

    /// All session keys currently persisted
    fn keys(&self) -> Result<Vec<String>>;
}

/// Embedded `sled` backend
///
/// Stores each session as a JSON record keyed by the session id, with an
/// explicit flush after every write so an acknowledged append is durable.
pub struct SledBackend {
    db: sled::Db,
}

impl SledBackend {
    /// Open or create the database directory
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `ReviewdError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use reviewd::store::SledBackend;
    ///
    /// # fn main() -> reviewd::error::Result<()> {
    /// let dir = tempfile::tempdir().unwrap();
    /// let backend = SledBackend::open(dir.path().join("sessions"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ReviewdError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl StorageBackend for SledBackend {
    fn get(&self, key: &str) -> Result<Option<SessionState>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| ReviewdError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let state = serde_json::from_slice(&bytes)
                    .map_err(|e| ReviewdError::Storage(format!("Deserialization failed: {}", e)))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, state: &SessionState) -> Result<()> {
        let value = serde_json::to_vec(state)
            .map_err(|e| ReviewdError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| ReviewdError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ReviewdError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for result in self.db.iter() {
            let (key, _) =
                result.map_err(|e| ReviewdError::Storage(format!("Iteration failed: {}", e)))?;
            keys.push(String::from_utf8_lossy(&key).to_string());
        }
        Ok(keys)
    }
}

/// In-memory backend
///
/// Deterministic double for tests, also usable as an ephemeral mode.
/// Records are held as serialized bytes so the backend exercises the same
/// encode/decode path as the durable one. Failure injection via
/// [`MemoryBackend::fail_reads`] and [`MemoryBackend::fail_writes`] lets
/// tests observe storage-failure propagation.
#[derive(Default)]
pub struct MemoryBackend {
    records: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail with a storage error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail with a storage error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<SessionState>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ReviewdError::Storage("injected read failure".to_string()).into());
        }

        let records = self
            .records
            .lock()
            .map_err(|_| ReviewdError::Storage("records lock poisoned".to_string()))?;

        match records.get(key) {
            Some(bytes) => {
                let state = serde_json::from_slice(bytes)
                    .map_err(|e| ReviewdError::Storage(format!("Deserialization failed: {}", e)))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, state: &SessionState) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ReviewdError::Storage("injected write failure".to_string()).into());
        }

        let value = serde_json::to_vec(state)
            .map_err(|e| ReviewdError::Storage(format!("Serialization failed: {}", e)))?;

        let mut records = self
            .records
            .lock()
            .map_err(|_| ReviewdError::Storage("records lock poisoned".to_string()))?;
        records.insert(key.to_string(), value);

        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let records = self
            .records
            .lock()
            .map_err(|_| ReviewdError::Storage("records lock poisoned".to_string()))?;
        Ok(records.keys().cloned().collect())
    }
}
