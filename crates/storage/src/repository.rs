use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("a record already exists for this key")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value contract for persisted survey responses.
///
/// Keys are session identifiers; values are serialized response records.
/// A key is written at most once: the record for a session either exists in
/// full or not at all.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Store a serialized response record under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the key was already written, or
    /// other storage errors.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch the serialized record stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ResponseStore for InMemoryStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(key) {
            return Err(StorageError::Conflict);
        }
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }
}

/// Aggregates the response store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub responses: Arc<dyn ResponseStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            responses: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_record() {
        let store = InMemoryStore::new();
        store.put("session-1", r#"{"status":"COMPLETED"}"#).await.unwrap();

        let value = store.get("session-1").await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"status":"COMPLETED"}"#));
        assert_eq!(store.get("session-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn second_write_to_the_same_key_conflicts() {
        let store = InMemoryStore::new();
        store.put("session-1", "first").await.unwrap();

        let err = store.put("session-1", "second").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
        assert_eq!(store.get("session-1").await.unwrap().as_deref(), Some("first"));
    }
}
