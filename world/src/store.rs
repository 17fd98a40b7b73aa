//! Persistence contract for encoded sessions.

use std::collections::BTreeMap;

use run_from_cats_core::SessionId;
use thiserror::Error;

/// Failures reported by a [`SessionStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing is stored under the identifier.
    #[error("no session stored for id {0}")]
    NotFound(SessionId),
    /// The backing storage failed.
    #[error("session storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage of session blobs keyed by session id.
///
/// Stores treat blobs as opaque bytes; decoding belongs to
/// [`GameSession::deserialize`](crate::GameSession::deserialize).
pub trait SessionStore {
    /// Persists `blob` under `id`, replacing any previous blob.
    fn save(&mut self, id: SessionId, blob: &[u8]) -> Result<(), StoreError>;

    /// Retrieves the blob stored under `id`.
    fn load(&self, id: SessionId) -> Result<Vec<u8>, StoreError>;
}

/// In-process store backed by an ordered map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: BTreeMap<SessionId, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Reports whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn save(&mut self, id: SessionId, blob: &[u8]) -> Result<(), StoreError> {
        let _ = self.blobs.insert(id, blob.to_vec());
        Ok(())
    }

    fn load(&self, id: SessionId) -> Result<Vec<u8>, StoreError> {
        self.blobs.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }
}
