//! Durable per-visitor storage for cart snapshots.
//!
//! A snapshot is the cart's JSON text (see
//! [`Cart::to_json`](siraj_store_core::Cart::to_json)). Storage only moves
//! strings; parsing and validation belong to [`super::CartStore`].

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::Mutex;
use tower_sessions::Session;

/// Session key the cart snapshot is stored under.
pub const CART_KEY: &str = "cart";

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage holding one cart snapshot.
pub trait CartStorage: Send + Sync {
    /// Read the stored snapshot, `None` if nothing was ever written.
    fn read(&self) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Replace the stored snapshot.
    fn write(&self, snapshot: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Storage backed by the visitor's `tower-sessions` session.
#[derive(Clone, Debug)]
pub struct SessionStorage {
    session: Session,
}

impl SessionStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.session.get::<String>(CART_KEY).await?)
    }

    async fn write(&self, snapshot: String) -> Result<(), StorageError> {
        self.session.insert(CART_KEY, snapshot).await?;
        Ok(())
    }
}

/// In-process storage, used by tests and tools.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// a store wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: bool,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot.into()))),
            ..Self::default()
        }
    }

    /// Storage whose writes always fail (a full or disabled store).
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CartStorage for MemoryStorage {
    async fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn write(&self, snapshot: String) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        *self.slot.lock().await = Some(snapshot);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read().await.unwrap().is_none());

        storage.write("[]".to_string()).await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_slot() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.write("[1]".to_string()).await.unwrap();
        assert_eq!(handle.snapshot().await.as_deref(), Some("[1]"));
    }

    #[tokio::test]
    async fn test_failing_storage_rejects_writes() {
        let storage = MemoryStorage::failing();
        assert!(matches!(
            storage.write("[]".to_string()).await,
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(storage.write_count(), 0);
    }

    #[tokio::test]
    async fn test_session_storage_uses_cart_key() {
        use tower_sessions::MemoryStore;

        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let storage = SessionStorage::new(session.clone());
        storage.write("[]".to_string()).await.unwrap();

        let raw: Option<String> = session.get(CART_KEY).await.unwrap();
        assert_eq!(raw.as_deref(), Some("[]"));
        assert_eq!(storage.read().await.unwrap().as_deref(), Some("[]"));
    }
}
