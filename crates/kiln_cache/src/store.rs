//! The cache store boundary and the in-memory implementation.

use crate::error::CacheError;
use crate::key::CacheKey;
use std::collections::HashMap;
use std::sync::Mutex;

/// The key/value contract between the compiler and artifact storage.
///
/// Implementations must allow concurrent use from multiple compiles:
/// at most one writer per key, readers never observing a half-written
/// entry, and unrelated keys never serialized against each other.
pub trait CacheStore: Send + Sync {
    /// Returns the stored bytes for a key, or `None` when absent.
    ///
    /// Loads are fail-safe: a corrupt or unreadable entry is a miss.
    fn load(&self, key: &CacheKey) -> Option<Vec<u8>>;

    /// Stores bytes under a key, replacing any previous entry.
    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;
}

/// A process-local store backed by a mutex-guarded map.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<CacheKey, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns `true` when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &CacheKey) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn store(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(*key, bytes.to_vec());
        Ok(())
    }
}
