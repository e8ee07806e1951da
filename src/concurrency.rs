//! Concurrent access safety for ledger writes.
//!
//! Review appends are read-modify-write sequences on a single store key.
//! Without coordination, two concurrent appends to the same food address can
//! race and the later write silently discards the earlier one. Write paths
//! take a per-key lock so appends to the same key serialize; reads don't
//! require locks.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-key lock manager.
///
/// Provides fine-grained locking at the store-key level, allowing writes to
/// different keys to proceed concurrently while serializing writes to the
/// same key.
pub struct KeyLockManager {
    /// Map from store key to per-key mutex.
    /// Uses Arc<Mutex<()>> to allow shared ownership across callers.
    locks: Arc<RwLock<HashMap<Vec<u8>, Arc<Mutex<()>>>>>,
}

impl KeyLockManager {
    /// Create a new key lock manager.
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for a specific key.
    pub fn get_lock(&self, key: &[u8]) -> Arc<Mutex<()>> {
        // Try to get existing lock (read lock for map lookup)
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(key) {
                return lock.clone();
            }
        }

        // Lock doesn't exist, create it (write lock for map modification)
        let mut map = self.locks.write();
        // Double-check after acquiring write lock (another thread might have created it)
        map.entry(key.to_vec())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for KeyLockManager {
    fn default() -> Self {
        Self::new()
    }
}
