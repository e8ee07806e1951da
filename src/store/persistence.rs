//! Sled-backed key-value persistence.
//!
//! The database is opened exclusively by one process; a held lock or disk
//! error at open time is fatal, so per-request paths never see open errors.

use crate::error::StorageError;
use crate::store::KeyValueStore;
use std::path::Path;

/// Key-value store over an embedded sled database.
pub struct SledKeyValueStore {
    db: sled::Db,
}

impl SledKeyValueStore {
    /// Open (or create) the database at `path`.
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Wrap an already-opened database handle.
    pub fn from_db(db: sled::Db) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SledKeyValueStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let value = self.db.get(key)?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        self.db.insert(key, value)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SledKeyValueStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SledKeyValueStore::new(&temp_dir.path().join("store")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_get_absent_key_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get(b"missing").unwrap(), None);
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let (store, _temp) = create_test_store();
        store.put(b"key", b"value").unwrap();
        assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_put_overwrites_previous_value() {
        let (store, _temp) = create_test_store();
        store.put(b"key", b"first").unwrap();
        store.put(b"key", b"second").unwrap();
        assert_eq!(store.get(b"key").unwrap(), Some(b"second".to_vec()));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store");
        {
            let store = SledKeyValueStore::new(&path).unwrap();
            store.put(b"key", b"value").unwrap();
        }
        let store = SledKeyValueStore::new(&path).unwrap();
        assert_eq!(store.get(b"key").unwrap(), Some(b"value".to_vec()));
    }
}
