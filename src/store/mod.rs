//! Key-Value Store Adapter
//!
//! Opaque byte-string storage backing the review ledger and the generation
//! cache. Keys and values are uninterpreted here; callers own serialization.

pub mod persistence;

use crate::error::StorageError;

/// Key-value store interface.
///
/// Absence of a key is `Ok(None)`, distinct from any error. Writes are
/// last-write-wins whole-value overwrites.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;
}
