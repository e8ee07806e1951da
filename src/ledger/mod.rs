//! Review Ledger
//!
//! Stores an ordered sequence of reviews per food address under the store
//! key `reviews:<food_address>`. Append order is insertion order; there is
//! no deduplication. Absence of the key means "no reviews yet", which is
//! distinct from an empty sequence.

pub mod validation;

use crate::concurrency::KeyLockManager;
use crate::error::{ApiError, StorageError};
use crate::store::KeyValueStore;
use crate::types::ReviewRecord;
use std::sync::Arc;
use validation::ReviewValidator;

const REVIEW_KEY_PREFIX: &str = "reviews:";

fn review_key(food_address: &str) -> Vec<u8> {
    format!("{}{}", REVIEW_KEY_PREFIX, food_address).into_bytes()
}

/// Per-food-address review sequences over the key-value store.
///
/// Appends are read-modify-write on the whole sequence, guarded by a per-key
/// lock so concurrent appends to the same food address within this process
/// serialize rather than overwrite each other. Appends from a second process
/// against the same store are not coordinated.
pub struct ReviewLedger {
    store: Arc<dyn KeyValueStore>,
    locks: KeyLockManager,
    validator: Option<Box<dyn ReviewValidator>>,
}

impl ReviewLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            locks: KeyLockManager::new(),
            validator: None,
        }
    }

    /// Attach an integrity validator. Reviews carrying an expected hash are
    /// checked against it before being appended.
    pub fn with_validator(mut self, validator: Box<dyn ReviewValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Append one review to the sequence for `food_address`, creating the
    /// sequence if this is the first review.
    pub fn append_review(
        &self,
        food_address: &str,
        record: ReviewRecord,
        expected_hash: Option<&str>,
    ) -> Result<usize, ApiError> {
        if let (Some(validator), Some(expected)) = (&self.validator, expected_hash) {
            validator.verify(&record.text, expected)?;
        }

        let key = review_key(food_address);
        let lock = self.locks.get_lock(&key);
        let _guard = lock.lock();

        let mut reviews = match self.store.get(&key)? {
            Some(bytes) => decode_reviews(&bytes)?,
            None => Vec::new(),
        };
        reviews.push(record);

        let encoded = serde_json::to_vec(&reviews).map_err(StorageError::from)?;
        self.store.put(&key, &encoded)?;
        Ok(reviews.len())
    }

    /// The stored review sequence for `food_address`, or `NotFound` when the
    /// address has never been reviewed.
    pub fn list_reviews(&self, food_address: &str) -> Result<Vec<ReviewRecord>, ApiError> {
        let key = review_key(food_address);
        match self.store.get(&key)? {
            Some(bytes) => Ok(decode_reviews(&bytes)?),
            None => Err(ApiError::NotFound(format!(
                "no reviews for food address '{}'",
                food_address
            ))),
        }
    }
}

fn decode_reviews(bytes: &[u8]) -> Result<Vec<ReviewRecord>, StorageError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::persistence::SledKeyValueStore;
    use tempfile::TempDir;

    fn create_test_ledger() -> (ReviewLedger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SledKeyValueStore::new(&temp_dir.path().join("store")).unwrap();
        (ReviewLedger::new(Arc::new(store)), temp_dir)
    }

    fn review(user: &str, text: &str) -> ReviewRecord {
        ReviewRecord {
            user_address: user.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_append_then_list_contains_record_last() {
        let (ledger, _temp) = create_test_ledger();
        ledger
            .append_review("hotpot", review("0xabc", "too spicy"), None)
            .unwrap();
        ledger
            .append_review("hotpot", review("0xdef", "just right"), None)
            .unwrap();

        let reviews = ledger.list_reviews("hotpot").unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews.last().unwrap(), &review("0xdef", "just right"));
    }

    #[test]
    fn test_list_unknown_address_is_not_found() {
        let (ledger, _temp) = create_test_ledger();
        let err = ledger.list_reviews("never-seen").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_sequences_are_isolated_per_address() {
        let (ledger, _temp) = create_test_ledger();
        ledger
            .append_review("hotpot", review("0xabc", "great"), None)
            .unwrap();
        ledger
            .append_review("dumplings", review("0xabc", "also great"), None)
            .unwrap();

        assert_eq!(ledger.list_reviews("hotpot").unwrap().len(), 1);
        assert_eq!(ledger.list_reviews("dumplings").unwrap().len(), 1);
    }

    #[test]
    fn test_hash_ignored_when_validator_disabled() {
        let (ledger, _temp) = create_test_ledger();
        // No validator attached: a bogus hash must not reject the append.
        ledger
            .append_review("hotpot", review("0xabc", "fine"), Some("not-a-hash"))
            .unwrap();
        assert_eq!(ledger.list_reviews("hotpot").unwrap().len(), 1);
    }
}
