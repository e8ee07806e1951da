//! Optional review integrity validation.
//!
//! Callers may submit a hex-encoded hash alongside a review; when a
//! validator is configured, the review text is hashed and compared before
//! the append is accepted. Disabled by default.

use crate::error::ApiError;

/// Pluggable integrity check for review text.
pub trait ReviewValidator: Send + Sync {
    /// Verify `text` against a caller-supplied expected hash.
    fn verify(&self, text: &str, expected_hash: &str) -> Result<(), ApiError>;
}

/// Validator comparing a blake3 digest of the review text against a
/// 64-character hex string.
pub struct Blake3Validator;

impl ReviewValidator for Blake3Validator {
    fn verify(&self, text: &str, expected_hash: &str) -> Result<(), ApiError> {
        let expected = hex::decode(expected_hash.trim_start_matches("0x"))
            .map_err(|_| ApiError::InvalidRequest("hash must be a hex string".to_string()))?;
        if expected.len() != 32 {
            return Err(ApiError::InvalidRequest(
                "hash must be a 64-character hex string representing 32 bytes".to_string(),
            ));
        }

        let actual = blake3::hash(text.as_bytes());
        if actual.as_bytes() != expected.as_slice() {
            return Err(ApiError::InvalidRequest(
                "review text does not match the supplied hash".to_string(),
            ));
        }
        Ok(())
    }
}
