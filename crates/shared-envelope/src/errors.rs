//! Envelope error types.

use thiserror::Error;

/// Envelope encode/decode errors.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Authentication tag verification failed (wrong key, tampered data,
    /// or input that is not an envelope).
    #[error("Envelope authentication failed")]
    AuthenticationFailed,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Blob too short to hold an IV and an auth tag.
    #[error("Malformed envelope: {len} bytes, need at least 32")]
    Malformed {
        /// Actual blob length in bytes
        len: usize,
    },

    /// Key material is not valid hex.
    #[error("Invalid hex key material: {0}")]
    InvalidHex(String),
}
