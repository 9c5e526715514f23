//! # Shared Envelope - Authenticated Message Encryption
//!
//! Self-contained encrypted-message wire format for topic payloads.
//!
//! ## Wire Format
//!
//! ```text
//! ┌────────────┬──────────────┬─────────────────────┐
//! │ IV (16 B)  │ AuthTag (16B)│ Ciphertext (var)    │
//! └────────────┴──────────────┴─────────────────────┘
//! ```
//!
//! One opaque blob, AES-256-GCM. A fresh random IV is drawn from the OS
//! CSPRNG on every encode; IV reuse under the same key breaks
//! confidentiality and must never happen.
//!
//! ## Key Policy
//!
//! Key material that is not exactly 32 bytes disables encryption: both
//! encode and decode become identity pass-throughs. This preserves
//! compatibility with operators that run without a key, but it is loud
//! about it (a `warn!` at construction) because it silently downgrades
//! confidentiality otherwise.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod errors;
pub mod keys;

pub use codec::EnvelopeCodec;
pub use errors::EnvelopeError;
pub use keys::SecretKey;

/// Initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Secret key length in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Minimum length of an active-mode envelope blob (IV + tag, empty ciphertext).
pub const MIN_ENVELOPE_LENGTH: usize = IV_LENGTH + TAG_LENGTH;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_layout_constants() {
        assert_eq!(MIN_ENVELOPE_LENGTH, 32);
        assert_eq!(KEY_LENGTH, 32);
    }
}
