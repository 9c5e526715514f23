//! # Envelope Codec
//!
//! Encodes plaintext into `IV || AuthTag || Ciphertext` blobs and decodes
//! them back, detecting tamper and key mismatch via the GCM auth tag.

use aes::Aes256;
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{AesGcm, Nonce, Tag};
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::errors::EnvelopeError;
use crate::keys::SecretKey;
use crate::{IV_LENGTH, KEY_LENGTH, MIN_ENVELOPE_LENGTH, TAG_LENGTH};

/// AES-256-GCM with a 16-byte IV, matching the envelope wire format.
type EnvelopeCipher = AesGcm<Aes256, U16>;

/// Envelope encoder/decoder.
///
/// Holds the process-wide key, loaded once at startup. An inactive codec
/// (no key, or key material of the wrong length) passes payloads through
/// unmodified in both directions; callers check [`EnvelopeCodec::is_active`]
/// when they need to know whether confidentiality is in effect.
///
/// The codec holds no mutable state across calls, so concurrent encode and
/// decode calls on a shared codec are safe.
#[derive(Clone)]
pub struct EnvelopeCodec {
    key: Option<SecretKey>,
}

impl EnvelopeCodec {
    /// Create an active codec with the given key.
    #[must_use]
    pub fn new(key: SecretKey) -> Self {
        Self { key: Some(key) }
    }

    /// Create an inactive codec that passes payloads through unmodified.
    #[must_use]
    pub fn passthrough() -> Self {
        Self { key: None }
    }

    /// Create a codec from raw key material.
    ///
    /// Exactly 32 bytes activates encryption. Anything else (including
    /// empty) yields a pass-through codec and logs a warning, since the
    /// messages will travel in plaintext.
    #[must_use]
    pub fn from_key_material(material: &[u8]) -> Self {
        match SecretKey::from_slice(material) {
            Ok(key) => Self::new(key),
            Err(_) => {
                warn!(
                    key_len = material.len(),
                    expected = KEY_LENGTH,
                    "Encryption key is not 32 bytes; encryption disabled, \
                     messages will be sent in plaintext"
                );
                Self::passthrough()
            }
        }
    }

    /// Whether encryption is in effect.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.key.is_some()
    }

    /// Encode a plaintext payload into an envelope blob.
    ///
    /// Draws a fresh random IV from the OS CSPRNG on every call.
    /// Inactive codecs return the plaintext unchanged.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::EncryptionFailed` if the cipher rejects the
    /// input (payload too large for GCM).
    pub fn encode(&self, plaintext: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let Some(key) = &self.key else {
            return Ok(plaintext.to_vec());
        };

        let cipher = EnvelopeCipher::new(key.as_bytes().into());

        let mut iv = [0u8; IV_LENGTH];
        OsRng.fill_bytes(&mut iv);

        let mut ciphertext = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&iv), b"", &mut ciphertext)
            .map_err(|e| EnvelopeError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(MIN_ENVELOPE_LENGTH + ciphertext.len());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(tag.as_slice());
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decode an envelope blob back into plaintext.
    ///
    /// Splits the blob at fixed offsets (16-byte IV, 16-byte tag, remainder
    /// ciphertext), verifies the tag, and decrypts. Inactive codecs return
    /// the blob unchanged.
    ///
    /// # Errors
    ///
    /// - `EnvelopeError::Malformed` if the blob is shorter than 32 bytes.
    /// - `EnvelopeError::AuthenticationFailed` if the tag does not verify
    ///   (wrong key, tampered data, or non-envelope input). This is a
    ///   recoverable, typed error; the codec never returns incorrect
    ///   plaintext silently.
    pub fn decode(&self, blob: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
        let Some(key) = &self.key else {
            return Ok(blob.to_vec());
        };

        if blob.len() < MIN_ENVELOPE_LENGTH {
            return Err(EnvelopeError::Malformed { len: blob.len() });
        }

        let (iv, rest) = blob.split_at(IV_LENGTH);
        let (tag, ciphertext) = rest.split_at(TAG_LENGTH);

        let cipher = EnvelopeCipher::new(key.as_bytes().into());
        let mut plaintext = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(iv),
                b"",
                &mut plaintext,
                Tag::from_slice(tag),
            )
            .map_err(|_| EnvelopeError::AuthenticationFailed)?;

        Ok(plaintext)
    }
}
