//! Secret key material.

use zeroize::Zeroize;

use crate::errors::EnvelopeError;
use crate::KEY_LENGTH;

/// Secret key (256-bit), zeroized on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LENGTH]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, rejecting any length other than 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::InvalidKeyLength` on length mismatch.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let bytes: [u8; KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| EnvelopeError::InvalidKeyLength {
                    expected: KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Create from a 64-character hex string.
    ///
    /// # Errors
    ///
    /// Returns `EnvelopeError::InvalidHex` if the string is not valid hex,
    /// or `EnvelopeError::InvalidKeyLength` if it decodes to the wrong size.
    pub fn from_hex(hex_str: &str) -> Result<Self, EnvelopeError> {
        let mut bytes =
            hex::decode(hex_str).map_err(|e| EnvelopeError::InvalidHex(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Generate a random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.write_str("SecretKey(..)")
    }
}
