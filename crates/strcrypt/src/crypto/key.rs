//! Key type and its checksummed ASCII-safe serialization.
//!
//! The serialized form is byte-compatible with keys exported by the Defuse PHP
//! encryption library:
//!
//! ```text
//! hex( DE F0 00 00 || key[32] || SHA-256(DE F0 00 00 || key)[32] )
//! ```

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::entropy::{EntropyError, EntropySource};

/// Byte length of a key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Header that prefixes every serialized key.
pub const KEY_HEADER: [u8; 4] = [0xDE, 0xF0, 0x00, 0x00];

/// Byte length of the trailing SHA-256 checksum.
const CHECKSUM_LEN: usize = 32;

/// Characters stripped from the end of a key string before decoding.
const TRAILING_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\0'];

/// Reasons a key string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("key is not a valid hex string")]
    NotHex,

    #[error("encoded data is shorter than expected")]
    TooShort,

    #[error("invalid key header")]
    InvalidHeader,

    #[error("data is corrupted, the checksum doesn't match")]
    ChecksumMismatch,

    #[error("bad key length: expected {KEY_LEN} bytes, got {0}")]
    BadLength(usize),
}

/// A 256-bit symmetric key.
///
/// Key bytes are overwritten with zeroes when the value is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Generate a fresh random key.
    ///
    /// # Errors
    ///
    /// Returns [`EntropyError`] if the random source fails.
    pub fn generate(entropy: &dyn EntropySource) -> Result<Self, EntropyError> {
        let mut key = Self {
            bytes: [0u8; KEY_LEN],
        };
        entropy.fill(&mut key.bytes)?;
        Ok(key)
    }

    /// Load a key from its ASCII-safe serialization.
    ///
    /// Trailing whitespace is ignored. Upper- and lower-case hex are accepted.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyError`] describing the first check that failed.
    pub fn from_ascii_safe(encoded: &str) -> Result<Self, KeyError> {
        let encoded = encoded.trim_end_matches(TRAILING_WHITESPACE);
        let raw = Zeroizing::new(hex::decode(encoded).map_err(|_| KeyError::NotHex)?);

        if raw.len() < KEY_HEADER.len() {
            return Err(KeyError::TooShort);
        }
        if raw[..KEY_HEADER.len()] != KEY_HEADER[..] {
            return Err(KeyError::InvalidHeader);
        }
        if raw.len() < KEY_HEADER.len() + CHECKSUM_LEN {
            return Err(KeyError::TooShort);
        }

        let (checked, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
        if !bool::from(Sha256::digest(checked).as_slice().ct_eq(checksum)) {
            return Err(KeyError::ChecksumMismatch);
        }

        let payload = &checked[KEY_HEADER.len()..];
        if payload.len() != KEY_LEN {
            return Err(KeyError::BadLength(payload.len()));
        }

        let mut key = Self {
            bytes: [0u8; KEY_LEN],
        };
        key.bytes.copy_from_slice(payload);
        Ok(key)
    }

    /// Serialize this key to its ASCII-safe form.
    pub fn to_ascii_safe(&self) -> String {
        let mut raw = Zeroizing::new(Vec::with_capacity(
            KEY_HEADER.len() + KEY_LEN + CHECKSUM_LEN,
        ));
        raw.extend_from_slice(&KEY_HEADER);
        raw.extend_from_slice(&self.bytes);
        let checksum = Sha256::digest(raw.as_slice());
        raw.extend_from_slice(&checksum);
        hex::encode(raw.as_slice())
    }

    /// Raw key bytes, for the cipher layer only.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material, not even in debug builds.
        f.write_str("Key([REDACTED])")
    }
}
