//! AES-256-GCM-SIV encryption and decryption of string values.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant,
//! so an accidental nonce collision does not break authentication. A fresh
//! random 96-bit nonce is still drawn for every message.
//!
//! **Do NOT substitute plain AES-256-GCM with a fixed nonce.** GCM nonce reuse
//! is catastrophic: it breaks both confidentiality and authentication.

use aes_gcm_siv::{
    aead::{Aead, KeyInit, Payload},
    Aes256GcmSiv, Nonce,
};
use common::ErrorKind;
use thiserror::Error;
use zeroize::Zeroizing;

use super::entropy::{EntropyError, EntropySource};
use super::key::Key;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended to the ciphertext.
pub const TAG_LEN: usize = 16;

/// Header at the start of every encoded ciphertext. Bound as associated data.
pub const CIPHERTEXT_VERSION: [u8; 4] = [0x5E, 0xC0, 0x01, 0x00];

/// Smallest decodable ciphertext: header, nonce and tag around an empty message.
pub const MIN_CIPHERTEXT_LEN: usize = CIPHERTEXT_VERSION.len() + NONCE_LEN + TAG_LEN;

/// A parsed, encrypted value.
///
/// The string representation is `hex(version || nonce || ciphertext+tag)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedValue {
    /// Raw nonce bytes.
    pub nonce: [u8; NONCE_LEN],
    /// Raw ciphertext + authentication tag bytes.
    pub ciphertext: Vec<u8>,
}

impl EncryptedValue {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        let mut raw =
            Vec::with_capacity(CIPHERTEXT_VERSION.len() + NONCE_LEN + self.ciphertext.len());
        raw.extend_from_slice(&CIPHERTEXT_VERSION);
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        hex::encode(raw)
    }

    /// Parse an encoded ciphertext string back into an [`EncryptedValue`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidEncoding`] or [`CipherError::Truncated`]
    /// if the string cannot hold a ciphertext at all. A string long enough to
    /// hold one that is not lowercase hex, or carries the wrong version
    /// header, is [`CipherError::IntegrityCheckFailed`]: encoded output is
    /// always lowercase hex, so any other text was modified.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        if s.len() % 2 != 0 {
            return Err(CipherError::InvalidEncoding);
        }
        if s.len() < 2 * MIN_CIPHERTEXT_LEN {
            return Err(if s.bytes().all(|b| b.is_ascii_hexdigit()) {
                CipherError::Truncated
            } else {
                CipherError::InvalidEncoding
            });
        }
        if !s.bytes().all(is_lower_hex) {
            return Err(CipherError::IntegrityCheckFailed);
        }

        let raw = hex::decode(s).map_err(|_| CipherError::IntegrityCheckFailed)?;

        let (version, rest) = raw.split_at(CIPHERTEXT_VERSION.len());
        if version != CIPHERTEXT_VERSION.as_slice() {
            return Err(CipherError::IntegrityCheckFailed);
        }

        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

fn is_lower_hex(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f')
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// No nonce could be drawn.
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// AES-GCM-SIV refused to seal the message.
    #[error("aead operation failed")]
    AeadFailure,

    /// Wrong key, or the ciphertext was modified.
    #[error("integrity check failed: wrong key or modified ciphertext")]
    IntegrityCheckFailed,

    /// The ciphertext is too short to be hex-framed, or has odd length.
    #[error("ciphertext has invalid hex encoding")]
    InvalidEncoding,

    /// The ciphertext is valid hex but shorter than its fixed framing.
    #[error("ciphertext is too short")]
    Truncated,

    /// The authenticated plaintext is not UTF-8 and cannot be returned as text.
    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,
}

impl CipherError {
    /// Classify this error for the endpoint boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CipherError::IntegrityCheckFailed => ErrorKind::Authentication,
            CipherError::Entropy(_)
            | CipherError::AeadFailure
            | CipherError::InvalidEncoding
            | CipherError::Truncated
            | CipherError::InvalidUtf8 => ErrorKind::Environment,
        }
    }
}

/// Encrypt a plaintext value using AES-256-GCM-SIV.
///
/// # Errors
///
/// Returns [`CipherError::Entropy`] if no nonce can be drawn, and
/// [`CipherError::AeadFailure`] on an internal AEAD error (unreachable for
/// inputs below the AEAD length limit).
pub fn encrypt_value(
    plaintext: &[u8],
    key: &Key,
    entropy: &dyn EntropySource,
) -> Result<EncryptedValue, CipherError> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    entropy.fill(&mut nonce_bytes)?;

    let ciphertext = build_cipher(key)
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &CIPHERTEXT_VERSION,
            },
        )
        .map_err(|_| CipherError::AeadFailure)?;

    Ok(EncryptedValue {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypt an [`EncryptedValue`] back to plaintext bytes.
///
/// # Errors
///
/// Returns [`CipherError::IntegrityCheckFailed`] if authentication fails.
pub fn decrypt_value(value: &EncryptedValue, key: &Key) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    build_cipher(key)
        .decrypt(
            Nonce::from_slice(&value.nonce),
            Payload {
                msg: &value.ciphertext,
                aad: &CIPHERTEXT_VERSION,
            },
        )
        .map(Zeroizing::new)
        .map_err(|_| CipherError::IntegrityCheckFailed)
}

/// Encrypt `plaintext` and return the encoded ciphertext string.
pub fn encrypt_string(
    plaintext: &str,
    key: &Key,
    entropy: &dyn EntropySource,
) -> Result<String, CipherError> {
    encrypt_value(plaintext.as_bytes(), key, entropy).map(|v| v.to_string_repr())
}

/// Parse and decrypt an encoded ciphertext string.
///
/// Nothing is returned unless the whole message authenticates.
pub fn decrypt_string(ciphertext: &str, key: &Key) -> Result<String, CipherError> {
    let value = EncryptedValue::parse(ciphertext)?;
    let plaintext = decrypt_value(&value, key)?;
    std::str::from_utf8(&plaintext)
        .map(str::to_owned)
        .map_err(|_| CipherError::InvalidUtf8)
}

fn build_cipher(key: &Key) -> Aes256GcmSiv {
    Aes256GcmSiv::new(key.as_bytes().into())
}
