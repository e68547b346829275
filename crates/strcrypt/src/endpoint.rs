//! [`EncryptionEndpoint`]: validate input, load the key, run one cipher
//! operation, classify the outcome.
//!
//! Every call is an independent request/response transaction. The key is
//! loaded, used and dropped (zeroized) inside a single call.

use std::sync::Arc;

use common::protocol::CryptRequest;
use common::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::debug;

use crate::crypto::{self, CipherError, EntropySource, Key, KeyError, OsEntropy};

/// Message attached to every blank required field.
pub const NOT_BLANK: &str = "This value should not be blank.";

/// The two operations the endpoint offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

impl Operation {
    /// Lower-case name used in routes and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encode => "encode",
            Operation::Decode => "decode",
        }
    }
}

/// A required field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Errors returned by [`EncryptionEndpoint`].
#[derive(Debug, Error)]
pub enum EndpointError {
    /// One or more fields were blank; no cryptographic call was made.
    #[error("{}", describe(.0))]
    Invalid(Vec<FieldViolation>),

    /// The key string could not be deserialized.
    #[error(transparent)]
    KeyFormat(#[from] KeyError),

    /// Encryption or decryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

impl EndpointError {
    /// Classification of the failure, or `None` for a validation failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            EndpointError::Invalid(_) => None,
            EndpointError::KeyFormat(_) => Some(ErrorKind::KeyFormat),
            EndpointError::Cipher(e) => Some(e.kind()),
        }
    }

    /// Field violations, empty unless this is [`EndpointError::Invalid`].
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            EndpointError::Invalid(v) => v.as_slice(),
            _ => &[],
        }
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<EndpointError> for ServiceError {
    fn from(err: EndpointError) -> Self {
        match err.kind() {
            None => ServiceError::BadRequest(err.to_string()),
            Some(kind) => ServiceError::Crypto {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// Stateless encode/decode service.
///
/// Cheap to clone; the only shared part is the immutable entropy source.
#[derive(Clone)]
pub struct EncryptionEndpoint {
    entropy: Arc<dyn EntropySource>,
}

impl EncryptionEndpoint {
    /// Create an endpoint drawing nonces and keys from `entropy`.
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// Reject empty fields before any cryptographic work.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::Invalid`] listing every empty field.
    pub fn validate(req: &CryptRequest) -> Result<(), EndpointError> {
        let violations: Vec<FieldViolation> = [("value", &req.value), ("key", &req.key)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(field, _)| FieldViolation {
                field,
                message: NOT_BLANK,
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(EndpointError::Invalid(violations))
        }
    }

    /// Run `op` on `req`.
    pub fn dispatch(&self, op: Operation, req: &CryptRequest) -> Result<String, EndpointError> {
        match op {
            Operation::Encode => self.encode(req),
            Operation::Decode => self.decode(req),
        }
    }

    /// Encrypt `req.value` under the key serialized in `req.key`.
    ///
    /// # Errors
    ///
    /// Validation, key-format, or environment failures. Encryption itself
    /// cannot fail for a well-formed key.
    pub fn encode(&self, req: &CryptRequest) -> Result<String, EndpointError> {
        Self::validate(req)?;
        let key = Key::from_ascii_safe(&req.key)?;
        let ciphertext = crypto::encrypt_string(&req.value, &key, self.entropy.as_ref())?;
        debug!(len = ciphertext.len(), "value encoded");
        Ok(ciphertext)
    }

    /// Decrypt the ciphertext in `req.value` with the key in `req.key`.
    ///
    /// # Errors
    ///
    /// Validation or key-format failures, [`ErrorKind::Authentication`] when
    /// the integrity check fails, [`ErrorKind::Environment`] when the
    /// ciphertext cannot be decoded.
    pub fn decode(&self, req: &CryptRequest) -> Result<String, EndpointError> {
        Self::validate(req)?;
        let key = Key::from_ascii_safe(&req.key)?;
        let plaintext = crypto::decrypt_string(&req.value, &key)?;
        debug!("value decoded");
        Ok(plaintext)
    }

    /// Generate a fresh key in its ASCII-safe serialization.
    pub fn generate_key(&self) -> Result<String, EndpointError> {
        let key = Key::generate(self.entropy.as_ref()).map_err(CipherError::from)?;
        Ok(key.to_ascii_safe())
    }
}

impl Default for EncryptionEndpoint {
    fn default() -> Self {
        Self::new(Arc::new(OsEntropy))
    }
}
