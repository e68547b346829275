//! Request and response types exchanged over the HTTP surface.
//!
//! The HTML form and the JSON API share [`CryptRequest`]; the remaining types
//! are JSON bodies only.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Input for both encode and decode.
///
/// Missing fields deserialise to empty strings so that they are reported by
/// input validation rather than rejected by the extractor.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CryptRequest {
    /// Plaintext when encoding, ciphertext when decoding.
    #[serde(default)]
    pub value: String,
    /// Serialized key in its ASCII-safe encoding.
    #[serde(default)]
    pub key: String,
}

impl CryptRequest {
    /// Construct a [`CryptRequest`] from a value and a key string.
    pub fn new(value: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Debug for CryptRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Neither field may end up in logs.
        f.debug_struct("CryptRequest")
            .field("value", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Successful response body for `POST /api/encode` and `POST /api/decode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptResponse {
    /// Ciphertext (encode) or plaintext (decode).
    pub output: String,
}

/// Response body for `GET /api/key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResponse {
    /// Freshly generated key in its ASCII-safe encoding.
    pub key: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"key_format_error"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status, always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version of the running binary.
    pub version: String,
}
