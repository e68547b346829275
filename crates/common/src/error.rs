//! Common error types shared across crates.

use std::fmt;

use thiserror::Error;

/// Classification of a failed cryptographic operation.
///
/// Every failure that reaches the endpoint boundary after input validation
/// carries exactly one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The supplied key string is not a valid serialized key.
    KeyFormat,
    /// The ciphertext failed its integrity check (wrong key or modified data).
    Authentication,
    /// The cryptographic environment is unusable, or the ciphertext could not
    /// be decoded at all.
    Environment,
}

impl ErrorKind {
    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::KeyFormat => "key_format_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Environment => "environment_error",
        }
    }

    /// Prefix shown in front of a failed decode on the HTML form.
    pub fn decode_prefix(&self) -> &'static str {
        match self {
            ErrorKind::Authentication => "Decrypt error",
            ErrorKind::KeyFormat | ErrorKind::Environment => "Key error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to JSON API callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::Crypto`] with [`ErrorKind::KeyFormat`] → 400
/// - [`ServiceError::Crypto`] with [`ErrorKind::Authentication`] → 422
/// - [`ServiceError::Crypto`] with [`ErrorKind::Environment`] → 500
///
/// [`ErrorKind::Environment`] also covers a client-supplied ciphertext that is
/// too malformed to hold a message at all, so a 500 does not always mean the
/// server is at fault.
/// - [`ServiceError::NotFound`] → 404
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: a required field is missing or blank.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A classified failure of the encrypt or decrypt operation.
    #[error("{kind}: {message}")]
    Crypto { kind: ErrorKind, message: String },

    /// No route matches the request.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::Crypto { kind, .. } => match kind {
                ErrorKind::KeyFormat => 400,
                ErrorKind::Authentication => 422,
                ErrorKind::Environment => 500,
            },
            ServiceError::NotFound(_) => 404,
        }
    }

    /// Returns the machine-readable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Crypto { kind, .. } => kind.code(),
            ServiceError::NotFound(_) => "not_found",
        }
    }

    /// Returns the message without the variant prefix, safe to show callers.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::BadRequest(m) | ServiceError::NotFound(m) => m,
            ServiceError::Crypto { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto(kind: ErrorKind) -> ServiceError {
        ServiceError::Crypto {
            kind,
            message: "x".into(),
        }
    }

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(crypto(ErrorKind::KeyFormat).http_status(), 400);
        assert_eq!(crypto(ErrorKind::Authentication).http_status(), 422);
        assert_eq!(crypto(ErrorKind::Environment).http_status(), 500);
        assert_eq!(ServiceError::NotFound("x".into()).http_status(), 404);
    }

    #[test]
    fn codes_follow_kind() {
        assert_eq!(crypto(ErrorKind::KeyFormat).code(), "key_format_error");
        assert_eq!(
            crypto(ErrorKind::Authentication).code(),
            "authentication_error"
        );
        assert_eq!(ServiceError::BadRequest("x".into()).code(), "bad_request");
    }

    #[test]
    fn decode_prefixes() {
        assert_eq!(ErrorKind::KeyFormat.decode_prefix(), "Key error");
        assert_eq!(ErrorKind::Environment.decode_prefix(), "Key error");
        assert_eq!(ErrorKind::Authentication.decode_prefix(), "Decrypt error");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("value: This value should not be blank.".into());
        assert!(e.to_string().contains("should not be blank"));
        assert_eq!(e.message(), "value: This value should not be blank.");
    }
}
