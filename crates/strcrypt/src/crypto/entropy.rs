//! Source of cryptographically secure random bytes for keys and nonces.

use aes_gcm_siv::aead::{rand_core::RngCore, OsRng};
use thiserror::Error;

/// The random source could not deliver the requested bytes.
#[derive(Debug, Error)]
#[error("could not gather sufficient random data: {0}")]
pub struct EntropyError(String);

impl EntropyError {
    /// Create an [`EntropyError`] with a description of the underlying cause.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Fills buffers with secure random bytes.
///
/// Production code uses [`OsEntropy`]. The trait boundary lets the
/// environment-failure path be exercised without a broken OS.
#[cfg_attr(test, mockall::automock)]
pub trait EntropySource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| EntropyError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_entropy_fills_buffer() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsEntropy.fill(&mut a).unwrap();
        OsEntropy.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn error_message_names_cause() {
        let e = EntropyError::new("getrandom unavailable");
        assert!(e.to_string().contains("getrandom unavailable"));
    }
}
