//! Key handling and AES-256-GCM-SIV string encryption primitives.
//!
//! This module is intentionally free of HTTP dependencies.
//!
//! # Ciphertext format
//!
//! ```text
//! hex( 5E C0 01 00 || nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! The version header is authenticated as associated data, so it cannot be
//! swapped without failing decryption.

pub mod cipher;
pub mod entropy;
pub mod key;

pub use cipher::{decrypt_string, encrypt_string, CipherError};
pub use entropy::{EntropyError, EntropySource, OsEntropy};
pub use key::{Key, KeyError};
