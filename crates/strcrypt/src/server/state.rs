//! Shared application state injected into every Axum handler.

use crate::endpoint::EncryptionEndpoint;

/// Application state shared across all request handlers.
///
/// Holds no per-request data and nothing mutable; cloning is an `Arc` bump.
#[derive(Clone, Default)]
pub struct AppState {
    /// The stateless encode/decode service.
    pub endpoint: EncryptionEndpoint,
}

impl AppState {
    /// Create a new [`AppState`] around `endpoint`.
    pub fn new(endpoint: EncryptionEndpoint) -> Self {
        Self { endpoint }
    }
}
