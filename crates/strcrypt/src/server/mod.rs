//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Render the HTML forms and the JSON API on top of
//!   [`EncryptionEndpoint`](crate::endpoint::EncryptionEndpoint).
//! - Inject shared application state (`AppState`) into handlers.

pub mod handlers;
pub mod middleware;
pub mod page;
pub mod router;
pub mod state;
