//! Common types, protocol definitions, and errors shared across `strcrypt` crates.

pub mod error;
pub mod protocol;

pub use error::{ErrorKind, ServiceError};
