//! Core types shared across the crate: the error taxonomy and its
//! user-facing formatting.

pub mod error;

pub use error::{ErrorContext, PortalError, user_friendly_error};

/// Convenience alias used throughout the store and client.
pub type Result<T, E = PortalError> = std::result::Result<T, E>;
