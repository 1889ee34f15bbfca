//! Error types for coinwork-core.

use thiserror::Error;

/// Errors that can occur while constructing core domain values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The supplied role string is not a known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
