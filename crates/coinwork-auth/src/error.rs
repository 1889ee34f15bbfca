//! Error types for coinwork-auth.

use thiserror::Error;

/// Errors that can occur during token issuance or verification.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token's expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// The token is malformed, unsigned, or carries a bad signature.
    #[error("invalid token: {reason}")]
    InvalidToken {
        /// Why the token was rejected.
        reason: String,
    },

    /// Signing or configuration failure.
    #[error("jwt error: {reason}")]
    Jwt {
        /// Underlying cause.
        reason: String,
    },
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
