//! Error types for the marketplace core.

use thiserror::Error;

use coinwork_store::StoreError;

/// Errors that marketplace operations can return.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarketError {
    /// A required field is missing or malformed. User-correctable.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of entity looked up.
        entity: &'static str,
        /// The key that did not resolve.
        key: String,
    },

    /// A unique key is already taken, or the request repeats a completed one.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The task has no open worker slots left.
    #[error("task has no open slots: {0}")]
    TaskExhausted(String),

    /// The entity is in a terminal status and cannot transition again.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: String,
        /// Attempted target status.
        to: String,
    },

    /// The acting principal lacks the required role.
    #[error("forbidden: admin role required")]
    Forbidden,
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, key } => Self::NotFound { entity, key },
            StoreError::DuplicateKey { entity, key } => {
                Self::Conflict(format!("{entity} already exists: {key}"))
            }
            StoreError::DuplicateTransaction(id) => {
                Self::Conflict(format!("transaction already recorded: {id}"))
            }
        }
    }
}

/// Result alias for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;
