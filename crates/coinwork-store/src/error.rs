//! Error types for coinwork-store.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No document matches the given key.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of document looked up (e.g. "account", "task").
        entity: &'static str,
        /// The key that did not resolve.
        key: String,
    },

    /// A document with the same unique key already exists.
    #[error("duplicate {entity}: {key}")]
    DuplicateKey {
        /// Kind of document being inserted.
        entity: &'static str,
        /// The conflicting key.
        key: String,
    },

    /// The external transaction id was already recorded.
    #[error("transaction already recorded: {0}")]
    DuplicateTransaction(String),
}

impl StoreError {
    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Shorthand for a duplicate-key error.
    #[must_use]
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            entity,
            key: key.into(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
