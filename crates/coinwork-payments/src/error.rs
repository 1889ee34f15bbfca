//! Error types for coinwork-payments.

use thiserror::Error;

/// Errors the payment authority may report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The requested charge amount is not chargeable.
    #[error("invalid amount: {0} cents")]
    InvalidAmount(u64),

    /// No intent matches the given id.
    #[error("payment intent not found: {0}")]
    IntentNotFound(String),
}

/// Result alias for payment-authority operations.
pub type Result<T> = std::result::Result<T, PaymentError>;
