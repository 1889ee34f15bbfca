//! Error types for coinwork-notify.

use thiserror::Error;

/// Errors a notification sink may report.
///
/// Callers treat these as advisory: the emitting operation logs the failure
/// and carries on.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The sink could not deliver the notification.
    #[error("delivery failed: {0}")]
    Delivery(String),
}
