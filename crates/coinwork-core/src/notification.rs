//! User-facing notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A best-effort, append-only record of a user-facing event.
///
/// Notifications have no status and no deletion path; delivery is owned by
/// the notification sink and its failure never blocks the operation that
/// emitted the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique identifier for this notification.
    pub id: String,
    /// Email of the recipient.
    pub recipient_email: String,
    /// Human-readable message.
    pub message: String,
    /// Suggested navigation target in the frontend.
    pub action_route: String,
    /// When the notification was emitted.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a new notification with a generated id and timestamp.
    #[must_use]
    pub fn new(
        recipient_email: impl Into<String>,
        message: impl Into<String>,
        action_route: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            recipient_email: recipient_email.into(),
            message: message.into(),
            action_route: action_route.into(),
            created_at: Utc::now(),
        }
    }
}
