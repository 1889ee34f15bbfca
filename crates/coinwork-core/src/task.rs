//! Task records posted by buyers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a task.
///
/// A task is "active" for its whole stored life; it becomes implicitly
/// exhausted when its remaining slot count reaches zero and disappears
/// entirely when deleted. There are no intermediate states.
pub const TASK_STATUS_ACTIVE: &str = "active";

/// A unit of work posted by a buyer.
///
/// Each task carries a fixed payable amount per slot and a counted number of
/// worker slots. Every accepted submission consumes one slot; every rejected
/// submission returns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: String,
    /// Email of the buyer who posted the task.
    pub buyer_email: String,
    /// Short title shown to workers.
    pub title: String,
    /// Full task description.
    pub detail: String,
    /// Coins paid out per approved submission.
    pub payable_amount: u64,
    /// Remaining worker slots. Signed so historical data with a negative
    /// count can still be represented, but the marketplace never decrements
    /// below zero.
    pub required_workers: i64,
    /// Lifecycle status string.
    pub status: String,
    /// What a worker must provide when submitting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_info: Option<String>,
    /// When the task was posted.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new active task with a generated id and timestamp.
    #[must_use]
    pub fn new(
        buyer_email: impl Into<String>,
        title: impl Into<String>,
        detail: impl Into<String>,
        payable_amount: u64,
        required_workers: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            buyer_email: buyer_email.into(),
            title: title.into(),
            detail: detail.into(),
            payable_amount,
            required_workers,
            status: TASK_STATUS_ACTIVE.to_string(),
            submission_info: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the submission instructions.
    #[must_use]
    pub fn with_submission_info(mut self, info: impl Into<String>) -> Self {
        self.submission_info = Some(info.into());
        self
    }

    /// Whether the task has any slots left for new submissions.
    #[must_use]
    pub const fn has_open_slots(&self) -> bool {
        self.required_workers > 0
    }

    /// The refund owed to the buyer if the task is deleted now:
    /// remaining slots times the per-slot payable amount.
    #[must_use]
    pub const fn refund_amount(&self) -> i64 {
        if self.required_workers <= 0 {
            0
        } else {
            self.required_workers * self.payable_amount as i64
        }
    }
}
