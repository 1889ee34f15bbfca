//! Worker submissions and their status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The status of a submission.
///
/// `Pending` moves to `Approved` or `Rejected` exactly once; both are
/// terminal. No further transition is permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// Awaiting buyer or admin judgment.
    Pending,
    /// Accepted; the worker has been credited.
    Approved,
    /// Declined; the task slot was returned.
    Rejected,
}

impl SubmissionStatus {
    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        use SubmissionStatus::{Approved, Pending, Rejected};

        matches!((self, target), (Pending, Approved | Rejected))
    }

    /// Returns true if no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// A worker's claim against one task slot.
///
/// The buyer email, task title, and payable amount are denormalized from the
/// task document at submit time so the record stays meaningful if the task
/// is later deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier for this submission.
    pub id: String,
    /// The task this submission is for.
    pub task_id: String,
    /// Task title at submit time.
    pub task_title: String,
    /// Email of the submitting worker.
    pub worker_email: String,
    /// Email of the task's owning buyer at submit time.
    pub buyer_email: String,
    /// Coins owed on approval, fixed at submit time.
    pub payable_amount: u64,
    /// What the worker provided.
    pub details: String,
    /// Current status.
    pub status: SubmissionStatus,
    /// When the work was submitted.
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a new pending submission with a generated id and timestamp.
    #[must_use]
    pub fn new(
        task_id: impl Into<String>,
        task_title: impl Into<String>,
        worker_email: impl Into<String>,
        buyer_email: impl Into<String>,
        payable_amount: u64,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            task_title: task_title.into(),
            worker_email: worker_email.into(),
            buyer_email: buyer_email.into(),
            payable_amount,
            details: details.into(),
            status: SubmissionStatus::Pending,
            submitted_at: Utc::now(),
        }
    }
}
