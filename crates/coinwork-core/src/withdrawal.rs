//! Withdrawal requests and their status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The status of a withdrawal request.
///
/// `Pending` moves to `Approved` exactly once; `Approved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Awaiting admin approval.
    Pending,
    /// Approved; the worker's balance has been debited.
    Approved,
}

impl WithdrawalStatus {
    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Approved))
    }
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// A worker's request to convert coin balance into an external payout.
///
/// Creating a request does not touch the balance; the debit happens when an
/// admin approves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// Unique identifier for this withdrawal.
    pub id: String,
    /// Email of the requesting worker.
    pub worker_email: String,
    /// Display name of the requesting worker.
    pub worker_name: String,
    /// Coins to be debited on approval.
    pub coin_amount: u64,
    /// Cash value of the payout, in cents.
    pub cash_amount_cents: u64,
    /// Payment system the payout goes through (e.g. "bkash", "paypal").
    pub payment_system: String,
    /// Destination account descriptor within that payment system.
    pub account_number: String,
    /// Current status.
    pub status: WithdrawalStatus,
    /// When the withdrawal was requested.
    pub requested_at: DateTime<Utc>,
}

impl Withdrawal {
    /// Creates a new pending withdrawal with a generated id and timestamp.
    #[must_use]
    pub fn new(
        worker_email: impl Into<String>,
        worker_name: impl Into<String>,
        coin_amount: u64,
        cash_amount_cents: u64,
        payment_system: impl Into<String>,
        account_number: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            worker_email: worker_email.into(),
            worker_name: worker_name.into(),
            coin_amount,
            cash_amount_cents,
            payment_system: payment_system.into(),
            account_number: account_number.into(),
            status: WithdrawalStatus::Pending,
            requested_at: Utc::now(),
        }
    }
}
