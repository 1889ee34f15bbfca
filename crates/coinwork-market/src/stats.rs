//! Role-scoped dashboard statistics.
//!
//! Every figure here is derived on demand from the stores; nothing is
//! cached, so the numbers always reflect the current ledger.

use coinwork_core::{Account, Identity, Role, SubmissionStatus};
use serde::{Deserialize, Serialize};

use crate::error::MarketResult;
use crate::service::MarketService;

/// Platform-wide figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    /// Number of accounts holding the Worker role.
    pub total_workers: usize,
    /// Number of accounts holding the Buyer role.
    pub total_buyers: usize,
    /// Sum of every account's coin balance.
    pub total_coins: i64,
    /// Total confirmed purchase volume, in cents.
    pub total_payments_cents: u64,
}

/// Figures for one buyer's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerStats {
    /// Tasks the buyer has posted and not deleted.
    pub task_count: usize,
    /// Open worker slots across those tasks.
    pub pending_worker_slots: i64,
    /// Coins paid out through approved submissions on the buyer's tasks.
    pub total_paid: u64,
}

/// Figures for one worker's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    /// Submissions the worker has ever made.
    pub total_submissions: usize,
    /// Submissions still awaiting judgment.
    pub pending_submissions: usize,
    /// Coins earned through approved submissions.
    pub total_earnings: u64,
}

impl MarketService {
    /// Platform-wide statistics. Admin-gated.
    pub fn admin_stats(&self, actor: &Identity) -> MarketResult<AdminStats> {
        self.require_admin(actor)?;
        Ok(AdminStats {
            total_workers: self.accounts.count_by_role(Role::Worker),
            total_buyers: self.accounts.count_by_role(Role::Buyer),
            total_coins: self.accounts.total_coins(),
            total_payments_cents: self.payments.total_amount_cents(),
        })
    }

    /// Statistics for one buyer's current tasks and payouts.
    #[must_use]
    pub fn buyer_stats(&self, buyer_email: &str) -> BuyerStats {
        let tasks = self.tasks.list_by_buyer(buyer_email);
        let pending_worker_slots = tasks
            .iter()
            .map(|task| task.required_workers.max(0))
            .sum();
        let task_ids: Vec<String> = tasks.into_iter().map(|task| task.id).collect();
        let total_paid = self
            .submissions
            .list_by_status_for_tasks(&task_ids, SubmissionStatus::Approved)
            .iter()
            .map(|submission| submission.payable_amount)
            .sum();

        BuyerStats {
            task_count: task_ids.len(),
            pending_worker_slots,
            total_paid,
        }
    }

    /// Statistics for one worker's submissions and earnings.
    #[must_use]
    pub fn worker_stats(&self, worker_email: &str) -> WorkerStats {
        let pending_submissions = self
            .submissions
            .list_by_worker_and_status(worker_email, SubmissionStatus::Pending)
            .len();
        let total_earnings = self
            .submissions
            .list_by_worker_and_status(worker_email, SubmissionStatus::Approved)
            .iter()
            .map(|submission| submission.payable_amount)
            .sum();

        WorkerStats {
            total_submissions: self.submissions.count_by_worker(worker_email),
            pending_submissions,
            total_earnings,
        }
    }

    /// The workers holding the most coins, best first.
    #[must_use]
    pub fn best_workers(&self, limit: usize) -> Vec<Account> {
        self.accounts.top_by_coins(Role::Worker, limit)
    }
}
