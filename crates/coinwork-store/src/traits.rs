//! Repository contracts for the marketplace stores.
//!
//! The Marketplace Core holds these as `Arc<dyn …>` handles; it never sees a
//! raw collection. Every method maps to a single-document read or write, and
//! the delta operations (`apply_delta`, `adjust_required_workers`) are atomic
//! within the store so concurrent adjustments cannot lose updates.

use coinwork_core::{
    Account, PaymentRecord, Role, Submission, SubmissionStatus, Task, Withdrawal, WithdrawalStatus,
};

use crate::error::StoreResult;

/// Durable mapping from account identity (email) to account state.
///
/// This is the ledger store: `apply_delta` is the only balance-mutating
/// entry point in the whole system.
pub trait AccountStore: Send + Sync {
    /// Inserts a new account. Fails with `DuplicateKey` if the email exists.
    fn insert(&self, account: Account) -> StoreResult<()>;

    /// Looks up an account by email.
    fn find_by_email(&self, email: &str) -> StoreResult<Account>;

    /// Applies a signed coin delta to the account's balance and returns the
    /// new balance. Fails with `NotFound` for an unknown email; no floor is
    /// enforced, so the result may be negative.
    fn apply_delta(&self, email: &str, delta: i64) -> StoreResult<i64>;

    /// Changes the account's role.
    fn update_role(&self, email: &str, role: Role) -> StoreResult<()>;

    /// Removes the account.
    fn delete(&self, email: &str) -> StoreResult<()>;

    /// All accounts, in no particular order.
    fn list(&self) -> Vec<Account>;

    /// Number of accounts holding the given role.
    fn count_by_role(&self, role: Role) -> usize;

    /// Sum of every account's coin balance.
    fn total_coins(&self) -> i64;

    /// The accounts with the given role holding the most coins, best first.
    fn top_by_coins(&self, role: Role, limit: usize) -> Vec<Account>;
}

/// Durable mapping from task id to task state.
pub trait TaskStore: Send + Sync {
    /// Inserts a new task.
    fn insert(&self, task: Task) -> StoreResult<()>;

    /// Looks up a task by id.
    fn get(&self, task_id: &str) -> StoreResult<Task>;

    /// Removes the task, returning its last state.
    fn delete(&self, task_id: &str) -> StoreResult<Task>;

    /// Updates the editable text fields of a task.
    fn update_details(
        &self,
        task_id: &str,
        title: &str,
        detail: &str,
        submission_info: Option<&str>,
    ) -> StoreResult<()>;

    /// Adjusts the remaining-slot counter by a signed delta and returns the
    /// new count. Atomic within the store.
    fn adjust_required_workers(&self, task_id: &str, delta: i64) -> StoreResult<i64>;

    /// Tasks posted by the given buyer, newest first.
    fn list_by_buyer(&self, buyer_email: &str) -> Vec<Task>;

    /// Tasks with at least one open slot.
    fn list_available(&self) -> Vec<Task>;

    /// All tasks, in no particular order.
    fn list(&self) -> Vec<Task>;
}

/// Durable mapping from submission id to submission state.
pub trait SubmissionStore: Send + Sync {
    /// Inserts a new submission.
    fn insert(&self, submission: Submission) -> StoreResult<()>;

    /// Looks up a submission by id.
    fn get(&self, submission_id: &str) -> StoreResult<Submission>;

    /// Overwrites the submission's status. The caller is responsible for
    /// validating the transition first.
    fn update_status(&self, submission_id: &str, status: SubmissionStatus) -> StoreResult<()>;

    /// Submissions made by the given worker.
    fn list_by_worker(&self, worker_email: &str) -> Vec<Submission>;

    /// Submissions by the given worker in the given status.
    fn list_by_worker_and_status(
        &self,
        worker_email: &str,
        status: SubmissionStatus,
    ) -> Vec<Submission>;

    /// Submissions in the given status whose task id is in `task_ids`.
    fn list_by_status_for_tasks(
        &self,
        task_ids: &[String],
        status: SubmissionStatus,
    ) -> Vec<Submission>;

    /// Number of submissions made by the given worker.
    fn count_by_worker(&self, worker_email: &str) -> usize;
}

/// Durable mapping from withdrawal id to withdrawal state.
pub trait WithdrawalStore: Send + Sync {
    /// Inserts a new withdrawal request.
    fn insert(&self, withdrawal: Withdrawal) -> StoreResult<()>;

    /// Looks up a withdrawal by id.
    fn get(&self, withdrawal_id: &str) -> StoreResult<Withdrawal>;

    /// Overwrites the withdrawal's status. The caller is responsible for
    /// validating the transition first.
    fn update_status(&self, withdrawal_id: &str, status: WithdrawalStatus) -> StoreResult<()>;

    /// Withdrawal requests still awaiting approval.
    fn list_pending(&self) -> Vec<Withdrawal>;
}

/// Append-only log of confirmed coin purchases.
pub trait PaymentLog: Send + Sync {
    /// Appends a payment record. Fails with `DuplicateTransaction` if the
    /// external transaction id was already recorded; this is the uniqueness
    /// constraint that makes crediting at-most-once.
    fn append(&self, record: PaymentRecord) -> StoreResult<()>;

    /// Payment history for the given email, newest first.
    fn list_by_email(&self, email: &str) -> Vec<PaymentRecord>;

    /// Total price paid across all recorded payments, in cents.
    fn total_amount_cents(&self) -> u64;
}
