//! In-memory store implementations.
//!
//! Each store is a `HashMap` (or `Vec` for the payment log) behind a
//! `parking_lot::RwLock`. Delta operations mutate under the write lock, so
//! they are atomic with respect to concurrent callers.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use coinwork_core::{
    Account, PaymentRecord, Role, Submission, SubmissionStatus, Task, Withdrawal, WithdrawalStatus,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{AccountStore, PaymentLog, SubmissionStore, TaskStore, WithdrawalStore};

/// In-memory ledger store keyed by email.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    /// Creates an empty account store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for MemoryAccountStore {
    fn insert(&self, account: Account) -> StoreResult<()> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.email) {
            return Err(StoreError::duplicate("account", &account.email));
        }
        accounts.insert(account.email.clone(), account);
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Account> {
        self.accounts
            .read()
            .get(email)
            .cloned()
            .ok_or_else(|| StoreError::not_found("account", email))
    }

    fn apply_delta(&self, email: &str, delta: i64) -> StoreResult<i64> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| StoreError::not_found("account", email))?;
        account.coin += delta;
        Ok(account.coin)
    }

    fn update_role(&self, email: &str, role: Role) -> StoreResult<()> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| StoreError::not_found("account", email))?;
        account.role = role;
        Ok(())
    }

    fn delete(&self, email: &str) -> StoreResult<()> {
        self.accounts
            .write()
            .remove(email)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("account", email))
    }

    fn list(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }

    fn count_by_role(&self, role: Role) -> usize {
        self.accounts
            .read()
            .values()
            .filter(|a| a.role == role)
            .count()
    }

    fn total_coins(&self) -> i64 {
        self.accounts.read().values().map(|a| a.coin).sum()
    }

    fn top_by_coins(&self, role: Role, limit: usize) -> Vec<Account> {
        let mut matching: Vec<Account> = self
            .accounts
            .read()
            .values()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.coin.cmp(&a.coin));
        matching.truncate(limit);
        matching
    }
}

/// In-memory task registry keyed by task id.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl MemoryTaskStore {
    /// Creates an empty task store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryTaskStore {
    fn insert(&self, task: Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write();
        if tasks.contains_key(&task.id) {
            return Err(StoreError::duplicate("task", &task.id));
        }
        tasks.insert(task.id.clone(), task);
        Ok(())
    }

    fn get(&self, task_id: &str) -> StoreResult<Task> {
        self.tasks
            .read()
            .get(task_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("task", task_id))
    }

    fn delete(&self, task_id: &str) -> StoreResult<Task> {
        self.tasks
            .write()
            .remove(task_id)
            .ok_or_else(|| StoreError::not_found("task", task_id))
    }

    fn update_details(
        &self,
        task_id: &str,
        title: &str,
        detail: &str,
        submission_info: Option<&str>,
    ) -> StoreResult<()> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::not_found("task", task_id))?;
        task.title = title.to_string();
        task.detail = detail.to_string();
        task.submission_info = submission_info.map(ToString::to_string);
        Ok(())
    }

    fn adjust_required_workers(&self, task_id: &str, delta: i64) -> StoreResult<i64> {
        let mut tasks = self.tasks.write();
        let task = tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::not_found("task", task_id))?;
        task.required_workers += delta;
        Ok(task.required_workers)
    }

    fn list_by_buyer(&self, buyer_email: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .values()
            .filter(|t| t.buyer_email == buyer_email)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
    }

    fn list_available(&self) -> Vec<Task> {
        self.tasks
            .read()
            .values()
            .filter(|t| t.has_open_slots())
            .cloned()
            .collect()
    }

    fn list(&self) -> Vec<Task> {
        self.tasks.read().values().cloned().collect()
    }
}

/// In-memory submission log keyed by submission id.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    submissions: RwLock<HashMap<String, Submission>>,
}

impl MemorySubmissionStore {
    /// Creates an empty submission store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubmissionStore for MemorySubmissionStore {
    fn insert(&self, submission: Submission) -> StoreResult<()> {
        let mut submissions = self.submissions.write();
        if submissions.contains_key(&submission.id) {
            return Err(StoreError::duplicate("submission", &submission.id));
        }
        submissions.insert(submission.id.clone(), submission);
        Ok(())
    }

    fn get(&self, submission_id: &str) -> StoreResult<Submission> {
        self.submissions
            .read()
            .get(submission_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("submission", submission_id))
    }

    fn update_status(&self, submission_id: &str, status: SubmissionStatus) -> StoreResult<()> {
        let mut submissions = self.submissions.write();
        let submission = submissions
            .get_mut(submission_id)
            .ok_or_else(|| StoreError::not_found("submission", submission_id))?;
        submission.status = status;
        Ok(())
    }

    fn list_by_worker(&self, worker_email: &str) -> Vec<Submission> {
        self.submissions
            .read()
            .values()
            .filter(|s| s.worker_email == worker_email)
            .cloned()
            .collect()
    }

    fn list_by_worker_and_status(
        &self,
        worker_email: &str,
        status: SubmissionStatus,
    ) -> Vec<Submission> {
        self.submissions
            .read()
            .values()
            .filter(|s| s.worker_email == worker_email && s.status == status)
            .cloned()
            .collect()
    }

    fn list_by_status_for_tasks(
        &self,
        task_ids: &[String],
        status: SubmissionStatus,
    ) -> Vec<Submission> {
        let wanted: HashSet<&str> = task_ids.iter().map(String::as_str).collect();
        self.submissions
            .read()
            .values()
            .filter(|s| s.status == status && wanted.contains(s.task_id.as_str()))
            .cloned()
            .collect()
    }

    fn count_by_worker(&self, worker_email: &str) -> usize {
        self.submissions
            .read()
            .values()
            .filter(|s| s.worker_email == worker_email)
            .count()
    }
}

/// In-memory withdrawal log keyed by withdrawal id.
#[derive(Debug, Default)]
pub struct MemoryWithdrawalStore {
    withdrawals: RwLock<HashMap<String, Withdrawal>>,
}

impl MemoryWithdrawalStore {
    /// Creates an empty withdrawal store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WithdrawalStore for MemoryWithdrawalStore {
    fn insert(&self, withdrawal: Withdrawal) -> StoreResult<()> {
        let mut withdrawals = self.withdrawals.write();
        if withdrawals.contains_key(&withdrawal.id) {
            return Err(StoreError::duplicate("withdrawal", &withdrawal.id));
        }
        withdrawals.insert(withdrawal.id.clone(), withdrawal);
        Ok(())
    }

    fn get(&self, withdrawal_id: &str) -> StoreResult<Withdrawal> {
        self.withdrawals
            .read()
            .get(withdrawal_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("withdrawal", withdrawal_id))
    }

    fn update_status(&self, withdrawal_id: &str, status: WithdrawalStatus) -> StoreResult<()> {
        let mut withdrawals = self.withdrawals.write();
        let withdrawal = withdrawals
            .get_mut(withdrawal_id)
            .ok_or_else(|| StoreError::not_found("withdrawal", withdrawal_id))?;
        withdrawal.status = status;
        Ok(())
    }

    fn list_pending(&self) -> Vec<Withdrawal> {
        self.withdrawals
            .read()
            .values()
            .filter(|w| w.status == WithdrawalStatus::Pending)
            .cloned()
            .collect()
    }
}

/// In-memory append-only payment log with a transaction-id uniqueness
/// constraint.
#[derive(Debug, Default)]
pub struct MemoryPaymentLog {
    inner: RwLock<PaymentLogInner>,
}

#[derive(Debug, Default)]
struct PaymentLogInner {
    records: Vec<PaymentRecord>,
    transaction_ids: HashSet<String>,
}

impl MemoryPaymentLog {
    /// Creates an empty payment log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentLog for MemoryPaymentLog {
    fn append(&self, record: PaymentRecord) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.transaction_ids.insert(record.transaction_id.clone()) {
            return Err(StoreError::DuplicateTransaction(record.transaction_id));
        }
        inner.records.push(record);
        Ok(())
    }

    fn list_by_email(&self, email: &str) -> Vec<PaymentRecord> {
        let mut records: Vec<PaymentRecord> = self
            .inner
            .read()
            .records
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    fn total_amount_cents(&self) -> u64 {
        self.inner.read().records.iter().map(|r| r.price_cents).sum()
    }
}
