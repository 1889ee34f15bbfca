//! Task lifecycle: posting, editing, deleting, and listing tasks.

use coinwork_core::Task;

use crate::error::{MarketError, MarketResult};
use crate::service::MarketService;

impl MarketService {
    /// Posts a new task on behalf of a buyer.
    ///
    /// The buyer must exist, the title must be non-empty, and at least one
    /// worker slot must be requested. No coins move at creation time; the
    /// buyer's balance is charged only when submissions are approved.
    pub fn create_task(
        &self,
        buyer_email: &str,
        title: &str,
        detail: &str,
        payable_amount: u64,
        required_workers: i64,
        submission_info: Option<&str>,
    ) -> MarketResult<Task> {
        if buyer_email.trim().is_empty() {
            return Err(MarketError::InvalidInput("buyer_email"));
        }
        if title.trim().is_empty() {
            return Err(MarketError::InvalidInput("title"));
        }
        if payable_amount == 0 {
            return Err(MarketError::InvalidInput("payable_amount"));
        }
        if required_workers < 1 {
            return Err(MarketError::InvalidInput("required_workers"));
        }
        self.accounts.find_by_email(buyer_email)?;

        let mut task = Task::new(buyer_email, title, detail, payable_amount, required_workers);
        if let Some(info) = submission_info {
            task = task.with_submission_info(info);
        }
        self.tasks.insert(task.clone())?;

        tracing::info!(
            task_id = %task.id,
            buyer = buyer_email,
            payable_amount,
            required_workers,
            "task created"
        );
        Ok(task)
    }

    /// Updates the editable text fields of a task.
    pub fn update_task(
        &self,
        task_id: &str,
        title: &str,
        detail: &str,
        submission_info: Option<&str>,
    ) -> MarketResult<Task> {
        if title.trim().is_empty() {
            return Err(MarketError::InvalidInput("title"));
        }

        let lock = self.locks.task(task_id);
        let _guard = lock.lock();

        self.tasks.update_details(task_id, title, detail, submission_info)?;
        Ok(self.tasks.get(task_id)?)
    }

    /// Deletes a task and refunds the buyer for its unfilled slots.
    ///
    /// The refund is `required_workers * payable_amount`, never negative.
    /// The credit is applied first and the task removed second, both under
    /// the task's entity lock; pending submissions against the task stay on
    /// record and are resolved later from their denormalized fields.
    pub fn delete_task(&self, task_id: &str) -> MarketResult<Task> {
        let lock = self.locks.task(task_id);
        let _guard = lock.lock();

        let task = self.tasks.get(task_id)?;
        let refund = task.refund_amount();
        if refund > 0 {
            self.apply_balance_delta(&task.buyer_email, refund)?;
        }

        match self.tasks.delete(task_id) {
            Ok(deleted) => {
                self.locks.evict_task(task_id);
                tracing::info!(
                    task_id,
                    buyer = %deleted.buyer_email,
                    refund,
                    "task deleted"
                );
                Ok(deleted)
            }
            Err(err) => {
                // The refund already landed. The credit is kept and the
                // discrepancy logged for reconciliation.
                tracing::error!(
                    task_id,
                    buyer = %task.buyer_email,
                    refund,
                    error = %err,
                    "task refund applied but delete failed; reconciliation needed"
                );
                Err(err.into())
            }
        }
    }

    /// Looks up a task by id.
    pub fn task(&self, task_id: &str) -> MarketResult<Task> {
        Ok(self.tasks.get(task_id)?)
    }

    /// Tasks with at least one open worker slot.
    #[must_use]
    pub fn available_tasks(&self) -> Vec<Task> {
        self.tasks.list_available()
    }

    /// Tasks posted by the given buyer, newest first.
    #[must_use]
    pub fn tasks_by_buyer(&self, buyer_email: &str) -> Vec<Task> {
        self.tasks.list_by_buyer(buyer_email)
    }
}
