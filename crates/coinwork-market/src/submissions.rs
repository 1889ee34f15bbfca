//! Submission lifecycle: claiming a slot, approval, and rejection.

use coinwork_core::{Notification, Submission, SubmissionStatus};

use crate::error::{MarketError, MarketResult};
use crate::service::MarketService;

impl MarketService {
    /// Submits work against a task, consuming one open slot.
    ///
    /// The task title, buyer email, and payable amount are denormalized onto
    /// the submission so the record survives task deletion. The insert and
    /// the slot decrement run under the task's entity lock; a full task
    /// fails with `TaskExhausted` before anything is written.
    pub fn submit_work(
        &self,
        task_id: &str,
        worker_email: &str,
        details: &str,
    ) -> MarketResult<Submission> {
        if task_id.trim().is_empty() {
            return Err(MarketError::InvalidInput("task_id"));
        }
        if worker_email.trim().is_empty() {
            return Err(MarketError::InvalidInput("worker_email"));
        }
        if details.trim().is_empty() {
            return Err(MarketError::InvalidInput("details"));
        }
        self.accounts.find_by_email(worker_email)?;

        let lock = self.locks.task(task_id);
        let _guard = lock.lock();

        let task = self.tasks.get(task_id)?;
        if !task.has_open_slots() {
            return Err(MarketError::TaskExhausted(task_id.to_string()));
        }

        let submission = Submission::new(
            &task.id,
            &task.title,
            worker_email,
            &task.buyer_email,
            task.payable_amount,
            details,
        );
        self.submissions.insert(submission.clone())?;
        let remaining = self.tasks.adjust_required_workers(task_id, -1)?;

        tracing::info!(
            submission_id = %submission.id,
            task_id,
            worker = worker_email,
            remaining_slots = remaining,
            "work submitted"
        );
        self.notify(Notification::new(
            &task.buyer_email,
            format!("{worker_email} submitted work for \"{}\"", task.title),
            "/dashboard/review",
        ));
        Ok(submission)
    }

    /// Approves a pending submission and credits the worker.
    ///
    /// The status flip happens before the credit, both under the
    /// submission's entity lock, so a concurrent second approval observes a
    /// terminal status and fails without a double payout.
    pub fn approve_submission(&self, submission_id: &str) -> MarketResult<Submission> {
        let lock = self.locks.submission(submission_id);
        let _guard = lock.lock();

        let mut submission = self.submissions.get(submission_id)?;
        self.check_submission_transition(&submission, SubmissionStatus::Approved)?;

        self.submissions
            .update_status(submission_id, SubmissionStatus::Approved)?;
        submission.status = SubmissionStatus::Approved;

        let credit = i64::try_from(submission.payable_amount)
            .map_err(|_| MarketError::InvalidInput("payable_amount"))?;
        if let Err(err) = self.apply_balance_delta(&submission.worker_email, credit) {
            // Status already flipped to approved. The payout discrepancy is
            // logged for reconciliation and the error surfaced.
            tracing::error!(
                submission_id,
                worker = %submission.worker_email,
                credit,
                error = %err,
                "submission approved but worker credit failed; reconciliation needed"
            );
            return Err(err);
        }

        self.locks.evict_submission(submission_id);
        tracing::info!(
            submission_id,
            worker = %submission.worker_email,
            credit,
            "submission approved"
        );
        self.notify(Notification::new(
            &submission.worker_email,
            format!(
                "You have earned {} coins from {} for \"{}\"",
                submission.payable_amount, submission.buyer_email, submission.task_title
            ),
            "/dashboard/my-submissions",
        ));
        Ok(submission)
    }

    /// Rejects a pending submission and returns its slot to the task.
    ///
    /// If the task was deleted in the meantime the slot has nowhere to go;
    /// the rejection still stands and the mismatch is logged.
    pub fn reject_submission(&self, submission_id: &str) -> MarketResult<Submission> {
        let lock = self.locks.submission(submission_id);
        let _guard = lock.lock();

        let mut submission = self.submissions.get(submission_id)?;
        self.check_submission_transition(&submission, SubmissionStatus::Rejected)?;

        self.submissions
            .update_status(submission_id, SubmissionStatus::Rejected)?;
        submission.status = SubmissionStatus::Rejected;

        match self.tasks.adjust_required_workers(&submission.task_id, 1) {
            Ok(remaining) => {
                tracing::info!(
                    submission_id,
                    task_id = %submission.task_id,
                    remaining_slots = remaining,
                    "submission rejected, slot returned"
                );
            }
            Err(err) => {
                tracing::error!(
                    submission_id,
                    task_id = %submission.task_id,
                    error = %err,
                    "submission rejected but task slot could not be returned"
                );
            }
        }

        self.locks.evict_submission(submission_id);
        self.notify(Notification::new(
            &submission.worker_email,
            format!(
                "Your submission for \"{}\" was rejected by {}",
                submission.task_title, submission.buyer_email
            ),
            "/dashboard/my-submissions",
        ));
        Ok(submission)
    }

    /// Looks up a submission by id.
    pub fn submission(&self, submission_id: &str) -> MarketResult<Submission> {
        Ok(self.submissions.get(submission_id)?)
    }

    /// Submissions made by the given worker.
    #[must_use]
    pub fn submissions_by_worker(&self, worker_email: &str) -> Vec<Submission> {
        self.submissions.list_by_worker(worker_email)
    }

    /// Approved submissions made by the given worker.
    #[must_use]
    pub fn approved_submissions_for_worker(&self, worker_email: &str) -> Vec<Submission> {
        self.submissions
            .list_by_worker_and_status(worker_email, SubmissionStatus::Approved)
    }

    /// Pending submissions against any task the given buyer has posted.
    #[must_use]
    pub fn pending_submissions_for_buyer(&self, buyer_email: &str) -> Vec<Submission> {
        let task_ids: Vec<String> = self
            .tasks
            .list_by_buyer(buyer_email)
            .into_iter()
            .map(|task| task.id)
            .collect();
        self.submissions
            .list_by_status_for_tasks(&task_ids, SubmissionStatus::Pending)
    }

    fn check_submission_transition(
        &self,
        submission: &Submission,
        target: SubmissionStatus,
    ) -> MarketResult<()> {
        if submission.status.can_transition_to(&target) {
            Ok(())
        } else {
            Err(MarketError::InvalidTransition {
                from: submission.status.to_string(),
                to: target.to_string(),
            })
        }
    }
}
