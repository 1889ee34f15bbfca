//! Withdrawal lifecycle: requests and admin approval.

use coinwork_core::{Identity, Notification, Withdrawal, WithdrawalStatus};

use crate::error::{MarketError, MarketResult};
use crate::service::MarketService;

impl MarketService {
    /// Files a withdrawal request for a worker.
    ///
    /// No coins move at request time; the debit happens when an admin
    /// approves the request. The worker may file for more coins than they
    /// currently hold, since the balance is only checked against at
    /// approval time by the approving admin.
    pub fn request_withdrawal(
        &self,
        worker_email: &str,
        worker_name: &str,
        coin_amount: u64,
        cash_amount_cents: u64,
        payment_system: &str,
        account_number: &str,
    ) -> MarketResult<Withdrawal> {
        if worker_email.trim().is_empty() {
            return Err(MarketError::InvalidInput("worker_email"));
        }
        if coin_amount == 0 {
            return Err(MarketError::InvalidInput("coin_amount"));
        }
        if cash_amount_cents == 0 {
            return Err(MarketError::InvalidInput("cash_amount_cents"));
        }
        if payment_system.trim().is_empty() {
            return Err(MarketError::InvalidInput("payment_system"));
        }
        if account_number.trim().is_empty() {
            return Err(MarketError::InvalidInput("account_number"));
        }
        self.accounts.find_by_email(worker_email)?;

        let withdrawal = Withdrawal::new(
            worker_email,
            worker_name,
            coin_amount,
            cash_amount_cents,
            payment_system,
            account_number,
        );
        self.withdrawals.insert(withdrawal.clone())?;

        tracing::info!(
            withdrawal_id = %withdrawal.id,
            worker = worker_email,
            coin_amount,
            cash_amount_cents,
            "withdrawal requested"
        );
        Ok(withdrawal)
    }

    /// Approves a pending withdrawal, debiting the worker's balance.
    ///
    /// Admin-gated. The status flip happens before the debit, both under
    /// the withdrawal's entity lock, so a concurrent second approval sees a
    /// terminal status and fails without a double debit.
    pub fn approve_withdrawal(
        &self,
        actor: &Identity,
        withdrawal_id: &str,
    ) -> MarketResult<Withdrawal> {
        self.require_admin(actor)?;

        let lock = self.locks.withdrawal(withdrawal_id);
        let _guard = lock.lock();

        let mut withdrawal = self.withdrawals.get(withdrawal_id)?;
        if !withdrawal
            .status
            .can_transition_to(&WithdrawalStatus::Approved)
        {
            return Err(MarketError::InvalidTransition {
                from: withdrawal.status.to_string(),
                to: WithdrawalStatus::Approved.to_string(),
            });
        }

        self.withdrawals
            .update_status(withdrawal_id, WithdrawalStatus::Approved)?;
        withdrawal.status = WithdrawalStatus::Approved;

        let debit = i64::try_from(withdrawal.coin_amount)
            .map_err(|_| MarketError::InvalidInput("coin_amount"))?;
        if let Err(err) = self.apply_balance_delta(&withdrawal.worker_email, -debit) {
            tracing::error!(
                withdrawal_id,
                worker = %withdrawal.worker_email,
                debit,
                error = %err,
                "withdrawal approved but worker debit failed; reconciliation needed"
            );
            return Err(err);
        }

        self.locks.evict_withdrawal(withdrawal_id);
        tracing::info!(
            withdrawal_id,
            worker = %withdrawal.worker_email,
            debit,
            admin = %actor.email,
            "withdrawal approved"
        );
        self.notify(Notification::new(
            &withdrawal.worker_email,
            format!(
                "Your withdrawal of {} coins has been approved",
                withdrawal.coin_amount
            ),
            "/dashboard/withdrawals",
        ));
        Ok(withdrawal)
    }

    /// Withdrawal requests still awaiting approval. Admin-gated.
    pub fn pending_withdrawals(&self, actor: &Identity) -> MarketResult<Vec<Withdrawal>> {
        self.require_admin(actor)?;
        Ok(self.withdrawals.list_pending())
    }
}

#[cfg(test)]
mod tests {
    use coinwork_core::Role;

    use super::*;

    fn service_with_worker() -> MarketService {
        let service = MarketService::in_memory();
        service
            .register("w@x.com", "Wes", "Worker", None, None)
            .unwrap();
        service
    }

    fn admin() -> Identity {
        Identity::new("a@x.com", Role::Admin)
    }

    #[test]
    fn request_does_not_touch_the_balance() {
        let service = service_with_worker();
        let withdrawal = service
            .request_withdrawal("w@x.com", "Wes", 8, 40, "bkash", "017xxxxxxx")
            .unwrap();
        assert_eq!(withdrawal.status, WithdrawalStatus::Pending);
        assert_eq!(service.account("w@x.com").unwrap().coin, 10);
    }

    #[test]
    fn request_validates_inputs() {
        let service = service_with_worker();
        assert_eq!(
            service
                .request_withdrawal("w@x.com", "Wes", 0, 40, "bkash", "017")
                .unwrap_err(),
            MarketError::InvalidInput("coin_amount")
        );
        assert_eq!(
            service
                .request_withdrawal("w@x.com", "Wes", 8, 0, "bkash", "017")
                .unwrap_err(),
            MarketError::InvalidInput("cash_amount_cents")
        );
        assert_eq!(
            service
                .request_withdrawal("w@x.com", "Wes", 8, 40, " ", "017")
                .unwrap_err(),
            MarketError::InvalidInput("payment_system")
        );
        assert!(matches!(
            service
                .request_withdrawal("ghost@x.com", "G", 8, 40, "bkash", "017")
                .unwrap_err(),
            MarketError::NotFound { .. }
        ));
    }

    #[test]
    fn approval_debits_exactly_once() {
        let service = service_with_worker();
        let withdrawal = service
            .request_withdrawal("w@x.com", "Wes", 8, 40, "bkash", "017")
            .unwrap();

        let approved = service.approve_withdrawal(&admin(), &withdrawal.id).unwrap();
        assert_eq!(approved.status, WithdrawalStatus::Approved);
        assert_eq!(service.account("w@x.com").unwrap().coin, 2);

        let err = service
            .approve_withdrawal(&admin(), &withdrawal.id)
            .unwrap_err();
        assert_eq!(
            err,
            MarketError::InvalidTransition {
                from: "approved".to_string(),
                to: "approved".to_string(),
            }
        );
        assert_eq!(service.account("w@x.com").unwrap().coin, 2);
    }

    #[test]
    fn approved_withdrawals_release_their_lock_entries() {
        let service = service_with_worker();
        let withdrawal = service
            .request_withdrawal("w@x.com", "Wes", 8, 40, "bkash", "017")
            .unwrap();

        service.approve_withdrawal(&admin(), &withdrawal.id).unwrap();
        assert_eq!(service.locks.len(), 0);
    }

    #[test]
    fn approval_is_admin_gated() {
        let service = service_with_worker();
        let withdrawal = service
            .request_withdrawal("w@x.com", "Wes", 8, 40, "bkash", "017")
            .unwrap();

        let worker = Identity::new("w@x.com", Role::Worker);
        assert_eq!(
            service
                .approve_withdrawal(&worker, &withdrawal.id)
                .unwrap_err(),
            MarketError::Forbidden
        );
        assert_eq!(service.account("w@x.com").unwrap().coin, 10);
    }

    #[test]
    fn pending_listing_shrinks_after_approval() {
        let service = service_with_worker();
        let first = service
            .request_withdrawal("w@x.com", "Wes", 3, 15, "bkash", "017")
            .unwrap();
        service
            .request_withdrawal("w@x.com", "Wes", 4, 20, "paypal", "wes@pp")
            .unwrap();

        assert_eq!(service.pending_withdrawals(&admin()).unwrap().len(), 2);
        service.approve_withdrawal(&admin(), &first.id).unwrap();

        let pending = service.pending_withdrawals(&admin()).unwrap();
        assert_eq!(pending.len(), 1);
        assert_ne!(pending[0].id, first.id);
    }

    #[test]
    fn pending_listing_is_admin_gated() {
        let service = service_with_worker();
        let worker = Identity::new("w@x.com", Role::Worker);
        assert_eq!(
            service.pending_withdrawals(&worker).unwrap_err(),
            MarketError::Forbidden
        );
    }
}
