//! Recording confirmed coin purchases and crediting the buyer.

use coinwork_core::PaymentRecord;

use crate::error::{MarketError, MarketResult};
use crate::service::MarketService;

impl MarketService {
    /// Records a confirmed coin purchase and credits the buyer.
    ///
    /// The record is appended to the payment log before the credit is
    /// applied. The log enforces transaction-id uniqueness, so replaying a
    /// confirmation fails with `Conflict` before any coins move; crediting
    /// is at-most-once per external transaction.
    pub fn record_payment(
        &self,
        email: &str,
        coins: u64,
        price_cents: u64,
        transaction_id: &str,
    ) -> MarketResult<PaymentRecord> {
        if email.trim().is_empty() {
            return Err(MarketError::InvalidInput("email"));
        }
        if coins == 0 {
            return Err(MarketError::InvalidInput("coins"));
        }
        if transaction_id.trim().is_empty() {
            return Err(MarketError::InvalidInput("transaction_id"));
        }
        self.accounts.find_by_email(email)?;

        let record = PaymentRecord::new(email, coins, price_cents, transaction_id);
        self.payments.append(record.clone())?;

        let credit =
            i64::try_from(coins).map_err(|_| MarketError::InvalidInput("coins"))?;
        if let Err(err) = self.apply_balance_delta(email, credit) {
            tracing::error!(
                email,
                transaction_id,
                credit,
                error = %err,
                "payment recorded but credit failed; reconciliation needed"
            );
            return Err(err);
        }

        tracing::info!(email, transaction_id, coins, price_cents, "payment recorded");
        Ok(record)
    }

    /// Payment history for the given email, newest first.
    #[must_use]
    pub fn payment_history(&self, email: &str) -> Vec<PaymentRecord> {
        self.payments.list_by_email(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_buyer() -> MarketService {
        let service = MarketService::in_memory();
        service
            .register("b@x.com", "Bea", "Buyer", None, None)
            .unwrap();
        service
    }

    #[test]
    fn payment_credits_the_buyer() {
        let service = service_with_buyer();
        let record = service
            .record_payment("b@x.com", 100, 1000, "txn_1")
            .unwrap();
        assert_eq!(record.coins, 100);
        assert_eq!(service.account("b@x.com").unwrap().coin, 150);
    }

    #[test]
    fn replayed_transaction_credits_nothing() {
        let service = service_with_buyer();
        service
            .record_payment("b@x.com", 100, 1000, "txn_1")
            .unwrap();

        let err = service
            .record_payment("b@x.com", 100, 1000, "txn_1")
            .unwrap_err();
        assert!(matches!(err, MarketError::Conflict(_)));
        assert_eq!(service.account("b@x.com").unwrap().coin, 150);
        assert_eq!(service.payment_history("b@x.com").len(), 1);
    }

    #[test]
    fn payment_validates_inputs() {
        let service = service_with_buyer();
        assert_eq!(
            service.record_payment("b@x.com", 0, 10, "txn_1").unwrap_err(),
            MarketError::InvalidInput("coins")
        );
        assert_eq!(
            service.record_payment("b@x.com", 10, 10, "  ").unwrap_err(),
            MarketError::InvalidInput("transaction_id")
        );
        assert!(matches!(
            service
                .record_payment("ghost@x.com", 10, 10, "txn_2")
                .unwrap_err(),
            MarketError::NotFound { .. }
        ));
    }

    #[test]
    fn unknown_account_leaves_the_log_empty() {
        let service = service_with_buyer();
        let _ = service.record_payment("ghost@x.com", 10, 10, "txn_9");
        assert!(service.payment_history("ghost@x.com").is_empty());
    }

    #[test]
    fn history_is_newest_first() {
        let service = service_with_buyer();
        service.record_payment("b@x.com", 10, 100, "txn_a").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        service.record_payment("b@x.com", 20, 200, "txn_b").unwrap();

        let history = service.payment_history("b@x.com");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].transaction_id, "txn_b");
        assert_eq!(history[1].transaction_id, "txn_a");
    }
}
