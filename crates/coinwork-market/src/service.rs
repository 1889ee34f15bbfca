//! The marketplace service: store wiring, registration, and account
//! administration.

use std::sync::Arc;

use coinwork_core::{Account, Identity, Notification, Role};
use coinwork_notify::{NoopSink, NotificationSink};
use coinwork_store::{
    AccountStore, MemoryAccountStore, MemoryPaymentLog, MemorySubmissionStore, MemoryTaskStore,
    MemoryWithdrawalStore, PaymentLog, SubmissionStore, TaskStore, WithdrawalStore,
};

use crate::error::{MarketError, MarketResult};
use crate::locks::EntityLocks;

/// The Coinwork marketplace core.
///
/// Holds narrow store handles and performs every state transition of the
/// marketplace. The service itself is stateless apart from its lock
/// registry; all authoritative state lives in the stores.
pub struct MarketService {
    pub(crate) accounts: Arc<dyn AccountStore>,
    pub(crate) tasks: Arc<dyn TaskStore>,
    pub(crate) submissions: Arc<dyn SubmissionStore>,
    pub(crate) withdrawals: Arc<dyn WithdrawalStore>,
    pub(crate) payments: Arc<dyn PaymentLog>,
    pub(crate) notifier: Arc<dyn NotificationSink>,
    pub(crate) locks: EntityLocks,
}

impl MarketService {
    /// Creates a service over the given stores and notification sink.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tasks: Arc<dyn TaskStore>,
        submissions: Arc<dyn SubmissionStore>,
        withdrawals: Arc<dyn WithdrawalStore>,
        payments: Arc<dyn PaymentLog>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            accounts,
            tasks,
            submissions,
            withdrawals,
            payments,
            notifier,
            locks: EntityLocks::new(),
        }
    }

    /// Creates a service backed by fresh in-memory stores and a silent
    /// notification sink. Convenient for tests and local development.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryTaskStore::new()),
            Arc::new(MemorySubmissionStore::new()),
            Arc::new(MemoryWithdrawalStore::new()),
            Arc::new(MemoryPaymentLog::new()),
            Arc::new(NoopSink::new()),
        )
    }

    /// Registers a new account.
    ///
    /// The starting balance is a pure function of the role: Buyers start
    /// with 50 coins, everyone else with 10. Registering an email that
    /// already exists fails with `Conflict`.
    pub fn register(
        &self,
        email: &str,
        name: &str,
        role: &str,
        photo_url: Option<&str>,
        external_id: Option<&str>,
    ) -> MarketResult<Account> {
        if email.trim().is_empty() {
            return Err(MarketError::InvalidInput("email"));
        }
        if role.trim().is_empty() {
            return Err(MarketError::InvalidInput("role"));
        }
        let role: Role = role.parse().map_err(|_| MarketError::InvalidInput("role"))?;

        let mut account = Account::register(email, name, role);
        if let Some(url) = photo_url {
            account = account.with_photo_url(url);
        }
        if let Some(id) = external_id {
            account = account.with_external_id(id);
        }

        self.accounts.insert(account.clone())?;
        tracing::info!(email, %role, balance = account.coin, "account registered");
        Ok(account)
    }

    /// Looks up an account by email.
    pub fn account(&self, email: &str) -> MarketResult<Account> {
        Ok(self.accounts.find_by_email(email)?)
    }

    /// All registered accounts.
    #[must_use]
    pub fn accounts_list(&self) -> Vec<Account> {
        self.accounts.list()
    }

    /// Changes an account's role. Admin-gated.
    pub fn update_role(&self, actor: &Identity, email: &str, role: Role) -> MarketResult<()> {
        self.require_admin(actor)?;
        self.accounts.update_role(email, role)?;
        tracing::info!(email, %role, admin = %actor.email, "account role updated");
        Ok(())
    }

    /// Removes an account. Admin-gated.
    pub fn delete_account(&self, actor: &Identity, email: &str) -> MarketResult<()> {
        self.require_admin(actor)?;
        self.accounts.delete(email)?;
        tracing::info!(email, admin = %actor.email, "account deleted");
        Ok(())
    }

    /// Applies a signed coin delta to an account.
    ///
    /// This is the only code path in the marketplace that mutates a balance,
    /// which keeps the ledger auditable. Unknown emails fail with `NotFound`
    /// rather than silently no-opping.
    pub(crate) fn apply_balance_delta(&self, email: &str, delta: i64) -> MarketResult<i64> {
        let balance = self.accounts.apply_delta(email, delta)?;
        tracing::debug!(email, delta, balance, "balance adjusted");
        Ok(balance)
    }

    /// Delivers a notification without letting a sink failure surface.
    ///
    /// Called strictly after the authoritative writes of an operation.
    pub(crate) fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.deliver(&notification) {
            tracing::warn!(
                recipient = %notification.recipient_email,
                error = %err,
                "notification delivery failed; continuing"
            );
        }
    }

    pub(crate) fn require_admin(&self, actor: &Identity) -> MarketResult<()> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(MarketError::Forbidden)
        }
    }
}

impl std::fmt::Debug for MarketService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Buyer", 50; "buyer starts with fifty")]
    #[test_case("buyer", 50; "lowercase buyer parses")]
    #[test_case("Worker", 10; "worker starts with ten")]
    #[test_case("Admin", 10; "admin starts with ten")]
    fn registration_balance_follows_role(role: &str, expected: i64) {
        let service = MarketService::in_memory();
        let account = service
            .register("u@x.com", "U", role, None, None)
            .unwrap();
        assert_eq!(account.coin, expected);
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let service = MarketService::in_memory();
        service.register("u@x.com", "U", "Worker", None, None).unwrap();
        let err = service
            .register("u@x.com", "U2", "Buyer", None, None)
            .unwrap_err();
        assert!(matches!(err, MarketError::Conflict(_)));
    }

    #[test]
    fn missing_fields_are_invalid_input() {
        let service = MarketService::in_memory();
        assert_eq!(
            service.register("", "U", "Worker", None, None).unwrap_err(),
            MarketError::InvalidInput("email")
        );
        assert_eq!(
            service.register("u@x.com", "U", "  ", None, None).unwrap_err(),
            MarketError::InvalidInput("role")
        );
        assert_eq!(
            service
                .register("u@x.com", "U", "superuser", None, None)
                .unwrap_err(),
            MarketError::InvalidInput("role")
        );
    }

    #[test]
    fn optional_profile_fields_are_stored() {
        let service = MarketService::in_memory();
        let account = service
            .register("u@x.com", "U", "Worker", Some("https://img/u.png"), Some("uid-9"))
            .unwrap();
        assert_eq!(account.photo_url.as_deref(), Some("https://img/u.png"));
        assert_eq!(account.external_id.as_deref(), Some("uid-9"));
    }

    #[test]
    fn account_lookup() {
        let service = MarketService::in_memory();
        service.register("u@x.com", "U", "Worker", None, None).unwrap();
        assert_eq!(service.account("u@x.com").unwrap().email, "u@x.com");
        assert!(matches!(
            service.account("ghost@x.com").unwrap_err(),
            MarketError::NotFound { .. }
        ));
    }

    #[test]
    fn role_update_is_admin_gated() {
        let service = MarketService::in_memory();
        service.register("u@x.com", "U", "Worker", None, None).unwrap();

        let worker = Identity::new("u@x.com", Role::Worker);
        assert_eq!(
            service.update_role(&worker, "u@x.com", Role::Buyer).unwrap_err(),
            MarketError::Forbidden
        );

        let admin = Identity::new("a@x.com", Role::Admin);
        service.update_role(&admin, "u@x.com", Role::Buyer).unwrap();
        assert_eq!(service.account("u@x.com").unwrap().role, Role::Buyer);
    }

    #[test]
    fn account_deletion_is_admin_gated() {
        let service = MarketService::in_memory();
        service.register("u@x.com", "U", "Worker", None, None).unwrap();

        let admin = Identity::new("a@x.com", Role::Admin);
        service.delete_account(&admin, "u@x.com").unwrap();
        assert!(service.account("u@x.com").is_err());

        assert!(matches!(
            service.delete_account(&admin, "u@x.com").unwrap_err(),
            MarketError::NotFound { .. }
        ));
    }

    #[test]
    fn balance_delta_on_unknown_account_fails() {
        let service = MarketService::in_memory();
        assert!(matches!(
            service.apply_balance_delta("ghost@x.com", 5).unwrap_err(),
            MarketError::NotFound { .. }
        ));
    }

    #[test]
    fn balances_may_go_negative() {
        let service = MarketService::in_memory();
        service.register("w@x.com", "W", "Worker", None, None).unwrap();
        let balance = service.apply_balance_delta("w@x.com", -25).unwrap();
        assert_eq!(balance, -15);
    }
}
