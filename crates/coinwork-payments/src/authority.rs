//! Payment-authority contract and the simulated backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PaymentError, Result};

/// A payment intent created by the authority.
///
/// The client secret is opaque to the marketplace; it is handed to the
/// frontend, which completes the charge directly with the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Intent id, assigned by the authority.
    pub id: String,
    /// Opaque secret the frontend uses to complete the charge.
    pub client_secret: String,
    /// Charge amount in cents.
    pub amount_cents: u64,
    /// ISO currency code, lowercase (e.g. "usd").
    pub currency: String,
    /// When the intent was created.
    pub created_at: DateTime<Utc>,
}

/// A confirmed charge, as reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedCharge {
    /// The intent this charge settles.
    pub intent_id: String,
    /// External transaction id. This is the value the payment log keys its
    /// uniqueness constraint on.
    pub transaction_id: String,
    /// Charged amount in cents.
    pub amount_cents: u64,
    /// ISO currency code.
    pub currency: String,
}

/// The Payment Authority collaborator contract.
pub trait PaymentAuthority: Send + Sync {
    /// Creates a payment intent for the given amount.
    fn create_intent(&self, amount_cents: u64, currency: &str) -> Result<PaymentIntent>;

    /// Reports the confirmed charge for an intent.
    ///
    /// Confirming an already-confirmed intent returns the same charge (the
    /// same transaction id), mirroring how real providers behave; dedup of
    /// coin crediting is the payment log's job, not the authority's.
    fn confirm(&self, intent_id: &str) -> Result<ConfirmedCharge>;
}

#[derive(Debug, Default)]
struct SimulatedState {
    intents: HashMap<String, PaymentIntent>,
    charges: HashMap<String, ConfirmedCharge>,
}

/// Simulated payment authority for development and tests.
///
/// Charges always succeed on `confirm`; there is no card flow behind it.
#[derive(Debug, Default)]
pub struct SimulatedAuthority {
    state: Mutex<SimulatedState>,
}

impl SimulatedAuthority {
    /// Creates a new simulated authority with no intents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PaymentAuthority for SimulatedAuthority {
    fn create_intent(&self, amount_cents: u64, currency: &str) -> Result<PaymentIntent> {
        if amount_cents == 0 {
            return Err(PaymentError::InvalidAmount(amount_cents));
        }

        let id = format!("pi_{}", Uuid::new_v4().simple());
        let intent = PaymentIntent {
            client_secret: format!("{id}_secret_{}", Uuid::new_v4().simple()),
            id: id.clone(),
            amount_cents,
            currency: currency.to_ascii_lowercase(),
            created_at: Utc::now(),
        };

        tracing::debug!(intent_id = %id, amount_cents, "created payment intent");
        self.state.lock().intents.insert(id, intent.clone());
        Ok(intent)
    }

    fn confirm(&self, intent_id: &str) -> Result<ConfirmedCharge> {
        let mut state = self.state.lock();
        if let Some(existing) = state.charges.get(intent_id) {
            return Ok(existing.clone());
        }

        let intent = state
            .intents
            .get(intent_id)
            .ok_or_else(|| PaymentError::IntentNotFound(intent_id.to_string()))?
            .clone();

        let charge = ConfirmedCharge {
            intent_id: intent.id.clone(),
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            amount_cents: intent.amount_cents,
            currency: intent.currency,
        };
        state.charges.insert(intent.id, charge.clone());
        Ok(charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_has_opaque_secret() {
        let authority = SimulatedAuthority::new();
        let intent = authority.create_intent(999, "USD").unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.contains("_secret_"));
        assert_eq!(intent.amount_cents, 999);
        assert_eq!(intent.currency, "usd");
    }

    #[test]
    fn zero_amount_is_rejected() {
        let authority = SimulatedAuthority::new();
        assert_eq!(
            authority.create_intent(0, "usd").unwrap_err(),
            PaymentError::InvalidAmount(0)
        );
    }

    #[test]
    fn confirm_produces_transaction_id() {
        let authority = SimulatedAuthority::new();
        let intent = authority.create_intent(500, "usd").unwrap();
        let charge = authority.confirm(&intent.id).unwrap();
        assert_eq!(charge.intent_id, intent.id);
        assert!(charge.transaction_id.starts_with("txn_"));
        assert_eq!(charge.amount_cents, 500);
    }

    #[test]
    fn confirming_twice_returns_the_same_charge() {
        let authority = SimulatedAuthority::new();
        let intent = authority.create_intent(500, "usd").unwrap();
        let first = authority.confirm(&intent.id).unwrap();
        let second = authority.confirm(&intent.id).unwrap();
        assert_eq!(first.transaction_id, second.transaction_id);
    }

    #[test]
    fn confirming_unknown_intent_fails() {
        let authority = SimulatedAuthority::new();
        assert!(matches!(
            authority.confirm("pi_ghost"),
            Err(PaymentError::IntentNotFound(_))
        ));
    }

    #[test]
    fn intents_are_distinct() {
        let authority = SimulatedAuthority::new();
        let a = authority.create_intent(100, "usd").unwrap();
        let b = authority.create_intent(100, "usd").unwrap();
        assert_ne!(a.id, b.id);
        assert_ne!(a.client_secret, b.client_secret);
    }
}
