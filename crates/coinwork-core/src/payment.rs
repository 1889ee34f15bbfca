//! Payment-history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A record of a confirmed real-money purchase of coins.
///
/// The external transaction id comes from the payment authority; the payment
/// log enforces that each id is recorded at most once, which is what makes
/// coin crediting idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Email of the buyer who purchased coins.
    pub email: String,
    /// Coins credited by this purchase.
    pub coins: u64,
    /// Price paid, in cents.
    pub price_cents: u64,
    /// External transaction id from the payment authority. Unique.
    pub transaction_id: String,
    /// When the payment was recorded.
    pub date: DateTime<Utc>,
}

impl PaymentRecord {
    /// Creates a new payment record timestamped now.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        coins: u64,
        price_cents: u64,
        transaction_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            coins,
            price_cents,
            transaction_id: transaction_id.into(),
            date: Utc::now(),
        }
    }
}
