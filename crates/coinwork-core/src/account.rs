//! Account records and the decoded acting identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A registered marketplace account.
///
/// The email is the account's identity: unique, stable, and case-sensitive
/// as provided at registration. The coin balance is signed; the marketplace
/// does not enforce a floor on debits, so balances can go negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique email identity.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: Role,
    /// Coin balance. Mutated only through ledger delta operations.
    pub coin: i64,
    /// Optional profile photo reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Optional external-identity id (e.g. from a federated login provider).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with the role-determined starting balance.
    #[must_use]
    pub fn register(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            role,
            coin: role.starting_balance(),
            photo_url: None,
            external_id: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the profile photo reference.
    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Sets the external-identity id.
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Returns the identity this account acts as.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// The acting principal decoded from a verified credential.
///
/// Role-gated operations treat the email carried here as ground truth for
/// who is acting; the token verifier is the only producer of values of this
/// type outside of tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Email of the acting principal.
    pub email: String,
    /// Role carried by the credential.
    pub role: Role,
}

impl Identity {
    /// Creates an identity directly. Intended for tests and trusted callers.
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    /// Whether this principal holds admin rights.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}
