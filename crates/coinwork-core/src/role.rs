//! Account roles and their starting balances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The role an account holds on the marketplace.
///
/// Buyers post tasks and spend coins; Workers complete tasks and earn coins;
/// Admins hold approval and moderation rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Posts tasks and pays for completed work.
    Buyer,
    /// Completes tasks and earns coins.
    Worker,
    /// Approves withdrawals and moderates accounts.
    Admin,
}

impl Role {
    /// The coin balance an account starts with when it registers.
    ///
    /// Buyers start with 50 coins; every other role starts with 10.
    #[must_use]
    pub const fn starting_balance(self) -> i64 {
        match self {
            Self::Buyer => 50,
            Self::Worker | Self::Admin => 10,
        }
    }

    /// Returns the canonical display name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Worker => "Worker",
            Self::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Parses a role string case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "worker" => Ok(Self::Worker),
            "admin" => Ok(Self::Admin),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
