//! # coinwork-store
//!
//! Store contracts for the Coinwork marketplace and their in-memory
//! implementations.
//!
//! Each of the four document stores (accounts, tasks, submissions,
//! withdrawals) plus the two append-only logs (payments, handled here;
//! notifications, owned by the sink collaborator) exposes a narrow
//! repository trait rather than its raw collection. Balance and slot
//! mutations go through atomic delta operations so no read-modify-write
//! ever happens in request-handling code.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{
    MemoryAccountStore, MemoryPaymentLog, MemorySubmissionStore, MemoryTaskStore,
    MemoryWithdrawalStore,
};
pub use traits::{AccountStore, PaymentLog, SubmissionStore, TaskStore, WithdrawalStore};
