//! # coinwork-core
//!
//! Core domain types for the Coinwork micro-tasking marketplace.
//!
//! This crate provides:
//! - Account records with a role-determined coin balance
//! - Task, submission, and withdrawal records with their status state machines
//! - Notification and payment-history records
//! - The decoded acting identity used for role-gated operations
//!
//! All persisted types derive `serde` so they can live in any document-shaped
//! store. Identifiers are UUID v4 strings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod error;
pub mod notification;
pub mod payment;
pub mod role;
pub mod submission;
pub mod task;
pub mod withdrawal;

pub use account::{Account, Identity};
pub use error::CoreError;
pub use notification::Notification;
pub use payment::PaymentRecord;
pub use role::Role;
pub use submission::{Submission, SubmissionStatus};
pub use task::Task;
pub use withdrawal::{Withdrawal, WithdrawalStatus};
