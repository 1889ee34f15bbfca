//! # coinwork-market
//!
//! The Coinwork marketplace core: every state-transition operation over the
//! account ledger, task registry, submission log, withdrawal log, and
//! payment history.
//!
//! The core is a stateless transition function over injected store handles.
//! Multi-write sequences (refund-then-delete, approve-then-credit, and
//! friends) are serialized through a per-entity lock registry so concurrent
//! conflicting requests on the same entity cannot interleave, and all
//! balance and slot arithmetic happens through atomic store delta
//! operations.
//!
//! Notifications are emitted after the authoritative writes commit and are
//! strictly best-effort; a sink failure is logged and swallowed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
mod locks;
mod payments;
pub mod service;
pub mod stats;
mod submissions;
mod tasks;
mod withdrawals;

pub use error::{MarketError, MarketResult};
pub use service::MarketService;
pub use stats::{AdminStats, BuyerStats, WorkerStats};
