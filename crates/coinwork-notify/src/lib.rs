//! # coinwork-notify
//!
//! Best-effort notification delivery for the Coinwork marketplace.
//!
//! Notifications are append-only, user-facing event records emitted *after*
//! an authoritative state transition commits. Delivery is fire-and-forget:
//! a sink failure must never abort the operation that emitted the event, so
//! the Marketplace Core catches and logs whatever `deliver` returns.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod sink;

pub use error::NotifyError;
pub use sink::{BoxedSink, MemorySink, NoopSink, NotificationSink, TracingSink};
