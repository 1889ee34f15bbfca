//! # coinwork-payments
//!
//! The external Payment Authority collaborator contract.
//!
//! The authority owns card processing end to end: the marketplace asks it to
//! create a payment intent (amount, currency), hands the opaque client
//! secret to the frontend, and later trusts the authority's confirmation.
//! The Marketplace Core never initiates a charge itself; it only records the
//! confirmed outcome and credits coins.
//!
//! A simulated backend is provided for development and tests, in place of a
//! real provider integration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authority;
pub mod error;

pub use authority::{ConfirmedCharge, PaymentAuthority, PaymentIntent, SimulatedAuthority};
pub use error::{PaymentError, Result};
