//! # coinwork-auth
//!
//! Access-token issuance and verification for the Coinwork marketplace.
//!
//! The marketplace treats the email decoded from a verified bearer token as
//! ground truth for the acting principal. This crate provides:
//! - [`Claims`]: token claims carrying the account email and role
//! - [`AuthConfig`]: HS256 signing configuration
//! - [`TokenService`]: issue and verify tokens
//! - [`extract_bearer`]: Authorization-header parsing

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod token;

pub use error::{AuthError, Result};
pub use token::{extract_bearer, AuthConfig, Claims, TokenService};
