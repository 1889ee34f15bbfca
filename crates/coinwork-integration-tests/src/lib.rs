//! Integration test crate for the Coinwork marketplace.
//!
//! This crate exists solely to run integration tests that span multiple
//! Coinwork crates. It has no public API - all functionality is in the test
//! modules.

#![forbid(unsafe_code)]
