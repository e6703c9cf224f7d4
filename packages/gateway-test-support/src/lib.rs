//! Gateway test support utilities
//!
//! Shared helpers for the gateway's unit and integration tests: unified
//! logging initialization, error-envelope assertions, and ready-made
//! application fixtures.

pub mod error_body;
pub mod fixtures;
pub mod logging;
