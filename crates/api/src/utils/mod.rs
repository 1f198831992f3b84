//! Utilities for the client crate.

pub mod logging;
