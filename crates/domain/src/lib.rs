//! # Envase Domain
//!
//! Domain types shared by every Envase crate.
//!
//! This crate contains:
//! - The closed error taxonomy (`EnvaseError`) and `Result` alias
//! - Wire envelopes returned by the Envase API
//! - Project, environment, secret and team-member models
//! - Client configuration structures and defaults
//!
//! ## Architecture
//! - No dependencies on other Envase crates
//! - No I/O; pure data structures and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::EnvaseConfig;
pub use errors::*;
pub use types::*;
