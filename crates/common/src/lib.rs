//! Modular common utilities shared across Envase crates.
//!
//! Nothing in here knows about the Envase API; the crate provides the
//! cryptographic and resilience building blocks the SDK is assembled from.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error types
//! - `runtime`: AES-256-GCM encryption, retry policy, single-flight latch
//! - `observability`: tracing (implied by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod crypto;
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use crypto::{CryptoError, CryptoResult, EncryptionService};
#[cfg(feature = "runtime")]
pub use resilience::{
    policies, RetryConfig, RetryConfigBuilder, RetryDecision, RetryPolicy, SingleFlight,
};
