//! # Envase Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-backed request pipeline (`HttpClient`)
//! - Conversions from library errors into `EnvaseError`
//! - Configuration loading from env, files, and file adapters
//! - Native and in-memory `FileAdapter` implementations
//! - The AES-256-GCM `SecretCipher`
//!
//! ## Architecture
//! - Implements traits defined in `envase-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod config;
pub mod crypto;
pub mod errors;
pub mod http;
pub mod storage;

// Re-export commonly used items
pub use crypto::AesSecretCipher;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use storage::{MemoryFileAdapter, NativeFileAdapter};
