//! Cryptographic primitives for field-level secret encryption.

pub mod encryption;

pub use encryption::{CryptoError, CryptoResult, EncryptionService};
