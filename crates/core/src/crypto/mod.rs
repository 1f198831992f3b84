//! Field-level encryption port.

pub mod ports;

pub use ports::SecretCipher;
