//! `SecretCipher` backed by the AES-256-GCM encryption service.

pub mod cipher;

pub use cipher::AesSecretCipher;
