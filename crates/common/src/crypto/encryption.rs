//! AES-256-GCM encryption for opaque string payloads.
//!
//! Keys are 256-bit values exchanged as 64-character hex strings (an optional
//! `0x` prefix is accepted). Every call to [`EncryptionService::encrypt`]
//! draws a fresh 12-byte nonce from the OS RNG and produces a self-contained
//! envelope:
//!
//! ```text
//! base64( nonce[12] || ciphertext || tag[16] )
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use envase_common::crypto::encryption::EncryptionService;
//!
//! let key = EncryptionService::generate_key();
//! let service = EncryptionService::new(&key)?;
//!
//! let envelope = service.encrypt("postgres://user:pass@db/prod")?;
//! assert_eq!(service.decrypt(&envelope)?, "postgres://user:pass@db/prod");
//! # Ok::<(), envase_common::crypto::CryptoError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Raw key length in bytes.
pub const KEY_BYTES: usize = 32;
/// Nonce (IV) length prepended to every envelope.
pub const NONCE_BYTES: usize = 12;
/// GCM authentication tag length appended by the cipher.
pub const TAG_BYTES: usize = 16;

/// Failures raised by [`EncryptionService`].
///
/// Messages are deliberately generic; they never include key material or
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("{0}")]
    InvalidKey(String),

    #[error("Failed to encrypt data")]
    EncryptionFailed,

    #[error("Failed to decrypt data")]
    DecryptionFailed,

    #[error("Failed to decrypt data: {0}")]
    MalformedEnvelope(&'static str),
}

impl CryptoError {
    /// Stable machine-readable code for the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidKey(_) => "INVALID_KEY",
            Self::EncryptionFailed => "ENCRYPTION_FAILED",
            Self::DecryptionFailed | Self::MalformedEnvelope(_) => "DECRYPTION_FAILED",
        }
    }
}

pub type CryptoResult<T> = Result<T, CryptoError>;

/// AES-256-GCM service bound to a single key.
pub struct EncryptionService {
    key: Zeroizing<[u8; KEY_BYTES]>,
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("key", &"[REDACTED]")
            .field("fingerprint", &self.key_fingerprint())
            .finish()
    }
}

impl EncryptionService {
    /// Create a service from a 64-character hex key.
    ///
    /// # Errors
    /// Returns [`CryptoError::InvalidKey`] if the key (after stripping an
    /// optional `0x` prefix) is not exactly 64 hex characters.
    pub fn new(hex_key: &str) -> CryptoResult<Self> {
        let normalized = hex_key.strip_prefix("0x").unwrap_or(hex_key);

        if normalized.len() != KEY_BYTES * 2 {
            return Err(CryptoError::InvalidKey(format!(
                "Encryption key must be {} hex characters",
                KEY_BYTES * 2
            )));
        }

        let mut key = Zeroizing::new([0u8; KEY_BYTES]);
        hex::decode_to_slice(normalized, &mut key[..]).map_err(|_| {
            CryptoError::InvalidKey("Encryption key must be a valid hex string".to_string())
        })?;

        Self::from_key_bytes(key)
    }

    fn from_key_bytes(key: Zeroizing<[u8; KEY_BYTES]>) -> CryptoResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(&key[..]).map_err(|_| {
            CryptoError::InvalidKey(format!("Encryption key must be {KEY_BYTES} bytes"))
        })?;
        Ok(Self { key, cipher })
    }

    /// Generate a random 256-bit key as 64 lowercase hex characters.
    pub fn generate_key() -> String {
        let mut key = Zeroizing::new([0u8; KEY_BYTES]);
        OsRng.fill_bytes(&mut key[..]);
        hex::encode(&key[..])
    }

    /// Encrypt a UTF-8 string into a base64 envelope.
    ///
    /// # Errors
    /// Returns [`CryptoError::EncryptionFailed`] if the cipher rejects the
    /// input.
    pub fn encrypt(&self, plaintext: &str) -> CryptoResult<String> {
        let nonce_bytes = Self::generate_nonce();
        let ciphertext = self
            .cipher
            .encrypt(&Nonce::from(nonce_bytes), plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut envelope = Vec::with_capacity(NONCE_BYTES + ciphertext.len());
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(envelope))
    }

    /// Decrypt a base64 envelope produced by [`Self::encrypt`].
    ///
    /// # Errors
    /// Fails if the envelope is not base64, is too short to hold a nonce and
    /// tag, does not authenticate under this key, or decrypts to bytes that
    /// are not UTF-8.
    pub fn decrypt(&self, envelope: &str) -> CryptoResult<String> {
        let raw = BASE64
            .decode(envelope.trim())
            .map_err(|_| CryptoError::MalformedEnvelope("invalid base64"))?;
        if raw.len() < NONCE_BYTES + TAG_BYTES {
            return Err(CryptoError::MalformedEnvelope("envelope too short"));
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_BYTES);
        let nonce: [u8; NONCE_BYTES] =
            nonce.try_into().map_err(|_| CryptoError::MalformedEnvelope("invalid nonce"))?;

        let plaintext = self
            .cipher
            .decrypt(&Nonce::from(nonce), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CryptoError::MalformedEnvelope("invalid utf-8"))
    }

    /// Short fingerprint for the current key, safe to log.
    pub fn key_fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(&self.key[..]);
        hex::encode(&digest[..8])
    }

    fn generate_nonce() -> [u8; NONCE_BYTES] {
        let mut nonce = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut nonce);
        nonce
    }
}
