//! Port interface for secret value encryption

use envase_domain::Result;

/// Symmetric cipher applied to secret values before they leave the process
/// and after they arrive.
///
/// Failures are reported as `EnvaseError::Encryption`.
pub trait SecretCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    fn decrypt(&self, envelope: &str) -> Result<String>;
}
