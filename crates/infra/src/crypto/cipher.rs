use envase_common::EncryptionService;
use envase_core::SecretCipher;
use envase_domain::Result;

use crate::errors::InfraError;

/// Adapts [`EncryptionService`] to the core cipher port, mapping
/// `CryptoError` into `EnvaseError::Encryption`.
#[derive(Debug)]
pub struct AesSecretCipher {
    service: EncryptionService,
}

impl AesSecretCipher {
    /// # Errors
    /// Returns `EnvaseError::Encryption` with code `INVALID_KEY` for a key
    /// that is not 64 hex characters.
    pub fn new(hex_key: &str) -> Result<Self> {
        let service = EncryptionService::new(hex_key).map_err(InfraError::from)?;
        Ok(Self { service })
    }

    pub fn from_service(service: EncryptionService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &EncryptionService {
        &self.service
    }

    pub fn key_fingerprint(&self) -> String {
        self.service.key_fingerprint()
    }
}

impl SecretCipher for AesSecretCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(self.service.encrypt(plaintext).map_err(InfraError::from)?)
    }

    fn decrypt(&self, envelope: &str) -> Result<String> {
        Ok(self.service.decrypt(envelope).map_err(InfraError::from)?)
    }
}
