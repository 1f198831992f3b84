//! Secrets service
//!
//! When a [`SecretCipher`] is configured, values are encrypted before they
//! leave the process (unless the caller opts out with `encrypt: false`) and
//! every value read back is decrypted. Without a cipher values pass through
//! unchanged in both directions.

use std::sync::Arc;

use envase_domain::{
    EnvaseError, GetSecretParams, ListSecretsParams, Result, Secret, SecretPayload,
    SetSecretParams, UpdateSecret, UpdateSecretParams,
};
use tracing::{debug, instrument};

use crate::crypto::SecretCipher;
use crate::transport::request::encode_segment;
use crate::transport::{fetch, ApiRequest, ApiTransport};

const SECRETS_PATH: &str = "/api/secrets";

pub struct SecretsService {
    transport: Arc<dyn ApiTransport>,
    cipher: Option<Arc<dyn SecretCipher>>,
}

impl SecretsService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport, cipher: None }
    }

    pub fn with_cipher(mut self, cipher: Arc<dyn SecretCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    pub fn encrypts(&self) -> bool {
        self.cipher.is_some()
    }

    #[instrument(skip(self), fields(project_id = %params.project_id))]
    pub async fn list(&self, params: &ListSecretsParams) -> Result<Vec<Secret>> {
        let request = ApiRequest::get(SECRETS_PATH)
            .query("projectId", &params.project_id)
            .query_opt("environmentId", params.environment_id.as_deref())
            .query_opt("page", params.page)
            .query_opt("limit", params.limit)
            .query_opt("search", params.search.as_deref())
            .query_opt("scope", params.scope)
            .query_opt("folderId", params.folder_id.as_deref());

        let secrets = fetch::<Vec<Secret>>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .unwrap_or_default();
        secrets.into_iter().map(|secret| self.decrypt_secret(secret)).collect()
    }

    #[instrument(skip(self), fields(key = %params.key))]
    pub async fn get(&self, params: &GetSecretParams) -> Result<Secret> {
        let request = ApiRequest::get(secret_path(&params.key))
            .query("projectId", &params.project_id)
            .query_opt("environmentId", params.environment_id.as_deref());

        let secret = fetch::<Secret>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| {
                EnvaseError::generic(format!("Secret {} not found", params.key), "SECRET_NOT_FOUND")
            })?;
        self.decrypt_secret(secret)
    }

    /// Create a secret.
    ///
    /// Scope defaults to `environment` when an environment id is given and
    /// `project` otherwise.
    #[instrument(skip(self, params), fields(key = %params.key))]
    pub async fn set(&self, params: &SetSecretParams) -> Result<Secret> {
        params.validate()?;

        let value = self.encrypt_value(&params.value, params.encrypt)?;
        let payload = SecretPayload {
            key: params.key.clone(),
            value,
            description: params.description.clone(),
            scope: params.effective_scope(),
            environment_id: params.environment_id.clone(),
            folder_id: params.folder_id.clone(),
        };
        let request =
            ApiRequest::post(SECRETS_PATH).query("projectId", &params.project_id).json(&payload)?;

        let secret = fetch::<Secret>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| EnvaseError::generic("Failed to create secret", "SECRET_CREATE_FAILED"))?;
        self.decrypt_secret(secret)
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, id: &str, data: &UpdateSecretParams) -> Result<Secret> {
        data.validate()?;

        let value = match data.value.as_deref() {
            Some(value) => Some(self.encrypt_value(value, data.encrypt)?),
            None => None,
        };
        let payload = UpdateSecret {
            value,
            description: data.description.clone(),
            folder_id: data.folder_id.clone(),
        };
        let request = ApiRequest::put(secret_path(id)).json(&payload)?;

        let secret = fetch::<Secret>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| EnvaseError::generic("Failed to update secret", "SECRET_UPDATE_FAILED"))?;
        self.decrypt_secret(secret)
    }

    #[instrument(skip(self), fields(key = %params.key))]
    pub async fn delete(&self, params: &GetSecretParams) -> Result<()> {
        let request = ApiRequest::delete(secret_path(&params.key))
            .query("projectId", &params.project_id)
            .query_opt("environmentId", params.environment_id.as_deref());
        self.transport.send(request).await?;
        Ok(())
    }

    fn encrypt_value(&self, value: &str, encrypt: Option<bool>) -> Result<String> {
        match &self.cipher {
            Some(cipher) if encrypt.unwrap_or(true) => cipher.encrypt(value),
            _ => Ok(value.to_string()),
        }
    }

    fn decrypt_secret(&self, mut secret: Secret) -> Result<Secret> {
        let (Some(cipher), Some(value)) = (&self.cipher, secret.value.as_deref()) else {
            return Ok(secret);
        };
        if value.is_empty() {
            return Ok(secret);
        }

        debug!(key = %secret.key, version = secret.version, "decrypting secret value");
        secret.value = Some(cipher.decrypt(value)?);
        Ok(secret)
    }
}

fn secret_path(key: &str) -> String {
    format!("{SECRETS_PATH}/{}", encode_segment(key))
}
