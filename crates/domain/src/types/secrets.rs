//! Secret resources
//!
//! `value` travels as ciphertext whenever client-side encryption is enabled;
//! the secrets service decrypts it before handing a [`Secret`] back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationReport;
use crate::errors::Result;
use crate::impl_wire_enum_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretScope {
    Project,
    Environment,
}

impl_wire_enum_conversions!(SecretScope {
    Project => "project",
    Environment => "environment",
});

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub id: String,
    pub project_id: String,
    pub key: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub scope: SecretScope,
    pub environment_id: Option<String>,
    pub folder_id: Option<String>,
    pub version: u32,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("id", &self.id)
            .field("project_id", &self.project_id)
            .field("key", &self.key)
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("scope", &self.scope)
            .field("environment_id", &self.environment_id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/secrets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretPayload {
    pub key: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub scope: SecretScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// Body of `PUT /api/secrets/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecret {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSecretsParams {
    pub project_id: String,
    pub environment_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub scope: Option<SecretScope>,
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSecretParams {
    pub project_id: String,
    pub environment_id: Option<String>,
    pub key: String,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct SetSecretParams {
    pub project_id: String,
    pub environment_id: Option<String>,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub folder_id: Option<String>,
    pub scope: Option<SecretScope>,
    /// Defaults to `true`; ignored when the client has no encryption key.
    pub encrypt: Option<bool>,
}

impl SetSecretParams {
    /// Explicit scope, else environment when an environment id is present.
    pub fn effective_scope(&self) -> SecretScope {
        self.scope.unwrap_or(if self.environment_id.is_some() {
            SecretScope::Environment
        } else {
            SecretScope::Project
        })
    }

    /// # Errors
    /// Returns `EnvaseError::Validation` if the key or value is blank.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .require("projectId", &self.project_id, "Project id is required")
            .require("key", &self.key, "Secret key is required")
            .check("value", !self.value.is_empty(), "Secret value is required", "REQUIRED")
            .finish()
    }
}

impl std::fmt::Debug for SetSecretParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetSecretParams")
            .field("project_id", &self.project_id)
            .field("environment_id", &self.environment_id)
            .field("key", &self.key)
            .field("value", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("encrypt", &self.encrypt)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct UpdateSecretParams {
    pub value: Option<String>,
    pub description: Option<String>,
    pub folder_id: Option<String>,
    /// Defaults to `true`; ignored when the client has no encryption key.
    pub encrypt: Option<bool>,
}

impl UpdateSecretParams {
    /// # Errors
    /// Returns `EnvaseError::Validation` if a provided value is empty.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .check(
                "value",
                self.value.as_ref().map_or(true, |v| !v.is_empty()),
                "Secret value cannot be empty",
                "REQUIRED",
            )
            .finish()
    }
}

impl std::fmt::Debug for UpdateSecretParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateSecretParams")
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("description", &self.description)
            .field("folder_id", &self.folder_id)
            .field("encrypt", &self.encrypt)
            .finish()
    }
}
