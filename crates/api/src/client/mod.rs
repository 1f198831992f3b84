//! Client façade.

pub mod builder;

use std::sync::Arc;

use envase_common::EncryptionService;
use envase_core::{
    AuthManager, EnvironmentsService, FileAdapter, ProjectsService, SecretsService, TeamsService,
};
use envase_domain::{EnvaseConfig, Result};
use envase_infra::{config, AesSecretCipher, HttpClient};
use parking_lot::RwLock;

pub use builder::EnvaseClientBuilder;

/// Entry point to the Envase API.
///
/// Owns the request pipeline, the auth coordinator, and one service per
/// resource. All of them share one session, so [`Self::set_token`] and
/// refreshes take effect on the next request.
pub struct EnvaseClient {
    config: Arc<RwLock<EnvaseConfig>>,
    http: Arc<HttpClient>,
    auth: Arc<AuthManager>,
    cipher: Option<Arc<AesSecretCipher>>,
    projects: ProjectsService,
    environments: EnvironmentsService,
    secrets: SecretsService,
    teams: TeamsService,
}

impl std::fmt::Debug for EnvaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvaseClient")
            .field("config", &*self.config.read())
            .field("auth_state", &self.auth.state())
            .field("encryption", &self.cipher.as_ref().map(|c| c.key_fingerprint()))
            .finish_non_exhaustive()
    }
}

impl EnvaseClient {
    /// Build a client from `config` with no callbacks.
    ///
    /// # Errors
    /// Returns `Configuration` for an invalid config and `Encryption` for a
    /// malformed encryption key.
    pub fn new(config: EnvaseConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: EnvaseConfig) -> EnvaseClientBuilder {
        EnvaseClientBuilder::new(config)
    }

    /// Build a client from `ENVASE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(config::load_from_env()?)
    }

    /// Build a client from the adapter's config file.
    ///
    /// # Errors
    /// Returns `Configuration` if the file does not exist.
    pub async fn from_adapter(adapter: &dyn FileAdapter) -> Result<Self> {
        let loaded = config::load_with_adapter(adapter).await?.ok_or_else(|| {
            envase_domain::EnvaseError::configuration(format!(
                "No config file at {}",
                adapter.config_path().display()
            ))
        })?;
        Self::new(loaded)
    }

    pub fn projects(&self) -> &ProjectsService {
        &self.projects
    }

    pub fn environments(&self) -> &EnvironmentsService {
        &self.environments
    }

    pub fn secrets(&self) -> &SecretsService {
        &self.secrets
    }

    pub fn teams(&self) -> &TeamsService {
        &self.teams
    }

    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// The encryption service, when an encryption key was configured.
    pub fn encryption(&self) -> Option<&EncryptionService> {
        self.cipher.as_deref().map(AesSecretCipher::service)
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Snapshot of the current configuration, including tokens set or
    /// refreshed since construction.
    pub fn config(&self) -> EnvaseConfig {
        self.config.read().clone()
    }

    /// Replace the access token (or clear it with `None`). A given refresh
    /// token replaces the stored one; `None` keeps it.
    pub fn set_token(&self, token: Option<String>, refresh_token: Option<String>) {
        match token.clone() {
            Some(token) => self.auth.set_token(token, refresh_token.clone()),
            None => {
                self.auth.session().set_token(None);
                if refresh_token.is_some() {
                    self.auth.set_refresh_token(refresh_token.clone());
                }
            }
        }

        let mut config = self.config.write();
        config.token = token;
        if refresh_token.is_some() {
            config.refresh_token = refresh_token;
        }
    }

    pub fn set_organization(&self, organization: Option<String>) {
        self.auth.session().set_organization(organization.clone());
        self.config.write().organization = organization;
    }

    /// Write the non-credential parts of the configuration through `adapter`.
    pub async fn save_config(&self, adapter: &dyn FileAdapter) -> Result<()> {
        let snapshot = self.config();
        config::save_with_adapter(adapter, &snapshot).await
    }
}
