//! Builder for [`EnvaseClient`].

use std::sync::Arc;

use envase_core::{
    ApiTransport, AuthManager, EnvironmentsService, ProjectsService, SecretCipher, SecretsService,
    Session, SessionState, TeamsService, TokenRefreshCallback, UnauthorizedHandler,
};
use envase_domain::{EnvaseConfig, Result};
use envase_infra::{AesSecretCipher, HttpClient};
use parking_lot::RwLock;
use tracing::info;

use super::EnvaseClient;

pub struct EnvaseClientBuilder {
    config: EnvaseConfig,
    on_token_refresh: Option<TokenRefreshCallback>,
    unauthorized_handler: Option<Arc<dyn UnauthorizedHandler>>,
    user_agent: Option<String>,
}

impl EnvaseClientBuilder {
    pub fn new(config: EnvaseConfig) -> Self {
        Self { config, on_token_refresh: None, unauthorized_handler: None, user_agent: None }
    }

    /// Called after every successful token refresh with the new access token
    /// and, if rotated, the new refresh token.
    pub fn on_token_refresh<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, Option<&str>) + Send + Sync + 'static,
    {
        self.on_token_refresh = Some(Arc::new(callback));
        self
    }

    /// Custom 401 hook. Takes precedence over `autoRefresh`.
    pub fn unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized_handler = Some(handler);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// - `Configuration` if the config fails validation (missing URL,
    ///   encryption enabled without a key).
    /// - `Encryption` if the encryption key is malformed.
    pub fn build(self) -> Result<EnvaseClient> {
        let Self { config, on_token_refresh, unauthorized_handler, user_agent } = self;
        config.validate()?;

        let cipher = match config.encryption_key.as_deref() {
            Some(key) => Some(Arc::new(AesSecretCipher::new(key)?)),
            None => None,
        };

        let session = Session::new(SessionState {
            token: config.token.clone(),
            refresh_token: config.refresh_token.clone(),
            organization: config.organization.clone(),
            auto_refresh: config.auto_refresh,
        });

        let mut http = HttpClient::from_config(&config).session(session.clone());
        if let Some(agent) = user_agent {
            http = http.user_agent(agent);
        }
        let http = Arc::new(http.build()?);
        let transport: Arc<dyn ApiTransport> = http.clone();

        let shared_config = Arc::new(RwLock::new(config));
        let auth = Arc::new(
            AuthManager::new(Arc::clone(&transport), session)
                .with_on_token_refresh(track_refreshes(Arc::clone(&shared_config), on_token_refresh)),
        );

        let auto_refresh = shared_config.read().auto_refresh;
        match unauthorized_handler {
            Some(handler) => http.set_unauthorized_handler(Some(handler)),
            None if auto_refresh => http.set_unauthorized_handler(Some(auth.unauthorized_handler())),
            None => {}
        }

        let mut secrets = SecretsService::new(Arc::clone(&transport));
        if let Some(cipher) = &cipher {
            let cipher: Arc<dyn SecretCipher> = cipher.clone();
            secrets = secrets.with_cipher(cipher);
        }

        info!(
            api_url = %http.base_url(),
            auto_refresh,
            unauthorized_handler = http.has_unauthorized_handler(),
            encryption = cipher.is_some(),
            "envase client initialised"
        );

        Ok(EnvaseClient {
            config: shared_config,
            projects: ProjectsService::new(Arc::clone(&transport)),
            environments: EnvironmentsService::new(Arc::clone(&transport)),
            teams: TeamsService::new(transport),
            secrets,
            http,
            auth,
            cipher,
        })
    }
}

/// Keep the config snapshot in step with refreshed tokens, then forward to
/// the caller's callback.
fn track_refreshes(
    config: Arc<RwLock<EnvaseConfig>>,
    user_callback: Option<TokenRefreshCallback>,
) -> TokenRefreshCallback {
    Arc::new(move |token: &str, refresh_token: Option<&str>| {
        {
            let mut config = config.write();
            config.token = Some(token.to_string());
            if let Some(refresh_token) = refresh_token {
                config.refresh_token = Some(refresh_token.to_string());
            }
        }
        if let Some(callback) = &user_callback {
            callback(token, refresh_token);
        }
    })
}
