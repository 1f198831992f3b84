//! Auth coordinator
//!
//! Owns the refresh procedure. Refreshes are single-flighted: while one is
//! pending, every other caller (explicit `refresh_token()` calls and 401
//! recoveries alike) awaits the same outcome instead of issuing its own
//! `POST /api/auth/refresh`.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use envase_common::SingleFlight;
use envase_domain::constants::{AUTH_REFRESH_PATH, AUTH_VERIFY_PATH};
use envase_domain::{
    ApiResponse, EnvaseError, RefreshTokenData, RefreshTokenRequest, Result, VerifyTokenData,
};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use super::session::Session;
use crate::transport::{fetch, ApiRequest, ApiTransport, UnauthorizedHandler};

/// Called with the new access token (and refresh token, if rotated) after a
/// successful refresh has been committed to the session.
pub type TokenRefreshCallback = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    /// A refresh, or a pipeline 401 recovery through any handler, is pending.
    Refreshing,
}

pub struct AuthManager {
    transport: Arc<dyn ApiTransport>,
    session: Session,
    refresh_flight: SingleFlight<Result<String>>,
    on_token_refresh: RwLock<Option<TokenRefreshCallback>>,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("session", &self.session)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    pub fn new(transport: Arc<dyn ApiTransport>, session: Session) -> Self {
        Self {
            transport,
            session,
            refresh_flight: SingleFlight::new(),
            on_token_refresh: RwLock::new(None),
        }
    }

    pub fn with_on_token_refresh(self, callback: TokenRefreshCallback) -> Self {
        *self.on_token_refresh.write() = Some(callback);
        self
    }

    pub fn set_on_token_refresh(&self, callback: Option<TokenRefreshCallback>) {
        *self.on_token_refresh.write() = callback;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> AuthState {
        if self.refresh_flight.is_in_flight() || self.session.is_recovering() {
            AuthState::Refreshing
        } else if self.session.has_token() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// Replace the access token and, when given, the refresh token.
    ///
    /// A refresh that completes after this call overwrites it; the later
    /// write wins.
    pub fn set_token(&self, token: impl Into<String>, refresh_token: Option<String>) {
        self.session.set_tokens(token.into(), refresh_token);
    }

    pub fn set_refresh_token(&self, refresh_token: Option<String>) {
        self.session.set_refresh_token(refresh_token);
    }

    /// Ask the API whether the current token is still valid.
    ///
    /// Never fails: any transport or decoding error reads as `false`.
    #[instrument(skip(self))]
    pub async fn verify_token(&self) -> bool {
        let request = ApiRequest::get(AUTH_VERIFY_PATH);
        match fetch::<VerifyTokenData>(self.transport.as_ref(), request).await {
            Ok(response) => response.into_data().is_some_and(|data| data.valid),
            Err(err) => {
                debug!(kind = err.kind(), "token verification failed");
                false
            }
        }
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// The refresh call itself is sent without a bearer token and without
    /// 401 recovery. Tokens are committed to the session only after the
    /// response has been fully decoded.
    ///
    /// # Errors
    /// - `Authentication("No refresh token available")` if the session has
    ///   no refresh token.
    /// - `Authentication("Failed to refresh token")` for any other failure;
    ///   the session is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<String> {
        let Some(refresh_token) = self.session.refresh_token() else {
            return Err(EnvaseError::Authentication {
                message: "No refresh token available".to_string(),
                code: Some("NO_REFRESH_TOKEN".to_string()),
            });
        };

        let request = ApiRequest::post(AUTH_REFRESH_PATH)
            .unauthenticated()
            .json(&RefreshTokenRequest { refresh_token: &refresh_token })?;
        let transport = Arc::clone(&self.transport);
        let session = self.session.clone();
        let callback = self.on_token_refresh.read().clone();

        self.refresh_flight
            .run(move || async move {
                let data = fetch::<RefreshTokenData>(transport.as_ref(), request)
                    .await
                    .and_then(extract_tokens)
                    .map_err(|err| {
                        warn!(kind = err.kind(), error = %err, "token refresh failed");
                        EnvaseError::Authentication {
                            message: "Failed to refresh token".to_string(),
                            code: Some("TOKEN_REFRESH_FAILED".to_string()),
                        }
                    })?;

                session.set_tokens(data.token.clone(), data.refresh_token.clone());
                info!(
                    rotated_refresh_token = data.refresh_token.is_some(),
                    "access token refreshed"
                );

                if let Some(callback) = callback {
                    callback(&data.token, data.refresh_token.as_deref());
                }
                Ok(data.token)
            })
            .await
    }

    /// Handler suitable for registering on the request pipeline.
    ///
    /// Holds only a weak reference so the pipeline and the coordinator can
    /// point at each other without leaking.
    pub fn unauthorized_handler(self: &Arc<Self>) -> Arc<dyn UnauthorizedHandler> {
        Arc::new(RefreshOnUnauthorized { auth: Arc::downgrade(self) })
    }
}

fn extract_tokens(response: ApiResponse<RefreshTokenData>) -> Result<RefreshTokenData> {
    match response.into_data() {
        Some(data) if !data.token.is_empty() => Ok(data),
        _ => Err(EnvaseError::generic(
            "Refresh response did not contain a token",
            "INVALID_RESPONSE",
        )),
    }
}

struct RefreshOnUnauthorized {
    auth: Weak<AuthManager>,
}

#[async_trait]
impl UnauthorizedHandler for RefreshOnUnauthorized {
    async fn on_unauthorized(&self) -> Result<Option<String>> {
        let auth = self
            .auth
            .upgrade()
            .ok_or_else(|| EnvaseError::authentication("Client has been dropped"))?;
        auth.refresh_token().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;

    fn session_with_refresh() -> Session {
        let session = Session::default();
        session.set_tokens("old".into(), Some("r1".into()));
        session
    }

    #[tokio::test]
    async fn refresh_commits_tokens_and_notifies() {
        let transport = Arc::new(ScriptedTransport::with(vec![Ok(json!({
            "success": true,
            "data": { "token": "new", "refreshToken": "r2" }
        }))]));
        let notified = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&notified);
        let auth = AuthManager::new(transport.clone(), session_with_refresh()).with_on_token_refresh(
            Arc::new(move |token: &str, refresh: Option<&str>| {
                *sink.lock() = Some((token.to_string(), refresh.map(str::to_string)));
            }),
        );

        assert_eq!(auth.refresh_token().await.unwrap(), "new");
        assert_eq!(auth.token().as_deref(), Some("new"));
        assert_eq!(auth.session().refresh_token().as_deref(), Some("r2"));
        assert_eq!(*notified.lock(), Some(("new".to_string(), Some("r2".to_string()))));

        let requests = transport.requests();
        assert_eq!(requests[0].path, AUTH_REFRESH_PATH);
        assert_eq!(requests[0].body, Some(json!({ "refreshToken": "r1" })));
        assert!(!requests[0].overrides.authenticate);
        assert!(!requests[0].overrides.recover_auth);
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails_fast() {
        let transport = Arc::new(ScriptedTransport::default());
        let auth = AuthManager::new(transport.clone(), Session::default());

        let err = auth.refresh_token().await.unwrap_err();
        assert!(err.is_authentication());
        assert_eq!(err.message(), "No refresh token available");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_session_untouched() {
        let transport = Arc::new(ScriptedTransport::with(vec![
            Err(EnvaseError::network("Internal Server Error", 500)),
            Ok(json!({ "success": true, "data": {} })),
        ]));
        let auth = AuthManager::new(transport, session_with_refresh());

        for _ in 0..2 {
            let err = auth.refresh_token().await.unwrap_err();
            assert!(err.is_authentication());
            assert_eq!(err.message(), "Failed to refresh token");
            assert_eq!(auth.token().as_deref(), Some("old"));
        }
    }

    #[tokio::test]
    async fn concurrent_refreshes_share_one_call() {
        let transport = Arc::new(
            ScriptedTransport::with(vec![Ok(json!({ "success": true, "data": { "token": "shared" } }))])
                .delayed(Duration::from_millis(50)),
        );
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let auth = Arc::new(
            AuthManager::new(transport.clone(), session_with_refresh()).with_on_token_refresh(
                Arc::new(move |_: &str, _: Option<&str>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
            ),
        );

        let (a, b, c) =
            tokio::join!(auth.refresh_token(), auth.refresh_token(), auth.refresh_token());
        assert_eq!(a.unwrap(), "shared");
        assert_eq!(b.unwrap(), "shared");
        assert_eq!(c.unwrap(), "shared");
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(auth.state(), AuthState::Authenticated);
    }

    #[tokio::test]
    async fn verify_token_maps_failures_to_false() {
        let transport = Arc::new(ScriptedTransport::with(vec![
            Ok(json!({ "success": true, "data": { "valid": true } })),
            Ok(json!({ "success": true, "data": { "valid": false } })),
            Err(EnvaseError::authentication("expired")),
        ]));
        let auth = AuthManager::new(transport, session_with_refresh());

        assert!(auth.verify_token().await);
        assert!(!auth.verify_token().await);
        assert!(!auth.verify_token().await);
    }

    #[tokio::test]
    async fn handler_refreshes_through_weak_reference() {
        let transport = Arc::new(ScriptedTransport::with(vec![Ok(json!({
            "success": true,
            "data": { "token": "via-handler" }
        }))]));
        let auth = Arc::new(AuthManager::new(transport, session_with_refresh()));
        let handler = auth.unauthorized_handler();

        assert_eq!(handler.on_unauthorized().await.unwrap().as_deref(), Some("via-handler"));

        drop(auth);
        let err = handler.on_unauthorized().await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn state_reports_refreshing_while_refresh_is_pending() {
        let transport = Arc::new(
            ScriptedTransport::with(vec![Ok(json!({ "success": true, "data": { "token": "new" } }))])
                .delayed(Duration::from_millis(100)),
        );
        let auth = Arc::new(AuthManager::new(transport, session_with_refresh()));
        assert_eq!(auth.state(), AuthState::Authenticated);

        let pending = tokio::spawn({
            let auth = Arc::clone(&auth);
            async move { auth.refresh_token().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(auth.state(), AuthState::Refreshing);

        assert_eq!(pending.await.unwrap().unwrap(), "new");
        assert_eq!(auth.state(), AuthState::Authenticated);
    }

    #[test]
    fn state_reports_refreshing_during_pipeline_recovery() {
        let auth = AuthManager::new(Arc::new(ScriptedTransport::default()), session_with_refresh());

        let guard = auth.session().begin_recovery();
        assert_eq!(auth.state(), AuthState::Refreshing);

        drop(guard);
        assert_eq!(auth.state(), AuthState::Authenticated);
    }

    #[test]
    fn state_follows_session() {
        let auth = AuthManager::new(Arc::new(ScriptedTransport::default()), Session::default());
        assert_eq!(auth.state(), AuthState::Unauthenticated);

        auth.set_token("t", None);
        assert_eq!(auth.state(), AuthState::Authenticated);
    }
}
