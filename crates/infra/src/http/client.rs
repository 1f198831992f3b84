//! Request pipeline
//!
//! [`HttpClient`] turns an [`ApiRequest`] into HTTP calls against the Envase
//! API. Every attempt reads the current token and organization from the
//! shared [`Session`], so a rotation is visible to the very next attempt.
//!
//! ## Failure handling
//! - Transient network failures (no response, 429, 5xx) are retried with
//!   exponential backoff until the [`RetryConfig`] budget is spent.
//! - An authentication failure on the first attempt invokes the registered
//!   [`UnauthorizedHandler`] once and replays the request. The replay does
//!   not consume the retry budget. Without a handler the error is returned
//!   immediately.
//! - Concurrent 401 recoveries share one handler invocation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use envase_common::{policies, RetryConfig, RetryDecision, RetryPolicy, SingleFlight};
use envase_core::{ApiRequest, ApiTransport, HttpMethod, Session, UnauthorizedHandler};
use envase_domain::constants::{DEFAULT_CONTENT_TYPE, ORGANIZATION_HEADER};
use envase_domain::{EnvaseConfig, EnvaseError, Result};
use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// HTTP client with built-in retry, timeout and 401 recovery.
pub struct HttpClient {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
    retry: RetryConfig,
    retry_policy: Arc<dyn RetryPolicy<EnvaseError>>,
    session: Session,
    unauthorized_handler: RwLock<Option<Arc<dyn UnauthorizedHandler>>>,
    recovery: SingleFlight<Result<Option<String>>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("session", &self.session)
            .field("has_unauthorized_handler", &self.unauthorized_handler.read().is_some())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Builder preloaded with the URL, timeout and retry settings of `config`.
    pub fn from_config(config: &EnvaseConfig) -> HttpClientBuilder {
        HttpClientBuilder::default()
            .base_url(&config.api_url)
            .timeout(config.timeout_duration())
            .retry(RetryConfig::new(config.retries, config.retry_delay_duration()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }

    /// Register (or clear) the hook invoked on a first-attempt 401.
    pub fn set_unauthorized_handler(&self, handler: Option<Arc<dyn UnauthorizedHandler>>) {
        *self.unauthorized_handler.write() = handler;
    }

    pub fn has_unauthorized_handler(&self) -> bool {
        self.unauthorized_handler.read().is_some()
    }

    /// Execute `request`, retrying and recovering as described in the module
    /// docs. Returns the decoded JSON body (`Null` for empty bodies).
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let mut attempt: u32 = 0;
        let mut retries: u32 = 0;

        loop {
            let token =
                if request.overrides.authenticate { self.session.token() } else { None };

            debug!(
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                "sending request"
            );

            let err = match self.attempt(request, token.as_deref()).await {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if attempt == 0 && err.is_authentication() && request.overrides.recover_auth {
                let handler = self.unauthorized_handler.read().clone();
                let Some(handler) = handler else {
                    return Err(err);
                };
                self.recover(handler, token.as_deref()).await?;
                attempt += 1;
                continue;
            }

            match self.retry_policy.should_retry(&err, retries) {
                RetryDecision::Retry if self.retry.allows_retry(retries) => {
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    warn!(
                        method = %request.method,
                        path = %request.path,
                        status = err.status_code().unwrap_or(0),
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                _ => return Err(err),
            }
        }
    }

    /// Obtain a fresh token for a replay.
    ///
    /// When the token that failed is no longer the session token, somebody
    /// already rotated it and the replay can go ahead without the handler.
    async fn recover(
        &self,
        handler: Arc<dyn UnauthorizedHandler>,
        failed_token: Option<&str>,
    ) -> Result<()> {
        if self.session.token().as_deref() != failed_token {
            debug!("token rotated since the failed attempt, replaying");
            return Ok(());
        }

        let session = self.session.clone();
        let outcome = self
            .recovery
            .run(move || async move {
                let _recovering = session.begin_recovery();
                let token = handler.on_unauthorized().await?;
                if let Some(token) = &token {
                    session.set_token(Some(token.clone()));
                }
                Ok(token)
            })
            .await;

        outcome.map(|_| ()).map_err(|err| {
            warn!(kind = err.kind(), "unauthorized handler failed");
            err.into_authentication()
        })
    }

    async fn attempt(&self, request: &ApiRequest, token: Option<&str>) -> Result<Value> {
        let builder = self.build_request(request, token)?;

        let exchange = async {
            let response = builder.send().await.map_err(InfraError::from)?;
            let status = response.status();
            let body = response.bytes().await.map_err(InfraError::from)?;
            Ok::<_, InfraError>((status, body))
        };

        let (status, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(EnvaseError::network(
                    format!("Request timed out after {}ms", self.timeout.as_millis()),
                    0,
                ))
            }
        };

        if status.is_success() {
            decode_body(status, &body)
        } else {
            Err(InfraError::from_response(status, &body).into())
        }
    }

    fn build_request(&self, request: &ApiRequest, token: Option<&str>) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.base_url, request.path);
        let overrides = &request.overrides;
        let mut builder = self.client.request(to_method(request.method), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            if !overrides.has_header(AUTHORIZATION.as_str()) {
                builder = builder.bearer_auth(token);
            }
        }
        if let Some(organization) = self.session.organization() {
            if !overrides.has_header(ORGANIZATION_HEADER) {
                builder = builder.header(ORGANIZATION_HEADER, organization);
            }
        }
        if !overrides.has_header(CONTENT_TYPE.as_str()) {
            builder = builder.header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE);
        }
        for (name, value) in &overrides.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body).map_err(InfraError::from)?);
        }

        Ok(builder)
    }
}

#[async_trait]
impl ApiTransport for HttpClient {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.execute(&request).await
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn decode_body(status: StatusCode, body: &[u8]) -> Result<Value> {
    let empty = body.iter().all(u8::is_ascii_whitespace);
    if empty || status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|err| {
        EnvaseError::generic(format!("Response body is not valid JSON: {err}"), "INVALID_RESPONSE")
    })
}

/// Builder for [`HttpClient`].
pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    retry: RetryConfig,
    retry_policy: Option<Arc<dyn RetryPolicy<EnvaseError>>>,
    session: Session,
    unauthorized_handler: Option<Arc<dyn UnauthorizedHandler>>,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            retry_policy: None,
            session: Session::default(),
            unauthorized_handler: None,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    /// Trailing slashes are stripped; request paths are appended verbatim.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = Some(url.as_ref().trim().trim_end_matches('/').to_string());
        self
    }

    /// Upper bound on a single attempt, including reading the body.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the default policy, which retries [`EnvaseError::is_retryable`]
    /// failures.
    pub fn retry_policy(mut self, policy: Arc<dyn RetryPolicy<EnvaseError>>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Share an existing session instead of starting with an empty one.
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized_handler = Some(handler);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| EnvaseError::configuration("apiUrl is required"))?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("envase-rust/{}", env!("CARGO_PKG_VERSION")));
        let client = ReqwestClient::builder()
            .user_agent(user_agent)
            .no_proxy()
            .build()
            .map_err(InfraError::from)?;

        let retry_policy = self
            .retry_policy
            .unwrap_or_else(|| Arc::new(policies::PredicateRetry::new(EnvaseError::is_retryable)));

        Ok(HttpClient {
            client,
            base_url,
            timeout: self.timeout,
            retry: self.retry,
            retry_policy,
            session: self.session,
            unauthorized_handler: RwLock::new(self.unauthorized_handler),
            recovery: SingleFlight::new(),
        })
    }
}
