//! Port interfaces for the request pipeline
//!
//! Resource services only ever see [`ApiTransport`]; the reqwest-backed
//! pipeline lives in `envase-infra`.

use std::future::Future;

use async_trait::async_trait;
use envase_domain::Result;
use serde_json::Value;

use super::request::ApiRequest;

/// Sends a request descriptor and returns the decoded JSON body.
///
/// Implementations attach auth and organization headers, retry transient
/// failures, and normalize every failure into an `EnvaseError`. An empty
/// success body is returned as `Value::Null`.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// Invoked by the pipeline when a request fails with 401.
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
    /// Obtain a fresh access token.
    ///
    /// `Ok(Some(token))` is committed to the session before the replay.
    /// `Ok(None)` means the handler already updated the session itself.
    async fn on_unauthorized(&self) -> Result<Option<String>>;
}

/// Adapts an async closure into an [`UnauthorizedHandler`].
pub struct FnUnauthorizedHandler<F> {
    handler: F,
}

impl<F> FnUnauthorizedHandler<F> {
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F, Fut> UnauthorizedHandler for FnUnauthorizedHandler<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<String>>> + Send + 'static,
{
    async fn on_unauthorized(&self) -> Result<Option<String>> {
        (self.handler)().await
    }
}
