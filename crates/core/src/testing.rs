//! Test doubles shared by the service unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use envase_domain::{EnvaseError, Result};
use parking_lot::Mutex;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiTransport};

/// Transport that pops one canned result per call and records every
/// request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn with(responses: Vec<Result<Value>>) -> Self {
        Self { responses: Mutex::new(responses.into()), ..Self::default() }
    }

    /// Hold every response for `delay` before returning it.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests.lock().last().cloned().unwrap_or_else(|| ApiRequest::get("<none>"))
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(EnvaseError::network("no scripted response", 0)))
    }
}

/// Query parameters of `request` as `key=value` strings.
pub fn query_pairs(request: &ApiRequest) -> Vec<String> {
    request.query.iter().map(|(key, value)| format!("{key}={value}")).collect()
}
