//! Request descriptor
//!
//! An [`ApiRequest`] describes one logical call. The pipeline replays the
//! same descriptor on every retry and on the post-refresh replay, so it is
//! never mutated once handed to a transport.

use std::fmt;

use envase_domain::{EnvaseError, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request adjustments to the pipeline's default behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOverrides {
    /// Attach the session's bearer token.
    pub authenticate: bool,
    /// Allow the unauthorized handler to run and replay this request on 401.
    pub recover_auth: bool,
    /// Extra headers; these win over the computed defaults.
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOverrides {
    fn default() -> Self {
        Self { authenticate: true, recover_auth: true, headers: Vec::new() }
    }
}

impl RequestOverrides {
    /// Whether `name` was overridden (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub overrides: RequestOverrides,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            overrides: RequestOverrides::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `payload` as the JSON body.
    ///
    /// # Errors
    /// Returns `EnvaseError::Generic` with code `SERIALIZATION_ERROR` if the
    /// payload cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let body = serde_json::to_value(payload).map_err(|err| {
            EnvaseError::generic(
                format!("Failed to serialize request body: {err}"),
                "SERIALIZATION_ERROR",
            )
        })?;
        Ok(self.body(body))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.headers.push((name.into(), value.into()));
        self
    }

    /// Send without a bearer token and without 401 recovery.
    pub fn unauthenticated(mut self) -> Self {
        self.overrides.authenticate = false;
        self.overrides.recover_auth = false;
        self
    }

    /// Keep the bearer token but surface a 401 directly.
    pub fn without_auth_recovery(mut self) -> Self {
        self.overrides.recover_auth = false;
        self
    }
}

/// Percent-encode a single path segment.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
