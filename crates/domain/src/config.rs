//! Client configuration
//!
//! Field names follow the camelCase keys used by Envase config files
//! (`apiUrl`, `retryDelay`, ...). Durations are stored in milliseconds.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS};
use crate::errors::{EnvaseError, Result};

/// Configuration consumed by the Envase client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvaseConfig {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Base backoff delay in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub auto_refresh: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
    #[serde(default)]
    pub enable_encryption: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

impl EnvaseConfig {
    /// Configuration with defaults for everything except the API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            organization: None,
            timeout: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY_MS,
            refresh_token: None,
            auto_refresh: false,
            encryption_key: None,
            enable_encryption: false,
        }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    /// Check the settings that would otherwise fail later at first use.
    ///
    /// # Errors
    /// Returns `EnvaseError::Configuration` if the API URL is missing or not
    /// http(s), or if encryption is enabled without a key.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(EnvaseError::configuration("apiUrl is required"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EnvaseError::configuration(format!(
                "apiUrl must start with http:// or https://, got {url}"
            )));
        }
        if self.enable_encryption && self.encryption_key.is_none() {
            return Err(EnvaseError::configuration(
                "Encryption is enabled but no encryptionKey was provided",
            ));
        }
        Ok(())
    }

    /// Copy of this configuration with tokens and the encryption key removed,
    /// suitable for writing to disk.
    pub fn without_credentials(&self) -> Self {
        Self { token: None, refresh_token: None, encryption_key: None, ..self.clone() }
    }
}

impl fmt::Debug for EnvaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "[REDACTED]"
            } else {
                "None"
            }
        }

        f.debug_struct("EnvaseConfig")
            .field("api_url", &self.api_url)
            .field("token", &redact(&self.token))
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .field("retries", &self.retries)
            .field("retry_delay", &self.retry_delay)
            .field("refresh_token", &redact(&self.refresh_token))
            .field("auto_refresh", &self.auto_refresh)
            .field("encryption_key", &redact(&self.encryption_key))
            .field("enable_encryption", &self.enable_encryption)
            .finish()
    }
}
