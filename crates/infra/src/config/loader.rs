//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `ENVASE_API_URL` is unset, falls back to loading from file
//! 3. Probes the working directory and `~/.envase` for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ENVASE_API_URL`: API base URL (required)
//! - `ENVASE_TOKEN`: Access token
//! - `ENVASE_ORGANIZATION`: Organization sent as `X-Envase-Organization`
//! - `ENVASE_TIMEOUT_MS`: Per-attempt timeout in milliseconds
//! - `ENVASE_RETRIES`: Retries after the first attempt
//! - `ENVASE_RETRY_DELAY_MS`: Base backoff delay in milliseconds
//! - `ENVASE_REFRESH_TOKEN`: Refresh token
//! - `ENVASE_AUTO_REFRESH`: Refresh on 401 (true/false)
//! - `ENVASE_ENCRYPTION_KEY`: 64-character hex key
//! - `ENVASE_ENABLE_ENCRYPTION`: Encrypt secret values (true/false)
//!
//! Saved files never contain tokens or the encryption key.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use envase_core::FileAdapter;
use envase_domain::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use envase_domain::{EnvaseConfig, EnvaseError, Result};

use crate::errors::InfraError;

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `EnvaseError::Configuration` if neither source yields a valid
/// configuration.
pub fn load() -> Result<EnvaseConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `ENVASE_*` environment variables
///
/// Only `ENVASE_API_URL` is required; everything else falls back to the
/// [`EnvaseConfig`] defaults.
///
/// # Errors
/// Returns `EnvaseError::Configuration` if the URL is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<EnvaseConfig> {
    let mut config = EnvaseConfig::new(env_var("ENVASE_API_URL")?);

    config.token = env_opt("ENVASE_TOKEN");
    config.organization = env_opt("ENVASE_ORGANIZATION");
    config.refresh_token = env_opt("ENVASE_REFRESH_TOKEN");
    config.encryption_key = env_opt("ENVASE_ENCRYPTION_KEY");

    if let Some(timeout) = env_parse::<u64>("ENVASE_TIMEOUT_MS")? {
        config.timeout = timeout;
    }
    if let Some(retries) = env_parse::<u32>("ENVASE_RETRIES")? {
        config.retries = retries;
    }
    if let Some(delay) = env_parse::<u64>("ENVASE_RETRY_DELAY_MS")? {
        config.retry_delay = delay;
    }
    config.auto_refresh = env_bool("ENVASE_AUTO_REFRESH", false);
    config.enable_encryption = env_bool("ENVASE_ENABLE_ENCRYPTION", false);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations (see
/// [`probe_config_paths`]).
///
/// # Errors
/// Returns `EnvaseError::Configuration` if the file is missing, cannot be
/// read, or does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<EnvaseConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(EnvaseError::configuration(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            EnvaseError::configuration("No config file found in any of the standard locations")
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); files without
/// an extension are read as JSON.
///
/// # Errors
/// Returns `EnvaseError::Configuration` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<EnvaseConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => serde_json::from_str(contents).map_err(|e| EnvaseError::Configuration {
            message: format!("Invalid JSON format: {e}"),
            code: Some("INVALID_CONFIG".to_string()),
        }),
        _ => Err(EnvaseError::configuration(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe for configuration files
///
/// Searches, in order: `./envase.{json,toml}`, `./.envase/config.json`,
/// and the home directory's `.envase/config.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend([
            cwd.join("envase.json"),
            cwd.join("envase.toml"),
            cwd.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        ]);
    }

    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        let dir = PathBuf::from(home).join(CONFIG_DIR_NAME);
        candidates.extend([dir.join(CONFIG_FILE_NAME), dir.join("config.toml")]);
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Read the adapter's config file.
///
/// Returns `Ok(None)` when the file does not exist yet.
pub async fn load_with_adapter(adapter: &dyn FileAdapter) -> Result<Option<EnvaseConfig>> {
    let path = adapter.config_path();
    match adapter.read_file(&path).await? {
        Some(contents) => {
            tracing::debug!(path = %path.display(), runtime = %adapter.runtime(), "config read");
            parse_config(&contents, &path).map(Some)
        }
        None => Ok(None),
    }
}

/// Persist `config` to the adapter's config path as pretty JSON.
///
/// Tokens and the encryption key are stripped first.
pub async fn save_with_adapter(adapter: &dyn FileAdapter, config: &EnvaseConfig) -> Result<()> {
    let path = adapter.config_path();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        adapter.ensure_dir(parent).await?;
    }

    let contents =
        serde_json::to_string_pretty(&config.without_credentials()).map_err(InfraError::from)?;
    adapter.write_file(&path, &contents).await?;

    tracing::info!(path = %path.display(), "configuration saved");
    Ok(())
}

/// Get required environment variable
///
/// # Errors
/// Returns `EnvaseError::Configuration` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        EnvaseError::configuration(format!("Missing required environment variable: {key}"))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                EnvaseError::configuration(format!("Invalid value for {key}: {e}"))
            })
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
