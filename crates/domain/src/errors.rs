//! Error types used throughout the SDK
//!
//! `EnvaseError` is a closed set: every failure that crosses a crate
//! boundary is exactly one of these variants. Transport and crypto library
//! errors are converted at the edge and never escape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code attached to every [`EnvaseError::Validation`].
pub const VALIDATION_ERROR_CODE: &str = "VALIDATION_ERROR";

/// Code attached to every [`EnvaseError::Network`].
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";

/// A single field-level validation failure reported by the API (or by
/// client-side validation before a request is sent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl ValidationDetail {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self { field: field.into(), message: message.into(), code: code.into() }
    }
}

/// Main error type for the Envase SDK
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvaseError {
    #[error("Authentication error: {message}")]
    Authentication { message: String, code: Option<String> },

    #[error("Authorization error: {message}")]
    Authorization { message: String, code: Option<String> },

    #[error("Validation error: {message}")]
    Validation { message: String, details: Vec<ValidationDetail> },

    /// `status_code` is 0 when no HTTP response was received at all.
    #[error("Network error (status {status_code}): {message}")]
    Network { message: String, status_code: u16 },

    #[error("Encryption error: {message}")]
    Encryption { message: String, code: Option<String> },

    #[error("Configuration error: {message}")]
    Configuration { message: String, code: Option<String> },

    #[error("{message}")]
    Generic { message: String, code: Option<String> },
}

/// Result type alias for Envase operations
pub type Result<T> = std::result::Result<T, EnvaseError>;

impl EnvaseError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication { message: message.into(), code: None }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization { message: message.into(), code: None }
    }

    pub fn validation(message: impl Into<String>, details: Vec<ValidationDetail>) -> Self {
        Self::Validation { message: message.into(), details }
    }

    pub fn network(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network { message: message.into(), status_code }
    }

    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption { message: message.into(), code: None }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), code: None }
    }

    pub fn generic(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Generic { message: message.into(), code: Some(code.into()) }
    }

    /// Human readable message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Authentication { message, .. }
            | Self::Authorization { message, .. }
            | Self::Validation { message, .. }
            | Self::Network { message, .. }
            | Self::Encryption { message, .. }
            | Self::Configuration { message, .. }
            | Self::Generic { message, .. } => message,
        }
    }

    /// Machine-readable error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } => Some(VALIDATION_ERROR_CODE),
            Self::Network { .. } => Some(NETWORK_ERROR_CODE),
            Self::Authentication { code, .. }
            | Self::Authorization { code, .. }
            | Self::Encryption { code, .. }
            | Self::Configuration { code, .. }
            | Self::Generic { code, .. } => code.as_deref(),
        }
    }

    /// HTTP status associated with the error kind.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Authorization { .. } => Some(403),
            Self::Validation { .. } => Some(422),
            Self::Network { status_code, .. } => Some(*status_code),
            Self::Encryption { .. } | Self::Configuration { .. } | Self::Generic { .. } => None,
        }
    }

    /// Field details for validation failures; empty for every other kind.
    pub fn details(&self) -> &[ValidationDetail] {
        match self {
            Self::Validation { details, .. } => details,
            _ => &[],
        }
    }

    /// Whether this is a transient network failure: no response, 429, or 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { status_code, .. } => {
                *status_code == 0 || *status_code == 429 || *status_code >= 500
            }
            _ => false,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Re-tag an error as an authentication failure, keeping its message.
    ///
    /// Authentication errors are returned unchanged.
    pub fn into_authentication(self) -> Self {
        match self {
            Self::Authentication { .. } => self,
            other => Self::authentication(other.message().to_string()),
        }
    }

    /// Stable label suitable for structured logging fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Authorization { .. } => "authorization",
            Self::Validation { .. } => "validation",
            Self::Network { .. } => "network",
            Self::Encryption { .. } => "encryption",
            Self::Configuration { .. } => "configuration",
            Self::Generic { .. } => "generic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_are_detected() {
        assert!(EnvaseError::network("down", 0).is_retryable());
        assert!(EnvaseError::network("slow down", 429).is_retryable());
        assert!(EnvaseError::network("oops", 500).is_retryable());
        assert!(EnvaseError::network("gateway", 503).is_retryable());
        assert!(!EnvaseError::network("missing", 404).is_retryable());
        assert!(!EnvaseError::network("conflict", 409).is_retryable());
        assert!(!EnvaseError::authentication("nope").is_retryable());
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(EnvaseError::authentication("x").status_code(), Some(401));
        assert_eq!(EnvaseError::authorization("x").status_code(), Some(403));
        assert_eq!(EnvaseError::validation("x", vec![]).status_code(), Some(422));
        assert_eq!(EnvaseError::network("x", 502).status_code(), Some(502));
        assert_eq!(EnvaseError::encryption("x").status_code(), None);
    }

    #[test]
    fn codes_are_fixed_for_validation_and_network() {
        assert_eq!(EnvaseError::validation("x", vec![]).code(), Some(VALIDATION_ERROR_CODE));
        assert_eq!(EnvaseError::network("x", 0).code(), Some(NETWORK_ERROR_CODE));
        assert_eq!(
            EnvaseError::generic("Project p not found", "PROJECT_NOT_FOUND").code(),
            Some("PROJECT_NOT_FOUND")
        );
        assert_eq!(EnvaseError::configuration("x").code(), None);
    }

    #[test]
    fn into_authentication_keeps_message() {
        let err = EnvaseError::network("refresh endpoint unreachable", 0).into_authentication();
        assert!(err.is_authentication());
        assert_eq!(err.message(), "refresh endpoint unreachable");

        let original = EnvaseError::Authentication {
            message: "expired".into(),
            code: Some("TOKEN_EXPIRED".into()),
        };
        assert_eq!(original.clone().into_authentication(), original);
    }

    #[test]
    fn validation_details_are_exposed_in_order() {
        let details = vec![
            ValidationDetail::new("key", "required", "REQUIRED"),
            ValidationDetail::new("value", "too long", "MAX_LENGTH"),
        ];
        let err = EnvaseError::validation("Validation failed", details.clone());
        assert_eq!(err.details(), details.as_slice());
        assert!(EnvaseError::authorization("x").details().is_empty());
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = EnvaseError::network("timeout", 0);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "network");
        assert_eq!(json["status_code"], 0);
    }
}
