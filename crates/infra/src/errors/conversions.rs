//! Conversions from external infrastructure errors into domain errors.
//!
//! Nothing from `reqwest`, `serde_json`, `toml` or the cipher escapes this
//! crate; every failure is folded into an [`EnvaseError`] here.

use envase_common::CryptoError;
use envase_domain::{EnvaseError, ValidationDetail};
use reqwest::Error as HttpError;
use reqwest::StatusCode;
use serde_json::Value;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub EnvaseError);

impl From<InfraError> for EnvaseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<EnvaseError> for InfraError {
    fn from(value: EnvaseError) -> Self {
        InfraError(value)
    }
}

impl InfraError {
    /// Map a non-2xx response to the taxonomy.
    ///
    /// The message comes from the body's `message`, then `error`, then the
    /// status line. `code` and `details` are read from the body when present.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);

        let message = text("message").or_else(|| text("error")).unwrap_or_else(|| {
            format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("error"))
        });
        let code = text("code");

        let error = match status.as_u16() {
            401 => EnvaseError::Authentication { message, code },
            403 => EnvaseError::Authorization { message, code },
            422 => {
                let details = body
                    .get("details")
                    .cloned()
                    .and_then(|details| serde_json::from_value::<Vec<ValidationDetail>>(details).ok())
                    .unwrap_or_default();
                EnvaseError::validation(message, details)
            }
            other => EnvaseError::network(message, other),
        };
        InfraError(error)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoEnvaseError {
    fn into_envase(self) -> EnvaseError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → EnvaseError */
/* -------------------------------------------------------------------------- */

impl IntoEnvaseError for HttpError {
    fn into_envase(self) -> EnvaseError {
        if self.is_timeout() {
            return EnvaseError::network("Request timed out", 0);
        }

        if self.is_builder() {
            return EnvaseError::generic(format!("Invalid request: {self}"), "INVALID_REQUEST");
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return EnvaseError::network(format!("Connection failed: {self}"), 0);
        }

        if self.is_decode() {
            return EnvaseError::generic(
                format!("Failed to read response body: {self}"),
                "INVALID_RESPONSE",
            );
        }

        if let Some(status) = self.status() {
            return InfraError::from_response(status, &[]).0;
        }

        EnvaseError::network(self.to_string(), 0)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_envase())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → EnvaseError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(EnvaseError::generic(
            format!("JSON serialization failed: {value}"),
            "SERIALIZATION_ERROR",
        ))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(EnvaseError::Configuration {
            message: format!("Invalid TOML format: {value}"),
            code: Some("INVALID_CONFIG".to_string()),
        })
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → EnvaseError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(EnvaseError::Configuration {
            message: format!("File operation failed: {value}"),
            code: Some("FILE_IO_ERROR".to_string()),
        })
    }
}

/* -------------------------------------------------------------------------- */
/* CryptoError → EnvaseError */
/* -------------------------------------------------------------------------- */

impl From<CryptoError> for InfraError {
    fn from(value: CryptoError) -> Self {
        InfraError(EnvaseError::Encryption {
            message: value.to_string(),
            code: Some(value.code().to_string()),
        })
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn map(status: u16, body: Value) -> EnvaseError {
        let status = StatusCode::from_u16(status).unwrap();
        InfraError::from_response(status, body.to_string().as_bytes()).into()
    }

    #[test]
    fn status_401_and_403_keep_body_code() {
        let err = map(401, json!({ "message": "expired", "code": "TOKEN_EXPIRED" }));
        assert_eq!(err, EnvaseError::Authentication {
            message: "expired".into(),
            code: Some("TOKEN_EXPIRED".into()),
        });

        let err = map(403, json!({ "error": "no access" }));
        assert_eq!(err, EnvaseError::Authorization { message: "no access".into(), code: None });
    }

    #[test]
    fn status_422_carries_details_in_order() {
        let err = map(
            422,
            json!({
                "message": "invalid",
                "details": [
                    { "field": "key", "message": "required", "code": "REQUIRED" },
                    { "field": "value", "message": "too long", "code": "TOO_LONG" }
                ]
            }),
        );

        let fields: Vec<_> = err.details().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["key", "value"]);
        assert_eq!(err.details()[0].code, "REQUIRED");
    }

    #[test]
    fn other_statuses_become_network_with_status_line_fallback() {
        let err = InfraError::from_response(StatusCode::BAD_GATEWAY, b"<html>").0;
        assert_eq!(err.status_code(), Some(502));
        assert_eq!(err.message(), "HTTP 502 Bad Gateway");
        assert!(err.is_retryable());

        assert!(!map(404, json!({ "message": "missing" })).is_retryable());
    }

    #[test]
    fn crypto_errors_keep_their_code() {
        let err: EnvaseError = InfraError::from(CryptoError::DecryptionFailed).into();
        assert_eq!(err.kind(), "encryption");
        assert_eq!(err.code(), Some("DECRYPTION_FAILED"));
    }

    #[test]
    fn io_errors_are_configuration_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EnvaseError = InfraError::from(io).into();
        assert_eq!(err.code(), Some("FILE_IO_ERROR"));
    }

    #[tokio::test]
    async fn reqwest_status_error_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED.as_u16()))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: EnvaseError = InfraError::from(error).into();
        assert!(mapped.is_authentication());
        assert!(mapped.message().contains("401"));
    }
}
