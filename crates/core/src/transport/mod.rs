//! Transport boundary between resource services and the HTTP pipeline.

pub mod ports;
pub mod request;

use envase_domain::{ApiResponse, EnvaseError, Result};
use serde::de::DeserializeOwned;

pub use ports::{ApiTransport, FnUnauthorizedHandler, UnauthorizedHandler};
pub use request::{ApiRequest, HttpMethod, RequestOverrides};

/// Decode a raw response body into a typed value.
///
/// # Errors
/// Returns `EnvaseError::Generic` with code `INVALID_RESPONSE` if the body
/// does not match `T`.
pub fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T> {
    serde_json::from_value(body).map_err(|err| {
        EnvaseError::generic(format!("Unexpected response shape: {err}"), "INVALID_RESPONSE")
    })
}

/// Send `request` and decode the standard `{ success, data, ... }` envelope.
pub async fn fetch<T: DeserializeOwned>(
    transport: &dyn ApiTransport,
    request: ApiRequest,
) -> Result<ApiResponse<T>> {
    let body = transport.send(request).await?;
    if body.is_null() {
        return Ok(ApiResponse {
            success: true,
            data: None,
            error: None,
            code: None,
            requires: Vec::new(),
        });
    }
    decode(body)
}
