//! Shared fixtures for client integration tests.

#![allow(dead_code)]

use envase::{EnvaseClient, EnvaseConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// Config pointing at `server` with fast retries.
pub fn config_for(server: &MockServer) -> EnvaseConfig {
    let mut config = EnvaseConfig::new(server.uri());
    config.retries = 1;
    config.retry_delay = 10;
    config.timeout = 2_000;
    config
}

pub fn client_with_token(server: &MockServer, token: &str) -> EnvaseClient {
    let mut config = config_for(server);
    config.token = Some(token.to_string());
    EnvaseClient::new(config).expect("client should build")
}

pub fn project_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Billing",
        "description": null,
        "organizationId": "org-1",
        "slug": "billing",
        "archivedAt": null,
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

pub fn secret_json(key: &str, value: &str) -> Value {
    json!({
        "id": format!("sec-{key}"),
        "projectId": "p1",
        "key": key,
        "value": value,
        "scope": "project",
        "version": 1,
        "createdBy": "u1",
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z"
    })
}

pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}
