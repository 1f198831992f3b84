//! Integration tests for the client façade
//!
//! Drives [`EnvaseClient`] against a wiremock server: resource calls,
//! transparent secret encryption, config snapshots and persistence.

mod support;

use envase::{
    EncryptionService, EnvaseClient, EnvaseConfig, FileAdapter, GetSecretParams,
    ListProjectsParams, MemoryFileAdapter, NativeFileAdapter, SetSecretParams,
};
use serde_json::{json, Value};
use support::{client_with_token, config_for, envelope, project_json, secret_json, TEST_KEY};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn lists_projects_with_session_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(header("authorization", "Bearer t1"))
        .and(header("x-envase-organization", "acme"))
        .and(query_param("search", "bill"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(json!([project_json("p1"), project_json("p2")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_token(&server, "t1");
    client.set_organization(Some("acme".into()));

    let projects = client
        .projects()
        .list(&ListProjectsParams { search: Some("bill".into()), ..Default::default() })
        .await
        .unwrap();
    let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn missing_project_is_a_generic_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/nope"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = client_with_token(&server, "t1").projects().get("nope").await.unwrap_err();
    assert_eq!(err.code(), Some("PROJECT_NOT_FOUND"));
}

#[tokio::test]
async fn secrets_are_encrypted_on_the_wire_and_decrypted_on_read() {
    let server = MockServer::start().await;
    let server_side = EncryptionService::new(TEST_KEY).unwrap();
    let stored = server_side.encrypt("postgres://prod").unwrap();

    Mock::given(method("POST"))
        .and(path("/api/secrets"))
        .and(query_param("projectId", "p1"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(envelope(secret_json("DATABASE_URL", &stored))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/secrets/DATABASE_URL"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(secret_json("DATABASE_URL", &stored))),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.token = Some("t1".into());
    config.encryption_key = Some(TEST_KEY.into());
    config.enable_encryption = true;
    let client = EnvaseClient::new(config).unwrap();
    assert!(client.encryption().is_some());

    let created = client
        .secrets()
        .set(&SetSecretParams {
            project_id: "p1".into(),
            key: "DATABASE_URL".into(),
            value: "postgres://prod".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.value.as_deref(), Some("postgres://prod"));

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let sent = body["value"].as_str().unwrap();
    assert_ne!(sent, "postgres://prod");
    assert_eq!(server_side.decrypt(sent).unwrap(), "postgres://prod");
    assert_eq!(body["scope"], "project");

    let fetched = client
        .secrets()
        .get(&GetSecretParams {
            project_id: "p1".into(),
            key: "DATABASE_URL".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(fetched.value.as_deref(), Some("postgres://prod"));
}

#[tokio::test]
async fn opting_out_of_encryption_sends_plaintext() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/secrets"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(envelope(secret_json("FLAG", ""))),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.encryption_key = Some(TEST_KEY.into());
    let client = EnvaseClient::new(config).unwrap();

    client
        .secrets()
        .set(&SetSecretParams {
            project_id: "p1".into(),
            key: "FLAG".into(),
            value: "on".into(),
            encrypt: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["value"], "on");
}

#[test]
fn invalid_configs_are_rejected_at_construction() {
    let err = EnvaseClient::new(EnvaseConfig::new("")).unwrap_err();
    assert_eq!(err.kind(), "configuration");

    let mut config = EnvaseConfig::new("https://api.envase.dev");
    config.enable_encryption = true;
    let err = EnvaseClient::new(config).unwrap_err();
    assert_eq!(err.kind(), "configuration");

    let mut config = EnvaseConfig::new("https://api.envase.dev");
    config.encryption_key = Some("too-short".into());
    let err = EnvaseClient::new(config).unwrap_err();
    assert_eq!(err.kind(), "encryption");
}

#[test]
fn config_snapshot_tracks_token_and_organization() {
    let client = EnvaseClient::new(EnvaseConfig::new("https://api.envase.dev")).unwrap();
    assert_eq!(client.base_url(), "https://api.envase.dev");

    client.set_token(Some("t2".into()), Some("r2".into()));
    client.set_organization(Some("acme".into()));

    let snapshot = client.config();
    assert_eq!(snapshot.token.as_deref(), Some("t2"));
    assert_eq!(snapshot.refresh_token.as_deref(), Some("r2"));
    assert_eq!(snapshot.organization.as_deref(), Some("acme"));
    assert_eq!(client.auth().token().as_deref(), Some("t2"));

    client.set_token(None, None);
    assert_eq!(client.config().token, None);
    assert_eq!(client.config().refresh_token.as_deref(), Some("r2"));
    assert_eq!(client.auth().token(), None);
}

#[tokio::test]
async fn saved_config_omits_credentials_and_reloads() {
    let adapter = MemoryFileAdapter::new();
    let mut config = EnvaseConfig::new("https://api.envase.dev");
    config.token = Some("secret-token".into());
    config.encryption_key = Some(TEST_KEY.into());
    let client = EnvaseClient::new(config).unwrap();
    client.set_organization(Some("acme".into()));

    client.save_config(&adapter).await.unwrap();

    let written = adapter.read_file(&adapter.config_path()).await.unwrap().unwrap();
    assert!(!written.contains("secret-token"));
    assert!(!written.contains(TEST_KEY));

    let reloaded = EnvaseClient::from_adapter(&adapter).await.unwrap();
    assert_eq!(reloaded.config().organization.as_deref(), Some("acme"));
    assert!(reloaded.encryption().is_none());
}

#[tokio::test]
async fn from_adapter_without_config_fails() {
    let adapter = MemoryFileAdapter::new();
    let err = EnvaseClient::from_adapter(&adapter).await.unwrap_err();
    assert_eq!(err.kind(), "configuration");
    assert!(err.message().contains("config.json"));
}

#[tokio::test]
async fn native_adapter_round_trips_saved_config() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = NativeFileAdapter::with_config_dir(dir.path().join(".envase"));

    let client = EnvaseClient::new(EnvaseConfig::new("https://api.envase.dev")).unwrap();
    client.save_config(&adapter).await.unwrap();

    let reloaded = EnvaseClient::from_adapter(&adapter).await.unwrap();
    assert_eq!(reloaded.base_url(), "https://api.envase.dev");
}
