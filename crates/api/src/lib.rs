//! # Envase
//!
//! Rust client for the Envase secrets-management API.
//!
//! This crate contains:
//! - [`EnvaseClient`], the entry point wiring transport, auth and services
//! - Tracing initialisation helpers ([`logging`])
//! - Re-exports of the types needed to call the API
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Composition root of the hexagonal layout: the only crate that picks
//!   concrete adapters for the core ports
//!
//! ```no_run
//! use envase::{EnvaseClient, EnvaseConfig, ListProjectsParams};
//!
//! # async fn run() -> envase::Result<()> {
//! let mut config = EnvaseConfig::new("https://api.envase.dev");
//! config.token = Some("token".into());
//!
//! let client = EnvaseClient::new(config)?;
//! let projects = client.projects().list(&ListProjectsParams::default()).await?;
//! # let _ = projects;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod utils;

pub use client::{EnvaseClient, EnvaseClientBuilder};
pub use envase_common::EncryptionService;
pub use envase_core::{
    AuthManager, AuthState, EnvironmentsService, FileAdapter, FnUnauthorizedHandler,
    ProjectsService, RuntimeKind, SecretsService, TeamsService, TokenRefreshCallback,
    UnauthorizedHandler,
};
pub use envase_domain::*;
pub use envase_infra::config;
pub use envase_infra::{MemoryFileAdapter, NativeFileAdapter};
pub use utils::logging;
