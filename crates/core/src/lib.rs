//! # Envase Core
//!
//! Client logic with no transport or platform dependencies.
//!
//! This crate contains:
//! - Port interfaces (`ApiTransport`, `UnauthorizedHandler`, `SecretCipher`,
//!   `FileAdapter`)
//! - The request descriptor handed to a transport
//! - The client session and the auth coordinator
//! - Resource services for projects, environments, secrets and team members
//!
//! ## Architecture Principles
//! - Only depends on `envase-common` and `envase-domain`
//! - No HTTP, filesystem, or crypto library code
//! - All external dependencies via traits

pub mod auth;
pub mod crypto;
pub mod environments;
pub mod projects;
pub mod secrets;
pub mod storage;
pub mod teams;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{
    AuthManager, AuthState, RecoveryGuard, Session, SessionState, TokenRefreshCallback,
};
pub use crypto::ports::SecretCipher;
pub use environments::EnvironmentsService;
pub use projects::ProjectsService;
pub use secrets::SecretsService;
pub use storage::ports::{FileAdapter, RuntimeKind};
pub use teams::TeamsService;
pub use transport::ports::{ApiTransport, FnUnauthorizedHandler, UnauthorizedHandler};
pub use transport::request::{ApiRequest, HttpMethod, RequestOverrides};
