//! Secret CRUD with transparent value encryption.

pub mod service;

pub use service::SecretsService;
