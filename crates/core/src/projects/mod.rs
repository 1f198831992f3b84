//! Project CRUD.

pub mod service;

pub use service::ProjectsService;
