//! Environment CRUD.

pub mod service;

pub use service::EnvironmentsService;
