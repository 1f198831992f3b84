//! Project membership and invitations.

pub mod service;

pub use service::TeamsService;
