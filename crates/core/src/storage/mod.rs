//! Configuration file storage port.

pub mod ports;

pub use ports::{FileAdapter, RuntimeKind};
