//! Conversions from library errors into the domain taxonomy.

pub mod conversions;

pub use conversions::InfraError;
