//! Client-side validation helpers.
//!
//! Create/update payloads are checked before they leave the process so the
//! caller gets the same `Validation` error shape the API would return.

use crate::errors::{EnvaseError, Result, ValidationDetail};

/// Collects field failures and converts them into a single error.
#[derive(Debug, Default)]
pub struct ValidationReport {
    details: Vec<ValidationDetail>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.details.push(ValidationDetail::new(field, message, "REQUIRED"));
        }
        self
    }

    pub fn require_opt(&mut self, field: &str, value: Option<&str>, message: &str) -> &mut Self {
        if let Some(value) = value {
            self.require(field, value, message);
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str, code: &str) -> &mut Self {
        if !ok {
            self.details.push(ValidationDetail::new(field, message, code));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// # Errors
    /// Returns `EnvaseError::Validation` carrying every collected detail.
    pub fn finish(&mut self) -> Result<()> {
        if self.details.is_empty() {
            Ok(())
        } else {
            Err(EnvaseError::validation("Validation failed", std::mem::take(&mut self.details)))
        }
    }
}
