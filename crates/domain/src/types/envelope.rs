//! Response envelopes returned by every Envase endpoint.

use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Additional step the server demands before it will complete a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Mfa,
    Jit,
    /// A step this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl_wire_enum_conversions!(Requirement {
    Mfa => "mfa",
    Jit => "jit",
    Unknown => "unknown",
});

/// `{ success, data?, error?, code?, requires? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, code: None, requires: Vec::new() }
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Page metadata attached to list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// `{ data: T[], pagination }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_envelope() {
        let response: ApiResponse<serde_json::Value> = serde_json::from_str(
            r#"{ "success": false, "error": "step-up required", "code": "STEP_UP", "requires": ["mfa", "jit"] }"#,
        )
        .unwrap();

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.code.as_deref(), Some("STEP_UP"));
        assert_eq!(response.requires, vec![Requirement::Mfa, Requirement::Jit]);
    }

    #[test]
    fn unknown_requirements_do_not_break_decoding() {
        let response: ApiResponse<u32> = serde_json::from_str(
            r#"{ "success": true, "data": 7, "requires": ["webauthn", "mfa"] }"#,
        )
        .unwrap();

        assert_eq!(response.data, Some(7));
        assert_eq!(response.requires, vec![Requirement::Unknown, Requirement::Mfa]);
    }

    #[test]
    fn parses_paginated_list() {
        let response: PaginatedResponse<u32> = serde_json::from_str(
            r#"{ "data": [1, 2], "pagination": { "page": 1, "limit": 2, "total": 9, "totalPages": 5 } }"#,
        )
        .unwrap();

        assert_eq!(response.data, vec![1, 2]);
        assert_eq!(response.pagination.map(|p| p.total_pages), Some(5));
    }

    #[test]
    fn paginated_list_tolerates_missing_fields() {
        let response: PaginatedResponse<u32> = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_empty());
        assert!(response.pagination.is_none());
    }
}
