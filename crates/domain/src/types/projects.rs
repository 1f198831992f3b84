//! Project resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationReport;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub organization_id: String,
    pub slug: String,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub organization: String,
}

impl CreateProject {
    /// # Errors
    /// Returns `EnvaseError::Validation` if the name or organization is blank.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .require("name", &self.name, "Project name is required")
            .require("organization", &self.organization, "Organization is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateProject {
    /// # Errors
    /// Returns `EnvaseError::Validation` if a provided name is blank.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .require_opt("name", self.name.as_deref(), "Project name cannot be empty")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProjectsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub organization: Option<String>,
    pub archived: Option<bool>,
}
