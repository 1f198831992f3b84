//! Environment resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationReport;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub protected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironment {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub protected: bool,
}

impl CreateEnvironment {
    /// # Errors
    /// Returns `EnvaseError::Validation` if the name or slug is blank.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .require("name", &self.name, "Environment name is required")
            .require("slug", &self.slug, "Environment slug is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
}

impl UpdateEnvironment {
    /// # Errors
    /// Returns `EnvaseError::Validation` if a provided name or slug is blank.
    pub fn validate(&self) -> Result<()> {
        ValidationReport::new()
            .require_opt("name", self.name.as_deref(), "Environment name cannot be empty")
            .require_opt("slug", self.slug.as_deref(), "Environment slug cannot be empty")
            .finish()
    }
}

/// `project_id` is required; the remaining filters are sent only when set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEnvironmentsParams {
    pub project_id: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub protected: Option<bool>,
}

impl ListEnvironmentsParams {
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self { project_id: project_id.into(), ..Self::default() }
    }
}
