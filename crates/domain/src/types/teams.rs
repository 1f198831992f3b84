//! Team membership resources

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::ValidationReport;
use crate::errors::Result;
use crate::impl_wire_enum_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    Owner,
    Developer,
    ReadOnly,
}

impl_wire_enum_conversions!(TeamRole {
    Owner => "owner",
    Developer => "developer",
    ReadOnly => "read_only",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Pending,
    Inactive,
}

impl_wire_enum_conversions!(MemberStatus {
    Active => "active",
    Pending => "pending",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: TeamRole,
    pub status: MemberStatus,
    pub invited_by: Option<String>,
    pub invited_at: Option<DateTime<Utc>>,
    pub joined_at: Option<DateTime<Utc>>,
    pub last_active_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMember {
    pub email: String,
    pub role: TeamRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InviteMember {
    /// Owners cannot be invited directly; ownership is granted with
    /// `update_role` once the member has joined.
    ///
    /// # Errors
    /// Returns `EnvaseError::Validation` for a malformed email or owner role.
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        let looks_like_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));

        ValidationReport::new()
            .check("email", looks_like_email, "Valid email is required", "INVALID_EMAIL")
            .check(
                "role",
                self.role != TeamRole::Owner,
                "Role must be developer or read_only",
                "INVALID_ROLE",
            )
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMemberRole {
    pub role: TeamRole,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMembersParams {
    pub project_id: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<TeamRole>,
    pub status: Option<MemberStatus>,
}
