//! Domain types and models
//!
//! Wire envelopes plus the project, environment, secret and team-member
//! resources exposed by the Envase API. All types use camelCase on the wire.

pub mod auth;
pub mod envelope;
pub mod environments;
pub mod projects;
pub mod secrets;
pub mod teams;
pub mod validation;

pub use auth::{RefreshTokenData, RefreshTokenRequest, VerifyTokenData};
pub use envelope::{ApiResponse, PaginatedResponse, Pagination, Requirement};
pub use environments::{
    CreateEnvironment, Environment, ListEnvironmentsParams, UpdateEnvironment,
};
pub use projects::{CreateProject, ListProjectsParams, Project, UpdateProject};
pub use secrets::{
    GetSecretParams, ListSecretsParams, Secret, SecretPayload, SecretScope, SetSecretParams,
    UpdateSecret, UpdateSecretParams,
};
pub use teams::{
    InviteMember, ListMembersParams, MemberStatus, TeamMember, TeamRole, UpdateMemberRole,
};
pub use validation::ValidationReport;
