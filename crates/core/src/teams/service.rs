//! Teams service
//!
//! Members are addressed by `(project_id, user_id)`. Listing returns the
//! paginated envelope `{ data: [...], pagination }` rather than the usual
//! `{ success, data }` wrapper.

use std::sync::Arc;

use envase_domain::{
    EnvaseError, InviteMember, ListMembersParams, PaginatedResponse, Result, TeamMember,
    UpdateMemberRole,
};
use tracing::instrument;

use crate::transport::request::encode_segment;
use crate::transport::{decode, fetch, ApiRequest, ApiTransport};

pub struct TeamsService {
    transport: Arc<dyn ApiTransport>,
}

impl TeamsService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self), fields(project_id = %params.project_id))]
    pub async fn list(&self, params: &ListMembersParams) -> Result<Vec<TeamMember>> {
        Ok(self.list_page(params).await?.data)
    }

    /// Like [`Self::list`] but keeps the pagination metadata.
    pub async fn list_page(
        &self,
        params: &ListMembersParams,
    ) -> Result<PaginatedResponse<TeamMember>> {
        let request = ApiRequest::get(members_path(&params.project_id))
            .query_opt("page", params.page)
            .query_opt("limit", params.limit)
            .query_opt("search", params.search.as_deref())
            .query_opt("role", params.role)
            .query_opt("status", params.status);

        let body = self.transport.send(request).await?;
        if body.is_null() {
            return Ok(PaginatedResponse { data: Vec::new(), pagination: None });
        }
        decode(body)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, project_id: &str, user_id: &str) -> Result<TeamMember> {
        let request = ApiRequest::get(member_path(project_id, user_id));
        fetch::<TeamMember>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| EnvaseError::generic("Team member not found", "TEAM_MEMBER_NOT_FOUND"))
    }

    #[instrument(skip(self, data), fields(role = %data.role))]
    pub async fn invite(&self, project_id: &str, data: &InviteMember) -> Result<()> {
        data.validate()?;
        let request = ApiRequest::post(format!("{}/invitations", project_path(project_id)))
            .json(data)?;
        self.transport.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self, data), fields(role = %data.role))]
    pub async fn update_role(
        &self,
        project_id: &str,
        user_id: &str,
        data: &UpdateMemberRole,
    ) -> Result<TeamMember> {
        let request = ApiRequest::put(member_path(project_id, user_id)).json(data)?;
        fetch::<TeamMember>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| {
                EnvaseError::generic("Failed to update member", "TEAM_MEMBER_UPDATE_FAILED")
            })
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, project_id: &str, user_id: &str) -> Result<()> {
        self.transport.send(ApiRequest::delete(member_path(project_id, user_id))).await?;
        Ok(())
    }
}

fn project_path(project_id: &str) -> String {
    format!("/api/projects/{}", encode_segment(project_id))
}

fn members_path(project_id: &str) -> String {
    format!("{}/members", project_path(project_id))
}

fn member_path(project_id: &str, user_id: &str) -> String {
    format!("{}/{}", members_path(project_id), encode_segment(user_id))
}
