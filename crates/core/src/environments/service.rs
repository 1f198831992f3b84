//! Environments service

use std::sync::Arc;

use envase_domain::{
    CreateEnvironment, EnvaseError, Environment, ListEnvironmentsParams, Result,
    UpdateEnvironment,
};
use tracing::instrument;

use crate::transport::request::encode_segment;
use crate::transport::{fetch, ApiRequest, ApiTransport};

const ENVIRONMENTS_PATH: &str = "/api/environments";

pub struct EnvironmentsService {
    transport: Arc<dyn ApiTransport>,
}

impl EnvironmentsService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self), fields(project_id = %params.project_id))]
    pub async fn list(&self, params: &ListEnvironmentsParams) -> Result<Vec<Environment>> {
        let request = ApiRequest::get(ENVIRONMENTS_PATH)
            .query("projectId", &params.project_id)
            .query_opt("page", params.page)
            .query_opt("limit", params.limit)
            .query_opt("search", params.search.as_deref())
            .query_opt("protected", params.protected);

        let response = fetch::<Vec<Environment>>(self.transport.as_ref(), request).await?;
        Ok(response.into_data().unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Environment> {
        let request = ApiRequest::get(environment_path(id));
        fetch::<Environment>(self.transport.as_ref(), request).await?.into_data().ok_or_else(
            || EnvaseError::generic(format!("Environment {id} not found"), "ENVIRONMENT_NOT_FOUND"),
        )
    }

    #[instrument(skip(self, data), fields(slug = %data.slug))]
    pub async fn create(&self, project_id: &str, data: &CreateEnvironment) -> Result<Environment> {
        data.validate()?;
        let request =
            ApiRequest::post(ENVIRONMENTS_PATH).query("projectId", project_id).json(data)?;
        fetch::<Environment>(self.transport.as_ref(), request).await?.into_data().ok_or_else(
            || EnvaseError::generic("Failed to create environment", "ENVIRONMENT_CREATE_FAILED"),
        )
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, id: &str, data: &UpdateEnvironment) -> Result<Environment> {
        data.validate()?;
        let request = ApiRequest::put(environment_path(id)).json(data)?;
        fetch::<Environment>(self.transport.as_ref(), request).await?.into_data().ok_or_else(
            || EnvaseError::generic("Failed to update environment", "ENVIRONMENT_UPDATE_FAILED"),
        )
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport.send(ApiRequest::delete(environment_path(id))).await?;
        Ok(())
    }
}

fn environment_path(id: &str) -> String {
    format!("{ENVIRONMENTS_PATH}/{}", encode_segment(id))
}
