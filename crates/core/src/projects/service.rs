//! Projects service

use std::sync::Arc;

use envase_domain::{
    CreateProject, EnvaseError, ListProjectsParams, Project, Result, UpdateProject,
};
use tracing::instrument;

use crate::transport::request::encode_segment;
use crate::transport::{fetch, ApiRequest, ApiTransport};

const PROJECTS_PATH: &str = "/api/projects";

pub struct ProjectsService {
    transport: Arc<dyn ApiTransport>,
}

impl ProjectsService {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, params: &ListProjectsParams) -> Result<Vec<Project>> {
        let request = ApiRequest::get(PROJECTS_PATH)
            .query_opt("page", params.page)
            .query_opt("limit", params.limit)
            .query_opt("search", params.search.as_deref())
            .query_opt("organization", params.organization.as_deref())
            .query_opt("archived", params.archived);

        let response = fetch::<Vec<Project>>(self.transport.as_ref(), request).await?;
        Ok(response.into_data().unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Project> {
        let request = ApiRequest::get(project_path(id));
        fetch::<Project>(self.transport.as_ref(), request).await?.into_data().ok_or_else(|| {
            EnvaseError::generic(format!("Project {id} not found"), "PROJECT_NOT_FOUND")
        })
    }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub async fn create(&self, data: &CreateProject) -> Result<Project> {
        data.validate()?;
        let request = ApiRequest::post(PROJECTS_PATH).json(data)?;
        fetch::<Project>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| EnvaseError::generic("Failed to create project", "PROJECT_CREATE_FAILED"))
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, id: &str, data: &UpdateProject) -> Result<Project> {
        data.validate()?;
        let request = ApiRequest::put(project_path(id)).json(data)?;
        fetch::<Project>(self.transport.as_ref(), request)
            .await?
            .into_data()
            .ok_or_else(|| EnvaseError::generic("Failed to update project", "PROJECT_UPDATE_FAILED"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.transport.send(ApiRequest::delete(project_path(id))).await?;
        Ok(())
    }
}

fn project_path(id: &str) -> String {
    format!("{PROJECTS_PATH}/{}", encode_segment(id))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::testing::{query_pairs, ScriptedTransport};
    use crate::transport::HttpMethod;

    fn project_json(id: &str) -> Value {
        json!({
            "id": id,
            "name": "api",
            "description": null,
            "organizationId": "org-1",
            "slug": "api",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_sends_only_present_filters() {
        let transport = Arc::new(ScriptedTransport::with(vec![Ok(
            json!({ "success": true, "data": [project_json("p1"), project_json("p2")] }),
        )]));
        let service = ProjectsService::new(transport.clone());

        let params = ListProjectsParams {
            page: Some(2),
            search: Some("api".into()),
            archived: Some(false),
            ..ListProjectsParams::default()
        };
        let projects = service.list(&params).await.unwrap();

        assert_eq!(projects.len(), 2);
        let request = transport.last_request();
        assert_eq!(request.path, "/api/projects");
        assert_eq!(query_pairs(&request), vec!["page=2", "search=api", "archived=false"]);
    }

    #[tokio::test]
    async fn list_tolerates_missing_data() {
        let transport = Arc::new(ScriptedTransport::with(vec![Ok(json!({ "success": true }))]));
        let service = ProjectsService::new(transport);

        assert!(service.list(&ListProjectsParams::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_without_data_is_not_found() {
        let transport = Arc::new(ScriptedTransport::with(vec![Ok(json!({ "success": true }))]));
        let service = ProjectsService::new(transport);

        let err = service.get("p9").await.unwrap_err();
        assert_eq!(err.code(), Some("PROJECT_NOT_FOUND"));
        assert_eq!(err.message(), "Project p9 not found");
    }

    #[tokio::test]
    async fn create_validates_before_sending() {
        let transport = Arc::new(ScriptedTransport::default());
        let service = ProjectsService::new(transport.clone());

        let err = service
            .create(&CreateProject {
                name: "  ".into(),
                description: None,
                organization: "org-1".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, EnvaseError::Validation { .. }));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_target_project_path() {
        let transport = Arc::new(ScriptedTransport::with(vec![
            Ok(json!({ "success": true, "data": project_json("p1") })),
            Ok(Value::Null),
        ]));
        let service = ProjectsService::new(transport.clone());

        let update = UpdateProject { name: Some("renamed".into()), description: None };
        let project = service.update("p1", &update).await.unwrap();
        assert_eq!(project.id, "p1");
        service.delete("p1").await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].path, "/api/projects/p1");
        assert_eq!(requests[0].body, Some(json!({ "name": "renamed" })));
        assert_eq!(requests[1].method, HttpMethod::Delete);
    }
}
