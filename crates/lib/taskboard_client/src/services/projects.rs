use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::ResourceService;
use crate::models::{CreateProject, ListEnvelope, Project, ProjectFilter, UpdateProject};
use crate::outcome::RequestOutcome;
use crate::routes;
use crate::transport::{HttpTransport, RequestOptions};

pub struct ProjectsService {
    transport: Arc<HttpTransport>,
}

impl ProjectsService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceService for ProjectsService {
    type Item = Project;
    type Filter = ProjectFilter;
    type Create = CreateProject;
    type Update = UpdateProject;

    async fn list(&self, filters: &ProjectFilter) -> RequestOutcome<ListEnvelope<Project>> {
        self.transport
            .get(routes::PROJECTS, RequestOptions::new().params(filters))
            .await
    }

    async fn create(&self, body: &CreateProject) -> RequestOutcome<Value> {
        self.transport
            .post(routes::PROJECTS, RequestOptions::new().body(body))
            .await
    }

    async fn update(&self, body: &UpdateProject) -> RequestOutcome<Value> {
        self.transport
            .put(&routes::project(&body.id), RequestOptions::new().body(body))
            .await
    }

    async fn delete(&self, id: &str) -> RequestOutcome<Value> {
        self.transport
            .delete(&routes::project(id), RequestOptions::new())
            .await
    }
}
