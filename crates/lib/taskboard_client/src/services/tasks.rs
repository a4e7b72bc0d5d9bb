use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::ResourceService;
use crate::models::{CreateTask, ListEnvelope, Task, TaskFilter, UpdateTask};
use crate::outcome::RequestOutcome;
use crate::routes;
use crate::transport::{HttpTransport, RequestOptions};

pub struct TasksService {
    transport: Arc<HttpTransport>,
}

impl TasksService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ResourceService for TasksService {
    type Item = Task;
    type Filter = TaskFilter;
    type Create = CreateTask;
    type Update = UpdateTask;

    async fn list(&self, filters: &TaskFilter) -> RequestOutcome<ListEnvelope<Task>> {
        self.transport
            .get(routes::TASKS, RequestOptions::new().params(filters))
            .await
    }

    async fn create(&self, body: &CreateTask) -> RequestOutcome<Value> {
        self.transport
            .post(routes::TASKS, RequestOptions::new().body(body))
            .await
    }

    async fn update(&self, body: &UpdateTask) -> RequestOutcome<Value> {
        self.transport
            .put(&routes::task(&body.id), RequestOptions::new().body(body))
            .await
    }

    async fn delete(&self, id: &str) -> RequestOutcome<Value> {
        self.transport
            .delete(&routes::task(id), RequestOptions::new())
            .await
    }
}
