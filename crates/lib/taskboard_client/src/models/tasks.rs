//! Tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ToDo" => Ok(TaskStatus::ToDo),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Done" => Ok(TaskStatus::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub project_id: String,
    /// Unassigned tasks carry `null`.
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: TaskStatus,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub limit: u32,
    pub cursor: String,
}

impl PageFilter for TaskFilter {
    fn cursor(&self) -> &str {
        &self.cursor
    }

    fn set_cursor(&mut self, cursor: String) {
        self.cursor = cursor;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(skip_serializing)]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListEnvelope;

    #[test]
    fn filter_omits_unset_keys() {
        let filter = TaskFilter {
            project_id: None,
            title: Some("bug".into()),
            limit: 10,
            cursor: String::new(),
        };
        let value = serde_json::to_value(&filter).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"title": "bug", "limit": 10, "cursor": ""})
        );
    }

    #[test]
    fn update_body_keeps_id_out_of_payload() {
        let body = UpdateTask {
            id: "t1".into(),
            title: "Ship".into(),
            description: None,
            status: TaskStatus::Done,
            user_id: "u1".into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["status"], "Done");
        assert_eq!(value["userId"], "u1");
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("InProgress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("in progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn unassigned_task_decodes() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z",
            "projectId": "p1",
            "userId": null,
            "status": "ToDo",
            "title": "Write docs",
            "description": "",
            "projectName": "Docs",
            "userName": ""
        }))
        .unwrap();
        assert!(task.user_id.is_none());
        assert_eq!(task.status, TaskStatus::ToDo);
    }

    #[test]
    fn task_envelope_without_data_is_empty() {
        let envelope: ListEnvelope<Task> = serde_json::from_value(serde_json::json!({
            "pagination": {"prev_cursor": "", "next_cursor": ""}
        }))
        .unwrap();
        assert!(envelope.data.is_none());
    }
}
