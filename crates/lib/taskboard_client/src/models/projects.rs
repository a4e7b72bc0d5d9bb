//! Projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::pagination::PageFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    OnHold,
    InProgress,
    Completed,
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OnHold" => Ok(ProjectStatus::OnHold),
            "InProgress" => Ok(ProjectStatus::InProgress),
            "Completed" => Ok(ProjectStatus::Completed),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    pub team_id: String,
    pub manager_id: String,
    pub status: ProjectStatus,
    /// Task counters, present when listed with `withStats`.
    #[serde(default)]
    pub to_do_tasks: u32,
    #[serde(default)]
    pub in_progress_tasks: u32,
    #[serde(default)]
    pub done_tasks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_stats: Option<bool>,
    pub limit: u32,
    pub cursor: String,
}

impl PageFilter for ProjectFilter {
    fn cursor(&self) -> &str {
        &self.cursor
    }

    fn set_cursor(&mut self, cursor: String) {
        self.cursor = cursor;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateProject {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateProject {
    #[serde(skip_serializing)]
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
}
