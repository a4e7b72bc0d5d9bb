//! Teams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub name: String,
    pub owner_id: String,
}

/// `GET /teams/owner` answers whether the caller owns a team yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamLookup {
    #[serde(default)]
    pub exists: bool,
    #[serde(default)]
    pub team: Option<Team>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTeam {
    pub name: String,
}
