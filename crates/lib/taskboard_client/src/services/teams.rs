use std::sync::Arc;

use serde_json::Value;

use crate::models::{CreateTeam, TeamLookup};
use crate::outcome::RequestOutcome;
use crate::routes;
use crate::transport::{HttpTransport, RequestOptions};

/// Teams are looked up by owner rather than listed, so this service does
/// not implement [`ResourceService`](super::ResourceService).
pub struct TeamsService {
    transport: Arc<HttpTransport>,
}

impl TeamsService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// The team owned by the signed-in user, if any.
    pub async fn by_owner(&self) -> RequestOutcome<TeamLookup> {
        self.transport
            .get(routes::GET_TEAMS_OWNER, RequestOptions::new())
            .await
    }

    pub async fn create(&self, body: &CreateTeam) -> RequestOutcome<Value> {
        self.transport
            .post(routes::TEAMS, RequestOptions::new().body(body))
            .await
    }
}
