//! The signed-in user's team.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{RequestState, clear_after};
use crate::credentials::CredentialStore;
use crate::models::{CreateTeam, Team};
use crate::outcome::RequestOutcome;
use crate::services::TeamsService;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamState {
    pub request: RequestState,
    /// Whether the last lookup found a team owned by the caller.
    pub exists: bool,
    pub team: Option<Team>,
}

#[derive(Clone)]
pub struct TeamStore {
    teams: Arc<TeamsService>,
    credentials: CredentialStore,
    state: Arc<Mutex<TeamState>>,
}

impl TeamStore {
    pub fn new(teams: Arc<TeamsService>, credentials: CredentialStore) -> Self {
        Self {
            teams,
            credentials,
            state: Arc::new(Mutex::new(TeamState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, TeamState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> TeamState {
        self.lock().clone()
    }

    /// Look up the caller's team and make it the active one.
    pub async fn fetch_by_owner(&self) -> u16 {
        self.lock().request.begin();
        let outcome = self.teams.by_owner().await;

        let active_team = {
            let mut state = self.lock();
            state.request.record(&outcome);
            match &outcome {
                RequestOutcome::Success { data, .. } => {
                    state.exists = data.exists;
                    state.team = data.team.clone();
                    Some(data.team.as_ref().map(|team| team.id.clone()))
                }
                RequestOutcome::Failure { .. } => None,
            }
        };

        if let Some(team_id) = active_team {
            debug!(found = team_id.is_some(), "team lookup finished");
            if let Err(e) = self.credentials.set_active_team(team_id) {
                warn!(error = %e, "could not persist active team");
            }
        }
        outcome.status_code()
    }

    /// Create a team owned by the caller. Call
    /// [`fetch_by_owner`](Self::fetch_by_owner) afterwards to pick it up.
    pub async fn create(&self, name: &str) -> u16 {
        self.lock().request.begin();
        let outcome = self
            .teams
            .create(&CreateTeam {
                name: name.to_string(),
            })
            .await;
        self.lock().request.record(&outcome);
        outcome.status_code()
    }

    pub fn clear_request_state(&self) {
        self.lock().request.clear();
    }

    pub fn schedule_clear_request_state(&self, after: Duration) -> JoinHandle<()> {
        let store = self.clone();
        clear_after(after, move || store.clear_request_state())
    }
}
