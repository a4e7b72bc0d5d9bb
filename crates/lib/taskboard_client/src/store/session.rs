//! Sign-in state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{RequestState, clear_after};
use crate::credentials::CredentialStore;
use crate::models::UserSummary;
use crate::services::AuthService;

/// Drives login, admin registration and logout.
///
/// Tokens are captured by the transport; this store only tracks request
/// progress and reads the session back from the [`CredentialStore`].
#[derive(Clone)]
pub struct AuthStore {
    auth: Arc<AuthService>,
    credentials: CredentialStore,
    request: Arc<Mutex<RequestState>>,
}

impl AuthStore {
    pub fn new(auth: Arc<AuthService>, credentials: CredentialStore) -> Self {
        Self {
            auth,
            credentials,
            request: Arc::new(Mutex::new(RequestState::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        self.request.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn request_state(&self) -> RequestState {
        *self.lock()
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_logged_in()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.credentials.user()
    }

    /// A wrong email/password pair comes back as 409.
    pub async fn log_in(&self, email: &str, password: &str) -> u16 {
        self.lock().begin();
        let outcome = self.auth.login(email, password).await;
        self.lock().record(&outcome);
        outcome.status_code()
    }

    pub async fn register_admin(&self, username: &str, email: &str, password: &str) -> u16 {
        self.lock().begin();
        let outcome = self.auth.register_admin(username, email, password).await;
        self.lock().record(&outcome);
        outcome.status_code()
    }

    /// End the session on the server, then locally. Local credentials are
    /// wiped even when the server call fails.
    pub async fn log_out(&self) -> u16 {
        self.lock().begin();
        let outcome = self.auth.logout().await;
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "could not clear persisted session");
        }
        info!(status = outcome.status_code(), "logged out");
        self.lock().record(&outcome);
        outcome.status_code()
    }

    pub fn clear_request_state(&self) {
        self.lock().clear();
    }

    /// Forget the local session without calling the API.
    pub fn clear_state(&self) {
        self.clear_request_state();
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "could not clear persisted session");
        }
    }

    pub fn schedule_clear_request_state(&self, after: Duration) -> JoinHandle<()> {
        let store = self.clone();
        clear_after(after, move || store.clear_request_state())
    }
}
