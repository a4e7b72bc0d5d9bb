//! Wiring for one API session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, FileStorage};
use crate::error::ClientError;
use crate::refresh::{HttpRefreshExchange, RefreshCoordinator, SessionEvent};
use crate::services::{AuthService, ProjectsService, TasksService, TeamsService, UsersService};
use crate::store::{AuthStore, PagedCollectionStore, TeamStore};
use crate::transport::HttpTransport;

/// One credential store, one refresh coordinator, and the services and
/// stores built on top of them.
///
/// Two clients never share refresh state, even when pointed at the same
/// API.
pub struct ApiClient {
    credentials: CredentialStore,
    coordinator: RefreshCoordinator,
    transport: Arc<HttpTransport>,
    users_service: Arc<UsersService>,
    auth: AuthStore,
    projects: PagedCollectionStore<ProjectsService>,
    tasks: PagedCollectionStore<TasksService>,
    users: PagedCollectionStore<UsersService>,
    teams: TeamStore,
}

impl ApiClient {
    /// Build a client whose session lives in `config.session_file`, or in
    /// memory when none is configured.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let credentials = match &config.session_file {
            Some(path) => CredentialStore::new(FileStorage::new(path)),
            None => CredentialStore::in_memory(),
        };
        credentials.load()?;
        Self::with_credentials(config, credentials)
    }

    /// Build a client around an existing credential store.
    pub fn with_credentials(
        config: &ClientConfig,
        credentials: CredentialStore,
    ) -> Result<Self, ClientError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let exchange = Arc::new(HttpRefreshExchange::new(http.clone(), &config.base_url));
        let coordinator = RefreshCoordinator::new(credentials.clone(), exchange);
        let transport = Arc::new(HttpTransport::new(
            http,
            &config.base_url,
            credentials.clone(),
            coordinator.clone(),
        ));

        let users_service = Arc::new(UsersService::new(Arc::clone(&transport)));
        let client = Self {
            auth: AuthStore::new(
                Arc::new(AuthService::new(Arc::clone(&transport))),
                credentials.clone(),
            ),
            projects: PagedCollectionStore::new(Arc::new(ProjectsService::new(Arc::clone(
                &transport,
            )))),
            tasks: PagedCollectionStore::new(Arc::new(TasksService::new(Arc::clone(&transport)))),
            users: PagedCollectionStore::new(Arc::clone(&users_service)),
            teams: TeamStore::new(
                Arc::new(TeamsService::new(Arc::clone(&transport))),
                credentials.clone(),
            ),
            users_service,
            credentials,
            coordinator,
            transport,
        };
        debug!(base_url = %config.base_url, "api client ready");
        Ok(client)
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Refreshed / Expired notifications. "Send the user to the login
    /// screen" belongs to whoever listens for `Expired`.
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.coordinator.subscribe()
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn projects(&self) -> &PagedCollectionStore<ProjectsService> {
        &self.projects
    }

    pub fn tasks(&self) -> &PagedCollectionStore<TasksService> {
        &self.tasks
    }

    pub fn users(&self) -> &PagedCollectionStore<UsersService> {
        &self.users
    }

    /// Direct access for calls that sit outside the paged store, such as
    /// [`UsersService::email_exists`].
    pub fn users_service(&self) -> &UsersService {
        &self.users_service
    }

    pub fn teams(&self) -> &TeamStore {
        &self.teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_client_starts_logged_out() {
        let config = ClientConfig {
            session_file: None,
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert!(!client.auth().is_logged_in());
        assert!(client.projects().page().items.is_empty());
    }

    #[tokio::test]
    async fn invalid_base_url_is_rejected() {
        let config = ClientConfig {
            base_url: "not a url".into(),
            session_file: None,
            request_timeout: None,
        };
        assert!(matches!(ApiClient::new(&config), Err(ClientError::Url(_))));
    }
}
