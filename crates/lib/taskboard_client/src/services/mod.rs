//! Resource services.
//!
//! Stateless request builders: each method maps its arguments onto one
//! endpoint and hands back the transport's [`RequestOutcome`] as-is.

pub mod auth;
pub mod projects;
pub mod tasks;
pub mod teams;
pub mod users;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{ListEnvelope, PageFilter};
use crate::outcome::RequestOutcome;

pub use auth::AuthService;
pub use projects::ProjectsService;
pub use tasks::TasksService;
pub use teams::TeamsService;
pub use users::UsersService;

/// `{list, create, update, delete}` over one collection endpoint.
///
/// Mutation bodies come back as raw JSON (`{..., statusCode}`); callers
/// only act on the status.
#[async_trait]
pub trait ResourceService: Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;
    type Filter: PageFilter;
    type Create: Serialize + Send + Sync;
    type Update: Serialize + Send + Sync;

    async fn list(&self, filters: &Self::Filter) -> RequestOutcome<ListEnvelope<Self::Item>>;

    async fn create(&self, body: &Self::Create) -> RequestOutcome<Value>;

    async fn update(&self, body: &Self::Update) -> RequestOutcome<Value>;

    async fn delete(&self, id: &str) -> RequestOutcome<Value>;
}
