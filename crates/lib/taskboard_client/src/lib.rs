//! # taskboard_client
//!
//! Authenticated client for the task board API: a persisted credential
//! store, an HTTP transport that renews expired access tokens with a
//! single-flight refresh, stateless resource services, and cursor-paged
//! stores that turn every response into renderable state.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod messages;
pub mod models;
pub mod outcome;
pub mod refresh;
pub mod routes;
pub mod services;
pub mod store;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{Credential, CredentialError, CredentialStore};
pub use error::{ClientError, ErrorKind};
pub use outcome::RequestOutcome;
pub use refresh::{RefreshCoordinator, RefreshError, SessionEvent};
pub use services::ResourceService;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
