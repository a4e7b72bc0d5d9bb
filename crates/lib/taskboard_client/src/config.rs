//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::credentials::FileStorage;
use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Configuration for [`ApiClient`](crate::ApiClient).
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// Where the session is persisted. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
    /// Per-request timeout. `None` leaves reqwest's default (no timeout).
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.into(),
            session_file: FileStorage::default_path(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                         | Default                              |
    /// |----------------------------------|--------------------------------------|
    /// | `TASKBOARD_API_URL`              | `http://localhost:8080/api/v1`       |
    /// | `TASKBOARD_SESSION_FILE`         | `<data_dir>/taskboard/session.json`  |
    /// | `TASKBOARD_REQUEST_TIMEOUT_SECS` | unset                                |
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let defaults = Self::default();
        let request_timeout = match lookup("TASKBOARD_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse().map_err(|_| {
                ClientError::Config(format!(
                    "TASKBOARD_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?)),
            None => None,
        };
        let config = Self {
            base_url: lookup("TASKBOARD_API_URL").unwrap_or(defaults.base_url),
            session_file: lookup("TASKBOARD_SESSION_FILE")
                .map(PathBuf::from)
                .or(defaults.session_file),
            request_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ClientError> {
        let url = Url::parse(&self.base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ClientError::Config(format!(
                "unsupported base URL scheme {other:?}"
            ))),
        }
    }
}
