//! Error types.
//!
//! [`ErrorKind`] is the failure taxonomy carried inside
//! [`RequestOutcome::Failure`](crate::outcome::RequestOutcome); it is data,
//! not an `Err`. [`ClientError`] covers the few operations that can fail
//! outside the request path (construction, configuration, persistence).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialError;

/// HTTP 500, reported for every unmapped or unreachable failure.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// 400: the caller must correct its input.
    Validation,
    /// 401: credential missing, expired, or rejected after refresh.
    Auth,
    /// 403: the role gate refused the operation.
    Forbidden,
    /// 404: the resource does not exist.
    NotFound,
    /// 409: duplicate resource (and failed login, by API convention).
    Conflict,
    /// 500, any unmapped status, or no response at all.
    Internal,
}

impl ErrorKind {
    /// Classify a non-2xx HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::Validation,
            401 => ErrorKind::Auth,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            409 => ErrorKind::Conflict,
            _ => ErrorKind::Internal,
        }
    }
}

/// Clamp transport and proxy-layer codes (anything above 500) to 500.
pub fn clamp_status(status: u16) -> u16 {
    status.min(INTERNAL_SERVER_ERROR)
}

/// Errors raised while building or configuring the client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential storage error: {0}")]
    Credentials(#[from] CredentialError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_statuses() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Auth);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
    }

    #[test]
    fn unmapped_statuses_are_internal() {
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Internal);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Internal);
        assert_eq!(ErrorKind::from_status(302), ErrorKind::Internal);
    }

    #[test]
    fn clamps_codes_above_server_error() {
        assert_eq!(clamp_status(502), 500);
        assert_eq!(clamp_status(504), 500);
        assert_eq!(clamp_status(500), 500);
        assert_eq!(clamp_status(404), 404);
    }
}
