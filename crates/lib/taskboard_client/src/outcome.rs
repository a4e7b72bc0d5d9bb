//! Normalized result of one API call.

use crate::error::{ErrorKind, INTERNAL_SERVER_ERROR, clamp_status};

/// Result of a request after transport normalization.
///
/// Resource services hand this back unmodified; nothing below the stores
/// ever returns `Err` for a failed call.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome<T> {
    Success { data: T, status_code: u16 },
    Failure { status_code: u16, kind: ErrorKind },
}

impl<T> RequestOutcome<T> {
    pub fn success(data: T, status_code: u16) -> Self {
        RequestOutcome::Success { data, status_code }
    }

    /// Failure for a non-2xx status, clamped and classified.
    pub fn from_status(status: u16) -> Self {
        let status_code = clamp_status(status);
        RequestOutcome::Failure {
            status_code,
            kind: ErrorKind::from_status(status_code),
        }
    }

    /// Failure for a call that produced no usable response.
    pub fn internal() -> Self {
        RequestOutcome::Failure {
            status_code: INTERNAL_SERVER_ERROR,
            kind: ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            RequestOutcome::Success { status_code, .. }
            | RequestOutcome::Failure { status_code, .. } => *status_code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            RequestOutcome::Success { .. } => None,
            RequestOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            RequestOutcome::Success { data, .. } => Some(data),
            RequestOutcome::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            RequestOutcome::Success { data, .. } => Some(data),
            RequestOutcome::Failure { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RequestOutcome<U> {
        match self {
            RequestOutcome::Success { data, status_code } => RequestOutcome::Success {
                data: f(data),
                status_code,
            },
            RequestOutcome::Failure { status_code, kind } => {
                RequestOutcome::Failure { status_code, kind }
            }
        }
    }
}
