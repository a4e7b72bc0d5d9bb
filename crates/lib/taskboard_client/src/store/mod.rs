//! Client-side state holders.
//!
//! Stores turn every [`RequestOutcome`] into `{loading, last_error,
//! last_status_code}` instead of raising, so a caller renders state rather
//! than handling errors. None of them hold a lock across an `.await`.

pub mod paged;
pub mod session;
pub mod teams;

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::ErrorKind;
use crate::messages::{self, Action};
use crate::outcome::RequestOutcome;

pub use paged::{PagedCollectionStore, StoreState};
pub use session::AuthStore;
pub use teams::{TeamState, TeamStore};

/// Progress and result of the most recent request a store issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub last_error: Option<ErrorKind>,
    pub last_status_code: Option<u16>,
}

impl RequestState {
    pub(crate) fn begin(&mut self) {
        self.loading = true;
    }

    pub(crate) fn record<T>(&mut self, outcome: &RequestOutcome<T>) {
        self.loading = false;
        self.last_status_code = Some(outcome.status_code());
        self.last_error = outcome.error_kind();
    }

    /// Dismiss the banner. Leaves data untouched.
    pub fn clear(&mut self) {
        *self = RequestState::default();
    }

    /// Banner text for the last failure, if there is one.
    pub fn banner(&self, action: Action) -> Option<&'static str> {
        let status = self.last_status_code?;
        self.last_error.map(|_| messages::banner(action, status))
    }
}

/// Run `clear` once `after` has elapsed.
pub(crate) fn clear_after<F>(after: Duration, clear: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        clear();
    })
}
