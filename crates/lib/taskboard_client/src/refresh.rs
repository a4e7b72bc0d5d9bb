//! Single-flight access token renewal.
//!
//! The coordinator is either Idle or Refreshing. The first 401 seen while
//! Idle starts one refresh-token exchange and parks it as a shared future;
//! every 401 that arrives before it settles awaits that same future. The
//! state check and the transition happen under one lock with no `.await`
//! in between, so two exchanges can never be in flight at once.
//!
//! Outcomes:
//! - success: the new access token goes to the credential store, waiters
//!   receive it and retry once.
//! - failure (including a missing refresh token): credentials are cleared,
//!   [`SessionEvent::Expired`] is published, waiters receive the error.
//! - the session was cleared or replaced while the exchange ran: the new
//!   token is dropped, the current session is left alone, waiters receive
//!   [`RefreshError::SessionEnded`].
//!
//! Either way the coordinator is Idle again before waiters resume.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::credentials::CredentialStore;
use crate::error::clamp_status;
use crate::models::auth::{RefreshTokenRequest, RefreshTokenResponse};
use crate::routes;

/// Why a refresh attempt did not produce a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("no refresh token available")]
    MissingRefreshToken,

    #[error("refresh token rejected with status {0}")]
    Rejected(u16),

    #[error("refresh request failed: {0}")]
    Transport(String),

    #[error("session ended while the token was being refreshed")]
    SessionEnded,
}

/// Session transitions published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new access token was stored.
    Refreshed,
    /// Credentials were wiped; the user has to sign in again.
    Expired,
}

/// Exchanges a refresh token for a new access token.
#[async_trait]
pub trait RefreshExchange: Send + Sync {
    async fn exchange(&self, refresh_token: &str) -> Result<String, RefreshError>;
}

/// `POST /auth/refresh-token` over a bare reqwest client.
///
/// Does not go through [`HttpTransport`](crate::transport::HttpTransport):
/// a 401 here ends the session instead of starting another refresh.
pub struct HttpRefreshExchange {
    client: reqwest::Client,
    url: String,
}

impl HttpRefreshExchange {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            url: format!(
                "{}{}",
                base_url.trim_end_matches('/'),
                routes::POST_AUTH_REFRESH_TOKEN
            ),
        }
    }
}

#[async_trait]
impl RefreshExchange for HttpRefreshExchange {
    async fn exchange(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(clamp_status(status.as_u16())));
        }

        let body: RefreshTokenResponse = response.json().await.map_err(|e| {
            RefreshError::Transport(format!("refresh response parse error: {e}"))
        })?;
        Ok(body.access_token)
    }
}

type PendingRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

enum RefreshState {
    Idle,
    Refreshing(PendingRefresh),
}

struct Inner {
    credentials: CredentialStore,
    exchange: Arc<dyn RefreshExchange>,
    state: Mutex<RefreshState>,
    events: broadcast::Sender<SessionEvent>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the refresh state machine. Clones share it; separate
/// [`RefreshCoordinator::new`] calls are fully independent.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl RefreshCoordinator {
    pub fn new(credentials: CredentialStore, exchange: Arc<dyn RefreshExchange>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Inner {
                credentials,
                exchange,
                state: Mutex::new(RefreshState::Idle),
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(*self.inner.state(), RefreshState::Refreshing(_))
    }

    /// Obtain a token to retry with after a 401.
    ///
    /// `rejected_token` is the bearer the failed request carried. When the
    /// store already holds a different token (a refresh finished while the
    /// request was in flight) that token is returned without a new exchange.
    pub async fn recover(&self, rejected_token: Option<&str>) -> Result<String, RefreshError> {
        let pending = {
            let mut state = self.inner.state();
            match &*state {
                RefreshState::Refreshing(pending) => {
                    debug!("joining in-flight token refresh");
                    pending.clone()
                }
                RefreshState::Idle => {
                    if let Some(current) = self.inner.credentials.access_token() {
                        if rejected_token != Some(current.as_str()) {
                            debug!("access token already renewed, skipping refresh");
                            return Ok(current);
                        }
                    }
                    debug!("starting token refresh");
                    let pending = run_refresh(Arc::clone(&self.inner)).boxed().shared();
                    *state = RefreshState::Refreshing(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }
}

async fn run_refresh(inner: Arc<Inner>) -> Result<String, RefreshError> {
    let refresh_token = inner.credentials.refresh_token();
    let result = match &refresh_token {
        Some(refresh_token) => exchange_and_commit(&inner, refresh_token).await,
        None => Err(RefreshError::MissingRefreshToken),
    };

    match &result {
        Ok(_) => {
            info!("access token refreshed");
            let _ = inner.events.send(SessionEvent::Refreshed);
        }
        Err(RefreshError::SessionEnded) => {
            debug!("session changed during token refresh, renewed token dropped");
        }
        Err(err) => {
            warn!(error = %err, "token refresh failed, ending session");
            match inner.credentials.clear_if_current(refresh_token.as_deref()) {
                Ok(true) => {
                    let _ = inner.events.send(SessionEvent::Expired);
                }
                Ok(false) => debug!("session replaced during failed refresh, keeping it"),
                Err(e) => {
                    warn!(error = %e, "could not clear persisted session");
                    let _ = inner.events.send(SessionEvent::Expired);
                }
            }
        }
    }

    *inner.state() = RefreshState::Idle;
    result
}

async fn exchange_and_commit(inner: &Inner, refresh_token: &str) -> Result<String, RefreshError> {
    let access_token = inner.exchange.exchange(refresh_token).await?;
    match inner
        .credentials
        .renew_access_token(refresh_token, access_token.clone())
    {
        Ok(true) => Ok(access_token),
        Ok(false) => Err(RefreshError::SessionEnded),
        Err(e) => {
            warn!(error = %e, "could not persist refreshed access token");
            Ok(access_token)
        }
    }
}
