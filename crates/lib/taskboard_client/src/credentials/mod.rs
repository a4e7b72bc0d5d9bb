//! Credential store.
//!
//! Holds the access/refresh token pair, the signed-in user, and the active
//! team for the whole process. State is hydrated from [`SessionStorage`]
//! on first use and written back on every mutation. The in-memory copy is
//! authoritative: a failed write is reported to the caller but does not
//! roll back what the process sees.
//!
//! No network calls originate here.

pub mod storage;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::UserSummary;

pub use storage::{FileStorage, MemoryStorage, SessionStorage};

/// Fixed persistence keys.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const REFRESH_TOKEN: &str = "refreshToken";
    pub const USER: &str = "user";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const TEAM_ID: &str = "teamId";
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Snapshot of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserSummary>,
    pub is_logged_in: bool,
    pub active_team_id: Option<String>,
}

struct Inner {
    storage: Box<dyn SessionStorage>,
    /// `None` until hydrated.
    state: RwLock<Option<Credential>>,
}

/// Process-wide session state. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let credential = self.credential();
        f.debug_struct("CredentialStore")
            .field("is_logged_in", &credential.is_logged_in)
            .field("user", &credential.user.map(|u| u.id))
            .finish()
    }
}

impl CredentialStore {
    /// Wrap a storage backend. Nothing is read until first use.
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage: Box::new(storage),
                state: RwLock::new(None),
            }),
        }
    }

    /// Store backed by [`MemoryStorage`].
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Credential>> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Credential>> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hydrate from storage. Missing or malformed keys yield the logged-out
    /// defaults for those fields.
    pub fn load(&self) -> Result<(), CredentialError> {
        let storage = &self.inner.storage;
        let credential = Credential {
            access_token: string_entry(storage.get(keys::TOKEN)?),
            refresh_token: string_entry(storage.get(keys::REFRESH_TOKEN)?),
            user: storage.get(keys::USER)?.and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|e| warn!(error = %e, "ignoring malformed persisted user"))
                    .ok()
            }),
            is_logged_in: storage
                .get(keys::IS_LOGGED_IN)?
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            active_team_id: string_entry(storage.get(keys::TEAM_ID)?),
        };
        debug!(is_logged_in = credential.is_logged_in, "credentials loaded");
        *self.write() = Some(credential);
        Ok(())
    }

    fn ensure_loaded(&self) {
        if self.read().is_some() {
            return;
        }
        if let Err(e) = self.load() {
            warn!(error = %e, "could not read persisted session, starting logged out");
            let mut state = self.write();
            if state.is_none() {
                *state = Some(Credential::default());
            }
        }
    }

    /// Current session snapshot.
    pub fn credential(&self) -> Credential {
        self.ensure_loaded();
        self.read().clone().unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<String> {
        self.ensure_loaded();
        self.read().as_ref().and_then(|c| c.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.ensure_loaded();
        self.read().as_ref().and_then(|c| c.refresh_token.clone())
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.ensure_loaded();
        self.read().as_ref().and_then(|c| c.user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.ensure_loaded();
        self.read().as_ref().is_some_and(|c| c.is_logged_in)
    }

    pub fn active_team_id(&self) -> Option<String> {
        self.ensure_loaded();
        self.read().as_ref().and_then(|c| c.active_team_id.clone())
    }

    /// Record a fresh session and mark it logged in. The previous user is
    /// replaced, or forgotten when `user` is `None`.
    pub fn set_session(
        &self,
        access_token: String,
        refresh_token: String,
        user: Option<UserSummary>,
    ) -> Result<(), CredentialError> {
        self.ensure_loaded();
        let mut entries = vec![
            (keys::TOKEN, Value::from(access_token.as_str())),
            (keys::REFRESH_TOKEN, Value::from(refresh_token.as_str())),
            (keys::IS_LOGGED_IN, Value::Bool(true)),
        ];
        if let Some(user) = &user {
            entries.push((keys::USER, serde_json::to_value(user)?));
        }
        let has_user = user.is_some();

        let mut state = self.write();
        let credential = state.get_or_insert_with(Credential::default);
        credential.access_token = Some(access_token);
        credential.refresh_token = Some(refresh_token);
        credential.user = user;
        credential.is_logged_in = true;
        info!("session established");

        self.inner.storage.set_many(entries)?;
        if !has_user {
            self.inner.storage.remove(keys::USER)?;
        }
        Ok(())
    }

    /// Swap in a renewed access token for the session that owns
    /// `refresh_token`.
    ///
    /// Returns `false` and changes nothing when that session has been
    /// cleared or replaced in the meantime.
    pub(crate) fn renew_access_token(
        &self,
        refresh_token: &str,
        access_token: String,
    ) -> Result<bool, CredentialError> {
        self.ensure_loaded();
        let mut state = self.write();
        let Some(credential) = state
            .as_mut()
            .filter(|c| c.is_logged_in && c.refresh_token.as_deref() == Some(refresh_token))
        else {
            return Ok(false);
        };
        credential.access_token = Some(access_token.clone());
        self.inner
            .storage
            .set_many(vec![(keys::TOKEN, Value::from(access_token))])?;
        Ok(true)
    }

    /// [`clear`](Self::clear), but only while the session still holds
    /// `refresh_token`. Returns whether anything was cleared.
    pub(crate) fn clear_if_current(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<bool, CredentialError> {
        self.ensure_loaded();
        let mut state = self.write();
        let current = state.as_ref().and_then(|c| c.refresh_token.as_deref());
        if current != refresh_token {
            return Ok(false);
        }
        *state = Some(Credential::default());
        info!("session cleared");
        self.inner.storage.clear()?;
        Ok(true)
    }

    pub fn set_active_team(&self, team_id: Option<String>) -> Result<(), CredentialError> {
        self.ensure_loaded();
        self.write()
            .get_or_insert_with(Credential::default)
            .active_team_id = team_id.clone();
        match team_id {
            Some(id) => self
                .inner
                .storage
                .set_many(vec![(keys::TEAM_ID, Value::from(id))]),
            None => self.inner.storage.remove(keys::TEAM_ID),
        }
    }

    /// Wipe the session. Safe with no active session and when repeated.
    pub fn clear(&self) -> Result<(), CredentialError> {
        let mut state = self.write();
        if state.as_ref().is_some_and(|c| c.is_logged_in) {
            info!("session cleared");
        }
        *state = Some(Credential::default());
        self.inner.storage.clear()
    }
}

fn string_entry(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}
