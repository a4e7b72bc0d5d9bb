//! Key/value persistence behind the credential store.

use std::collections::BTreeMap;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::CredentialError;

type Entries = BTreeMap<String, Value>;

/// Local-storage style persistence: JSON values under fixed string keys.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, CredentialError>;

    /// Write several keys as one unit. Backends that can make this atomic must.
    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<(), CredentialError>;

    fn remove(&self, key: &str) -> Result<(), CredentialError>;

    /// Drop every key. Succeeds when there is nothing to drop.
    fn clear(&self) -> Result<(), CredentialError>;
}

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, CredentialError> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<(), CredentialError> {
        let mut guard = lock(&self.entries);
        for (key, value) in entries {
            guard.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        lock(&self.entries).clear();
        Ok(())
    }
}

/// One JSON object in a file, replaced wholesale on every write.
///
/// Writes go to a temp file in the target directory and are renamed over
/// the existing file, so a crash never leaves a half-written session.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// `None` until the file is first read.
    cache: Mutex<Option<Entries>>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// `<data_dir>/taskboard/session.json`, if the platform has a data dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("taskboard").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Entries, CredentialError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Entries>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(Entries::new())
            }
        }
    }

    fn write_file(&self, entries: &Entries) -> Result<(), CredentialError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| CredentialError::Io(e.error))?;

        debug!(path = %self.path.display(), keys = entries.len(), "session file written");
        Ok(())
    }

    /// Apply `change` to the current entries and persist the result.
    /// The cache only moves forward once the file write succeeded.
    fn update(&self, change: impl FnOnce(&mut Entries)) -> Result<(), CredentialError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = match cache.as_ref() {
            Some(entries) => entries.clone(),
            None => self.read_file()?,
        };
        change(&mut next);
        self.write_file(&next)?;
        *cache = Some(next);
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, CredentialError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.is_none() {
            *cache = Some(self.read_file()?);
        }
        Ok(cache.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    fn set_many(&self, entries: Vec<(&str, Value)>) -> Result<(), CredentialError> {
        self.update(|current| {
            for (key, value) in entries {
                current.insert(key.to_string(), value);
            }
        })
    }

    fn remove(&self, key: &str) -> Result<(), CredentialError> {
        self.update(|current| {
            current.remove(key);
        })
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == IoErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        *cache = Some(Entries::new());
        Ok(())
    }
}
