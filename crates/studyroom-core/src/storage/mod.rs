//! Key-value persistence.
//!
//! All application state is kept as JSON blobs under a handful of fixed keys
//! split across a persistent and an ephemeral store. Every mutation rewrites
//! the whole list for its key.

mod config;
pub mod database;

pub use config::{CalendarConfig, Config, DashboardConfig, TimerConfig};
pub use database::Database;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Registered credentials list.
pub const USERS_KEY: &str = "tm_users";
/// Signed-in identity record.
pub const SESSION_KEY: &str = "tm_session";
/// Task list for all users.
pub const TASKS_KEY: &str = "tm_tasks";
/// Completed pomodoro runs for all users.
pub const POMODORO_KEY: &str = "tm_pomodoro_sessions";
/// Serialized timer engine between CLI invocations.
pub const TIMER_ENGINE_KEY: &str = "tm_timer_engine";

/// A string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// The two stores the application writes to.
///
/// `local` survives restarts; `session` holds the signed-in identity when the
/// user did not ask to be remembered and is wiped on logout.
pub struct Storage {
    pub local: Box<dyn KvStore>,
    pub session: Box<dyn KvStore>,
}

impl Storage {
    pub fn new(local: Box<dyn KvStore>, session: Box<dyn KvStore>) -> Self {
        Self { local, session }
    }

    /// Open the on-disk stores: `studyroom.db` in the data directory and
    /// `studyroom-session.db` in the OS temp directory.
    pub fn open_default() -> Result<Self> {
        let local = Database::open(data_dir()?.join("studyroom.db"))?;
        let session = Database::open(session_dir()?.join("studyroom-session.db"))?;
        Ok(Self::new(Box::new(local), Box::new(session)))
    }

    /// Two independent in-memory stores (for tests).
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(
            Box::new(Database::open_memory()?),
            Box::new(Database::open_memory()?),
        ))
    }
}

/// Read a JSON list stored under `key`.
///
/// Missing keys and malformed JSON both yield an empty list; the latter is
/// logged so corrupted state does not take the application down.
pub fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Vec<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed stored JSON, falling back to empty state");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored state");
            Vec::new()
        }
    }
}

/// Read a single JSON record stored under `key`, if present and well formed.
pub fn load_record<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored record");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "malformed stored record, ignoring");
            None
        }
    }
}

/// Serialize `value` and write it under `key`, replacing what was there.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Returns the application data directory.
///
/// Resolution order: `STUDYROOM_DATA_DIR` if set, otherwise
/// `~/.config/studyroom/` (or `~/.config/studyroom-dev/` when
/// `STUDYROOM_ENV=dev`). The directory is created if missing.
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(custom) = std::env::var("STUDYROOM_DATA_DIR") {
        PathBuf::from(custom)
    } else {
        let base_dir = dirs::home_dir()
            .ok_or_else(|| ConfigError::DataDir("home directory not found".into()))?
            .join(".config");

        let env = std::env::var("STUDYROOM_ENV").unwrap_or_else(|_| "production".to_string());
        if env == "dev" {
            base_dir.join("studyroom-dev")
        } else {
            base_dir.join("studyroom")
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Directory for the ephemeral session store.
///
/// Lives under the data directory when `STUDYROOM_DATA_DIR` is set so tests
/// stay isolated; otherwise in the OS temp directory.
fn session_dir() -> Result<PathBuf> {
    let dir = match std::env::var("STUDYROOM_DATA_DIR") {
        Ok(custom) => PathBuf::from(custom).join("session"),
        Err(_) => std::env::temp_dir().join("studyroom"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
