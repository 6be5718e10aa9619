use async_trait::async_trait;
use quiz_core::model::{ProgressSnapshot, QuizSettings};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the progress tracker snapshot is stored.
pub const PROGRESS_KEY: &str = "quiz_progress";
/// Key under which quiz settings are stored.
pub const SETTINGS_KEY: &str = "quiz_settings";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Opaque key/value persistence collaborator.
///
/// Values are JSON documents encoded as strings, matching what a browser
/// `localStorage` style backend accepts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Repository contract for the progress tracker snapshot.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the last saved snapshot, or `None` on first run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be read or decoded.
    async fn load_progress(&self) -> Result<Option<ProgressSnapshot>, StorageError>;

    /// Persist a snapshot, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or stored.
    async fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load saved settings, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be read or decoded.
    async fn load_settings(&self) -> Result<Option<QuizSettings>, StorageError>;

    /// Persist settings.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be encoded or stored.
    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and for hosts without persistence.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Typed repositories layered over any `KeyValueStore`, encoding values as JSON.
#[derive(Clone)]
pub struct JsonRepository {
    store: Arc<dyn KeyValueStore>,
}

impl JsonRepository {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))
    }

    async fn write<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))?;
        self.store.set(key, raw).await?;
        tracing::debug!(key, "stored value");
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for JsonRepository {
    async fn load_progress(&self) -> Result<Option<ProgressSnapshot>, StorageError> {
        self.read(PROGRESS_KEY).await
    }

    async fn save_progress(&self, snapshot: &ProgressSnapshot) -> Result<(), StorageError> {
        self.write(PROGRESS_KEY, snapshot).await
    }
}

#[async_trait]
impl SettingsRepository for JsonRepository {
    async fn load_settings(&self) -> Result<Option<QuizSettings>, StorageError> {
        self.read(SETTINGS_KEY).await
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        self.write(SETTINGS_KEY, settings).await
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub store: Arc<dyn KeyValueStore>,
    pub progress: Arc<dyn ProgressRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    /// Wire typed repositories over a host-provided key/value store.
    #[must_use]
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        let repo = JsonRepository::new(Arc::clone(&store));
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(repo);
        Self {
            store,
            progress,
            settings,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
