use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tutor_core::model::{NarratorSettings, Progress};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted gamification counters.
///
/// There is exactly one progress row per install; `get` returns `None` until
/// the first save.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored counters, if any have been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the counters cannot be read.
    async fn get_progress(&self) -> Result<Option<Progress>, StorageError>;

    /// Persist the counters, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the counters cannot be stored.
    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError>;
}

/// Repository contract for narrator preferences.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch the stored preferences, if any have been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be read.
    async fn get_settings(&self) -> Result<Option<NarratorSettings>, StorageError>;

    /// Persist the preferences, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be stored.
    async fn save_settings(&self, settings: &NarratorSettings) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and ephemeral runs.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    progress: Arc<Mutex<Option<Progress>>>,
    settings: Arc<Mutex<Option<NarratorSettings>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn get_progress(&self) -> Result<Option<Progress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(progress.clone());
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryStore {
    async fn get_settings(&self) -> Result<Option<NarratorSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_settings(&self, settings: &NarratorSettings) -> Result<(), StorageError> {
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(settings.clone());
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(store);
        Self { progress, settings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tutor_core::model::{NarratorSettingsDraft, VoicePreference};

    fn build_progress(stars: u32) -> Progress {
        let date = NaiveDate::from_ymd_opt(2023, 11, 14).unwrap();
        Progress::from_persisted(stars, 2, Some(date), 3).unwrap()
    }

    #[tokio::test]
    async fn progress_round_trips() {
        let store = InMemoryStore::new();
        assert!(store.get_progress().await.unwrap().is_none());

        let progress = build_progress(5);
        store.save_progress(&progress).await.unwrap();

        let fetched = store.get_progress().await.unwrap().unwrap();
        assert_eq!(fetched, progress);
    }

    #[tokio::test]
    async fn save_replaces_previous_progress() {
        let store = InMemoryStore::new();
        store.save_progress(&build_progress(1)).await.unwrap();
        store.save_progress(&build_progress(9)).await.unwrap();

        let fetched = store.get_progress().await.unwrap().unwrap();
        assert_eq!(fetched.stars(), 9);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let store = InMemoryStore::new();
        assert!(store.get_settings().await.unwrap().is_none());

        let settings = NarratorSettingsDraft {
            api_key: Some("sk-test".into()),
            api_base_url: None,
            voice: VoicePreference::Male,
        }
        .validate()
        .unwrap();
        store.save_settings(&settings).await.unwrap();

        let fetched = store.get_settings().await.unwrap().unwrap();
        assert_eq!(fetched.voice(), VoicePreference::Male);
        assert!(fetched.premium_enabled());
    }

    #[tokio::test]
    async fn storage_aggregate_shares_one_store() {
        let storage = Storage::in_memory();
        storage
            .progress
            .save_progress(&build_progress(4))
            .await
            .unwrap();
        let fetched = storage.progress.get_progress().await.unwrap().unwrap();
        assert_eq!(fetched.stars(), 4);
    }
}
