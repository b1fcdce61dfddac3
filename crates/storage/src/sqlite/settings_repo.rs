use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SettingsRepository, StorageError};
use tutor_core::model::{NarratorSettings, VoicePreference};

use super::SqliteStore;

#[async_trait]
impl SettingsRepository for SqliteStore {
    async fn get_settings(&self) -> Result<Option<NarratorSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                api_key,
                api_base_url,
                voice
            FROM narrator_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let api_key: Option<String> = row
            .try_get("api_key")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let api_base_url: Option<String> = row
            .try_get("api_base_url")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let voice: String = row
            .try_get("voice")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let voice: VoicePreference = voice
            .parse()
            .map_err(|err: tutor_core::model::NarratorSettingsError| {
                StorageError::Serialization(err.to_string())
            })?;

        NarratorSettings::from_persisted(api_key, api_base_url, voice)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_settings(&self, settings: &NarratorSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO narrator_settings (
                id,
                api_key,
                api_base_url,
                voice
            )
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                api_key = excluded.api_key,
                api_base_url = excluded.api_base_url,
                voice = excluded.voice
            ",
        )
        .bind(1_i64)
        .bind(settings.api_key())
        .bind(settings.api_base_url())
        .bind(settings.voice().as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
