use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::Row;

use crate::repository::{ProgressRepository, StorageError};
use tutor_core::model::Progress;

use super::SqliteStore;

#[async_trait]
impl ProgressRepository for SqliteStore {
    async fn get_progress(&self) -> Result<Option<Progress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                stars,
                daily_streak,
                last_daily_completion,
                daily_correct
            FROM progress
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let stars: i64 = row
            .try_get("stars")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let daily_streak: i64 = row
            .try_get("daily_streak")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let last_daily_completion: Option<NaiveDate> = row
            .try_get("last_daily_completion")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let daily_correct: i64 = row
            .try_get("daily_correct")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let stars = u32::try_from(stars)
            .map_err(|_| StorageError::Serialization("negative star count".into()))?;
        let daily_streak = u32::try_from(daily_streak)
            .map_err(|_| StorageError::Serialization("negative streak".into()))?;
        let daily_correct = u8::try_from(daily_correct)
            .map_err(|_| StorageError::Serialization("daily count out of range".into()))?;

        Progress::from_persisted(stars, daily_streak, last_daily_completion, daily_correct)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn save_progress(&self, progress: &Progress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO progress (
                id,
                stars,
                daily_streak,
                last_daily_completion,
                daily_correct
            )
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                stars = excluded.stars,
                daily_streak = excluded.daily_streak,
                last_daily_completion = excluded.last_daily_completion,
                daily_correct = excluded.daily_correct
            ",
        )
        .bind(1_i64)
        .bind(i64::from(progress.stars()))
        .bind(i64::from(progress.daily_streak()))
        .bind(progress.last_daily_completion())
        .bind(i64::from(progress.daily_correct()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
