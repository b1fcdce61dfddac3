use chrono::NaiveDate;
use storage::repository::{ProgressRepository, SettingsRepository, Storage};
use storage::sqlite::SqliteStore;
use tutor_core::model::{NarratorSettingsDraft, Progress, VoicePreference};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 11, d).unwrap()
}

#[tokio::test]
async fn progress_roundtrip_persists_counters() {
    let store = SqliteStore::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert!(store.get_progress().await.unwrap().is_none());

    let progress = Progress::from_persisted(7, 3, Some(day(14)), 2).unwrap();
    store.save_progress(&progress).await.unwrap();

    let fetched = store.get_progress().await.unwrap().expect("saved row");
    assert_eq!(fetched.stars(), 7);
    assert_eq!(fetched.daily_streak(), 3);
    assert_eq!(fetched.last_daily_completion(), Some(day(14)));
    assert_eq!(fetched.daily_correct(), 2);
}

#[tokio::test]
async fn progress_upsert_overwrites_previous_row() {
    let store = SqliteStore::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    let first = Progress::from_persisted(1, 0, None, 0).unwrap();
    store.save_progress(&first).await.unwrap();

    let mut second = first.clone();
    second.award_star();
    for _ in 0..5 {
        second.record_daily_correct(day(15));
    }
    store.save_progress(&second).await.unwrap();

    let fetched = store.get_progress().await.unwrap().expect("saved row");
    assert_eq!(fetched.stars(), 2);
    assert_eq!(fetched.daily_streak(), 1);
    assert_eq!(fetched.last_daily_completion(), Some(day(15)));
}

#[tokio::test]
async fn settings_roundtrip_keeps_credential_and_voice() {
    let store = SqliteStore::connect("sqlite:file:memdb_settings?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("migrate");

    assert!(store.get_settings().await.unwrap().is_none());

    let settings = NarratorSettingsDraft {
        api_key: Some("sk-test".to_string()),
        api_base_url: Some("https://api.example.com/v1".to_string()),
        voice: VoicePreference::Male,
    }
    .validate()
    .unwrap();
    store.save_settings(&settings).await.unwrap();

    let fetched = store.get_settings().await.unwrap().expect("saved row");
    assert_eq!(fetched.api_key(), Some("sk-test"));
    assert_eq!(fetched.api_base_url(), Some("https://api.example.com/v1"));
    assert_eq!(fetched.voice(), VoicePreference::Male);
    assert!(fetched.premium_enabled());
}

#[tokio::test]
async fn migrate_twice_is_a_no_op() {
    let store = SqliteStore::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    store.migrate().await.expect("first migrate");
    store.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_aggregate_wires_sqlite_repositories() {
    let storage = Storage::sqlite("sqlite:file:memdb_aggregate?mode=memory&cache=shared")
        .await
        .expect("open");

    let mut progress = Progress::new();
    progress.award_star();
    storage.progress.save_progress(&progress).await.unwrap();

    let fetched = storage
        .progress
        .get_progress()
        .await
        .unwrap()
        .expect("saved row");
    assert_eq!(fetched.stars(), 1);
    assert!(storage.settings.get_settings().await.unwrap().is_none());
}
