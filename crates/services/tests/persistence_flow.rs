use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use quiz_core::catalog::builtin_bank;
use quiz_core::model::{CategoryId, QuizSettings, QuizSettingsDraft};
use quiz_core::time::fixed_now;
use services::{
    Clock, ProgressService, ProgressServiceError, QuizEngine, SettingsService, ShuffleMode,
};
use storage::repository::{
    InMemoryStore, KeyValueStore, PROGRESS_KEY, Storage, StorageError,
};

fn engine(settings: QuizSettings) -> QuizEngine {
    QuizEngine::new(Arc::new(builtin_bank().unwrap()))
        .with_clock(Clock::fixed(fixed_now()))
        .with_shuffle(ShuffleMode::InOrder)
        .with_settings(settings)
}

fn finish_session(engine: &mut QuizEngine, category: &str, picks: &[usize]) {
    engine
        .start_session(&CategoryId::new(category), picks.len())
        .unwrap();
    for &pick in picks {
        engine.advance_clock(Duration::seconds(15));
        engine.submit_answer(pick).unwrap();
    }
}

#[tokio::test]
async fn completed_sessions_survive_a_reload() {
    let store = Arc::new(InMemoryStore::new());
    let storage = Storage::from_store(store.clone());
    let progress = ProgressService::new(storage.progress.clone());

    let mut engine = engine(QuizSettings::default());
    finish_session(&mut engine, "statistics", &[1, 1, 1]);
    finish_session(&mut engine, "programming", &[0, 2]);
    progress.save(engine.tracker()).await.unwrap();

    let raw = store.get(PROGRESS_KEY).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["history"].as_array().unwrap().len(), 2);

    let reloaded = progress.load(QuizSettings::default()).await.unwrap();
    let resumed = QuizEngine::new(Arc::new(builtin_bank().unwrap())).with_tracker(reloaded);
    assert_eq!(resumed.tracker().history().len(), 2);
    assert_eq!(resumed.tracker().streak(), 2);
    let stats = resumed
        .tracker()
        .category_progress(&CategoryId::new("statistics"))
        .unwrap();
    assert_eq!(stats.best_score(), 100);
    assert!(stats.is_completed());
}

#[tokio::test]
async fn settings_drive_the_history_bound() {
    let storage = Storage::in_memory();
    let settings = SettingsService::new(storage.settings.clone())
        .save(QuizSettingsDraft {
            history_limit: 1,
            ..QuizSettingsDraft::default()
        })
        .await
        .unwrap();

    let mut engine = engine(settings);
    finish_session(&mut engine, "statistics", &[0]);
    finish_session(&mut engine, "statistics", &[1]);

    assert_eq!(engine.tracker().history().len(), 1);
    assert_eq!(engine.tracker().history()[0].score_percentage(), 100);
    let progress = engine
        .tracker()
        .category_progress(&CategoryId::new("statistics"))
        .unwrap();
    assert_eq!(progress.attempts(), 2);
}

struct OfflineStore;

#[async_trait]
impl KeyValueStore for OfflineStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn storage_failures_do_not_touch_the_session() {
    let storage = Storage::from_store(Arc::new(OfflineStore));
    let progress = ProgressService::new(storage.progress);

    let mut engine = engine(QuizSettings::default());
    finish_session(&mut engine, "machine-learning", &[1, 1]);

    let err = progress.save(engine.tracker()).await.unwrap_err();
    assert!(matches!(
        err,
        ProgressServiceError::Storage(StorageError::Connection(_))
    ));
    assert_eq!(engine.tracker().history().len(), 1);
    assert!(engine.results().is_ok());
}
