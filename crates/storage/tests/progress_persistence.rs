use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{
    Answer, Attempt, AttemptEntry, CategoryId, CategoryProgress, Difficulty, ProgressSnapshot,
    Question, QuestionId,
};
use quiz_core::time::fixed_now;
use storage::repository::{InMemoryStore, KeyValueStore, PROGRESS_KEY, Storage, StorageError};

fn build_attempt() -> Attempt {
    let now = fixed_now();
    let question = Question::new(
        QuestionId::new("stats-mean"),
        "What is the mean of 2, 4, 6 and 8?",
        vec!["4".into(), "5".into(), "6".into()],
        1,
        "Sum divided by count.",
        Difficulty::Beginner,
        "Descriptive Statistics",
        10,
    )
    .unwrap();
    let answer = Answer::for_question(&question, 1, 14, now + Duration::seconds(14));
    Attempt::from_entries(
        CategoryId::new("statistics"),
        "Statistics",
        vec![AttemptEntry { question, answer }],
        now,
        now + Duration::seconds(14),
    )
    .unwrap()
}

#[tokio::test]
async fn progress_snapshot_persists_through_shared_store() {
    let store = Arc::new(InMemoryStore::new());
    let storage = Storage::from_store(store.clone());

    let attempt = build_attempt();
    let mut progress = CategoryProgress::untouched(attempt.category_id().clone());
    progress.apply_attempt(&attempt, 80);

    let mut snapshot = ProgressSnapshot::default();
    snapshot
        .progress
        .insert(attempt.category_id().clone(), progress);
    snapshot.history.push(attempt);

    storage.progress.save_progress(&snapshot).await.unwrap();

    let raw = store.get(PROGRESS_KEY).await.unwrap().expect("stored");
    assert!(raw.contains("\"statistics\""));

    let reopened = Storage::from_store(store);
    let loaded = reopened.progress.load_progress().await.unwrap().unwrap();
    assert_eq!(loaded, snapshot);
    assert_eq!(loaded.history[0].score_percentage(), 100);
}

#[tokio::test]
async fn missing_snapshot_loads_as_none() {
    let storage = Storage::in_memory();
    assert!(storage.progress.load_progress().await.unwrap().is_none());
}

#[tokio::test]
async fn tampered_history_fails_to_load() {
    let store = Arc::new(InMemoryStore::new());
    let storage = Storage::from_store(store.clone());

    let mut snapshot = ProgressSnapshot::default();
    snapshot.history.push(build_attempt());
    storage.progress.save_progress(&snapshot).await.unwrap();

    let raw = store.get(PROGRESS_KEY).await.unwrap().expect("stored");
    let mut json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    json["history"][0]["points_earned"] = 9999.into();
    store.set(PROGRESS_KEY, json.to_string()).await.unwrap();

    let err = storage.progress.load_progress().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)));
}
