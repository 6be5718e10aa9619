use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::ProgressRepository;

use super::tracker::ProgressTracker;
use crate::error::ProgressServiceError;

/// Loads and saves the progress tracker through a `ProgressRepository`.
///
/// Saving is a separate step from answering questions; hosts may run it in the
/// background after each completed session.
#[derive(Clone)]
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: Arc<dyn ProgressRepository>) -> Self {
        Self { repo }
    }

    /// Load the saved tracker, or an empty one on first run.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn load(&self, settings: QuizSettings) -> Result<ProgressTracker, ProgressServiceError> {
        let tracker = match self.repo.load_progress().await? {
            Some(snapshot) => ProgressTracker::from_snapshot(snapshot, settings),
            None => ProgressTracker::new(settings),
        };
        tracing::info!(attempts = tracker.history().len(), "progress loaded");
        Ok(tracker)
    }

    /// Persist the tracker's current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` on storage failures.
    pub async fn save(&self, tracker: &ProgressTracker) -> Result<(), ProgressServiceError> {
        let snapshot = tracker.snapshot();
        self.repo.save_progress(&snapshot).await?;
        tracing::info!(attempts = snapshot.history.len(), "progress saved");
        Ok(())
    }
}
