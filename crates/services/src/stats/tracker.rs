use std::collections::BTreeMap;

use quiz_core::model::{Attempt, CategoryId, CategoryProgress, ProgressSnapshot, QuizSettings};

use super::aggregate::{AggregateStats, aggregate_stats, compute_streak};

/// Append-only attempt history plus per-category progress.
///
/// History is bounded by `QuizSettings::history_limit`; the oldest attempts
/// are dropped first. Category progress keeps counting past the bound.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    settings: QuizSettings,
    history: Vec<Attempt>,
    progress: BTreeMap<CategoryId, CategoryProgress>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(QuizSettings::default())
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            settings,
            history: Vec::new(),
            progress: BTreeMap::new(),
        }
    }

    /// Restore a tracker from a persisted snapshot.
    ///
    /// A snapshot saved under a larger history limit is trimmed on load.
    #[must_use]
    pub fn from_snapshot(snapshot: ProgressSnapshot, settings: QuizSettings) -> Self {
        let mut tracker = Self {
            settings,
            history: snapshot.history,
            progress: snapshot.progress,
        };
        tracker.trim_history();
        tracker
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            history: self.history.clone(),
            progress: self.progress.clone(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// Swap thresholds. Existing progress records are left as they were computed.
    pub fn set_settings(&mut self, settings: QuizSettings) {
        self.settings = settings;
        self.trim_history();
    }

    /// Append an attempt and fold it into its category's progress.
    pub fn record_attempt(&mut self, attempt: Attempt) -> &CategoryProgress {
        let category_id = attempt.category_id().clone();
        let mastery = self.settings.mastery_threshold();

        let entry = self
            .progress
            .entry(category_id.clone())
            .or_insert_with(|| CategoryProgress::untouched(category_id));
        entry.apply_attempt(&attempt, mastery);

        tracing::info!(
            category = %attempt.category_id(),
            score = attempt.score_percentage(),
            attempts = entry.attempts(),
            completed = entry.is_completed(),
            "attempt recorded"
        );

        let key = attempt.category_id().clone();
        self.history.push(attempt);
        self.trim_history();

        // The entry was inserted above.
        &self.progress[&key]
    }

    fn trim_history(&mut self) {
        let limit = self.settings.history_limit();
        if self.history.len() > limit {
            let dropped = self.history.len() - limit;
            self.history.drain(..dropped);
            tracing::debug!(dropped, limit, "trimmed attempt history");
        }
    }

    /// Attempts in the order they were recorded, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    /// Up to `limit` attempts, most recent first.
    #[must_use]
    pub fn recent_attempts(&self, limit: usize) -> Vec<&Attempt> {
        self.history.iter().rev().take(limit).collect()
    }

    #[must_use]
    pub fn category_progress(&self, category_id: &CategoryId) -> Option<&CategoryProgress> {
        self.progress.get(category_id)
    }

    /// Progress for every category with at least one attempt, ordered by id.
    pub fn all_progress(&self) -> impl Iterator<Item = &CategoryProgress> {
        self.progress.values()
    }

    /// Current passing streak under the configured threshold.
    #[must_use]
    pub fn streak(&self) -> usize {
        compute_streak(&self.history, self.settings.streak_pass_threshold())
    }

    #[must_use]
    pub fn stats(&self) -> AggregateStats {
        aggregate_stats(&self.history)
    }
}
