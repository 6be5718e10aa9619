use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::attempt::Attempt;
use crate::model::ids::CategoryId;

/// Longitudinal progress for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProgress {
    category_id: CategoryId,
    best_score: u32,
    attempts: u32,
    last_attempt: Option<DateTime<Utc>>,
    is_completed: bool,
}

impl CategoryProgress {
    /// Progress for a category nobody has attempted yet.
    #[must_use]
    pub fn untouched(category_id: CategoryId) -> Self {
        Self {
            category_id,
            best_score: 0,
            attempts: 0,
            last_attempt: None,
            is_completed: false,
        }
    }

    /// Fold one attempt into this record.
    ///
    /// `is_completed` follows the latest attempt: it is true only while the
    /// most recent score is at or above `mastery_threshold`.
    pub fn apply_attempt(&mut self, attempt: &Attempt, mastery_threshold: u32) {
        self.best_score = self.best_score.max(attempt.score_percentage());
        self.attempts = self.attempts.saturating_add(1);
        self.last_attempt = Some(attempt.ended_at());
        self.is_completed = attempt.passed(mastery_threshold);
    }

    #[must_use]
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub fn last_attempt(&self) -> Option<DateTime<Utc>> {
        self.last_attempt
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }
}

/// Persisted shape of the progress tracker, handed to the key/value store as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub history: Vec<Attempt>,
    pub progress: BTreeMap<CategoryId, CategoryProgress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, AttemptEntry, Difficulty, Question, QuestionId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn attempt(correct: usize, total: usize, minutes_after: i64) -> Attempt {
        let ended = fixed_now() + Duration::minutes(minutes_after);
        let entries = (0..total)
            .map(|i| {
                let question = Question::new(
                    QuestionId::new(format!("q{i}")),
                    "Prompt",
                    vec!["a".into(), "b".into()],
                    0,
                    "",
                    Difficulty::Beginner,
                    "Topic",
                    10,
                )
                .unwrap();
                let selected = usize::from(i >= correct);
                let answer = Answer::for_question(&question, selected, 1, ended);
                AttemptEntry { question, answer }
            })
            .collect();
        Attempt::from_entries(CategoryId::new("stats"), "Statistics", entries, ended, ended)
            .unwrap()
    }

    #[test]
    fn progress_keeps_best_score_and_counts() {
        let mut progress = CategoryProgress::untouched(CategoryId::new("stats"));

        progress.apply_attempt(&attempt(4, 5, 0), 80);
        assert_eq!(progress.best_score(), 80);
        assert!(progress.is_completed());

        let later = attempt(1, 5, 10);
        progress.apply_attempt(&later, 80);
        assert_eq!(progress.best_score(), 80);
        assert_eq!(progress.attempts(), 2);
        assert_eq!(progress.last_attempt(), Some(later.ended_at()));
        assert!(!progress.is_completed());
    }
}
