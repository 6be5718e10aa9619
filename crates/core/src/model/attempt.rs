use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::Answer;
use crate::model::ids::{AttemptId, CategoryId};
use crate::model::percent::rounded_percentage;
use crate::model::question::Question;
use crate::time::elapsed_seconds;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,

    #[error("an attempt needs at least one answered question")]
    NoEntries,

    #[error("answer for {answer} does not belong to question {question}")]
    MismatchedAnswer { question: String, answer: String },

    #[error("answer to {question} is graded differently than its question")]
    GradingMismatch { question: String },

    #[error("correct count ({correct}) does not match answers ({derived})")]
    CountMismatch { correct: u32, derived: u32 },

    #[error("score ({score}%) does not match answers ({derived}%)")]
    ScoreMismatch { score: u32, derived: u32 },

    #[error("points {earned}/{max} do not match answers ({derived_earned}/{derived_max})")]
    PointsMismatch {
        earned: u32,
        max: u32,
        derived_earned: u32,
        derived_max: u32,
    },

    #[error("too many questions for a single attempt: {len}")]
    TooManyEntries { len: usize },
}

/// One presented question together with the answer it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptEntry {
    pub question: Question,
    pub answer: Answer,
}

/// Immutable snapshot of a completed quiz session.
///
/// Deserialization goes through [`Attempt::from_persisted`], so stored totals
/// are checked against the entries on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AttemptRecord")]
pub struct Attempt {
    id: AttemptId,
    category_id: CategoryId,
    category_title: String,
    entries: Vec<AttemptEntry>,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    total_seconds: u64,
    score_percentage: u32,
    correct_count: u32,
    points_earned: u32,
    max_points: u32,
}

/// Stored shape of an attempt. `total_seconds` is recomputed, not read.
#[derive(Deserialize)]
struct AttemptRecord {
    id: AttemptId,
    category_id: CategoryId,
    category_title: String,
    entries: Vec<AttemptEntry>,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    score_percentage: u32,
    correct_count: u32,
    points_earned: u32,
    max_points: u32,
}

impl TryFrom<AttemptRecord> for Attempt {
    type Error = AttemptError;

    fn try_from(record: AttemptRecord) -> Result<Self, Self::Error> {
        Attempt::from_persisted(
            record.id,
            record.category_id,
            record.category_title,
            record.entries,
            record.started_at,
            record.ended_at,
            record.score_percentage,
            record.correct_count,
            record.points_earned,
            record.max_points,
        )
    }
}

/// Totals derived from the entries themselves.
struct Totals {
    correct: u32,
    earned: u32,
    max: u32,
    score: u32,
}

impl Totals {
    fn tally(entries: &[AttemptEntry]) -> Result<Self, AttemptError> {
        let mut correct = 0_u32;
        let mut earned = 0_u32;
        let mut max = 0_u32;
        for entry in entries {
            let (question, answer) = (&entry.question, &entry.answer);
            if answer.question_id() != question.id() {
                return Err(AttemptError::MismatchedAnswer {
                    question: question.id().to_string(),
                    answer: answer.question_id().to_string(),
                });
            }
            if answer.is_correct() != question.is_correct(answer.selected_option_index()) {
                return Err(AttemptError::GradingMismatch {
                    question: question.id().to_string(),
                });
            }
            max = max.saturating_add(question.points());
            if answer.is_correct() {
                correct = correct.saturating_add(1);
                earned = earned.saturating_add(question.points());
            }
        }
        let total = u32::try_from(entries.len())
            .map_err(|_| AttemptError::TooManyEntries { len: entries.len() })?;

        Ok(Self {
            correct,
            earned,
            max,
            score: rounded_percentage(u64::from(correct), u64::from(total)),
        })
    }
}

impl Attempt {
    /// Build an attempt from the answered questions of a finished session.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::InvalidTimeRange` if `ended_at` is before `started_at`,
    /// `AttemptError::NoEntries` if nothing was answered, or
    /// `AttemptError::MismatchedAnswer` if an answer references another question.
    pub fn from_entries(
        category_id: CategoryId,
        category_title: impl Into<String>,
        entries: Vec<AttemptEntry>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        let totals = Totals::tally(&entries)?;
        Self::assemble(
            AttemptId::generate(),
            category_id,
            category_title.into(),
            entries,
            started_at,
            ended_at,
            &totals,
        )
    }

    /// Rehydrate an attempt from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if an answer's grading or any stored total
    /// disagrees with the entries.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: AttemptId,
        category_id: CategoryId,
        category_title: impl Into<String>,
        entries: Vec<AttemptEntry>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        score_percentage: u32,
        correct_count: u32,
        points_earned: u32,
        max_points: u32,
    ) -> Result<Self, AttemptError> {
        let totals = Totals::tally(&entries)?;
        if correct_count != totals.correct {
            return Err(AttemptError::CountMismatch {
                correct: correct_count,
                derived: totals.correct,
            });
        }
        if score_percentage != totals.score {
            return Err(AttemptError::ScoreMismatch {
                score: score_percentage,
                derived: totals.score,
            });
        }
        if points_earned != totals.earned || max_points != totals.max {
            return Err(AttemptError::PointsMismatch {
                earned: points_earned,
                max: max_points,
                derived_earned: totals.earned,
                derived_max: totals.max,
            });
        }

        Self::assemble(
            id,
            category_id,
            category_title.into(),
            entries,
            started_at,
            ended_at,
            &totals,
        )
    }

    fn assemble(
        id: AttemptId,
        category_id: CategoryId,
        category_title: String,
        entries: Vec<AttemptEntry>,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        totals: &Totals,
    ) -> Result<Self, AttemptError> {
        if ended_at < started_at {
            return Err(AttemptError::InvalidTimeRange);
        }
        if entries.is_empty() {
            return Err(AttemptError::NoEntries);
        }

        Ok(Self {
            id,
            category_id,
            category_title,
            entries,
            started_at,
            ended_at,
            total_seconds: elapsed_seconds(started_at, ended_at),
            score_percentage: totals.score,
            correct_count: totals.correct,
            points_earned: totals.earned,
            max_points: totals.max,
        })
    }

    #[must_use]
    pub fn id(&self) -> AttemptId {
        self.id
    }

    #[must_use]
    pub fn category_id(&self) -> &CategoryId {
        &self.category_id
    }

    #[must_use]
    pub fn category_title(&self) -> &str {
        &self.category_title
    }

    #[must_use]
    pub fn entries(&self) -> &[AttemptEntry] {
        &self.entries
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    #[must_use]
    pub fn score_percentage(&self) -> u32 {
        self.score_percentage
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }

    #[must_use]
    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    /// True when the score reaches `threshold` percent.
    #[must_use]
    pub fn passed(&self, threshold: u32) -> bool {
        self.score_percentage >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionId};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn entry(id: &str, points: u32, selected: usize) -> AttemptEntry {
        let question = Question::new(
            QuestionId::new(id),
            "Prompt",
            vec!["a".into(), "b".into()],
            0,
            "",
            Difficulty::Intermediate,
            "Topic",
            points,
        )
        .unwrap();
        let answer = Answer::for_question(&question, selected, 5, fixed_now());
        AttemptEntry { question, answer }
    }

    #[test]
    fn attempt_derives_score_and_points() {
        let started = fixed_now();
        let attempt = Attempt::from_entries(
            CategoryId::new("programming"),
            "Programming",
            vec![entry("q1", 10, 0), entry("q2", 15, 1), entry("q3", 20, 0)],
            started,
            started + Duration::seconds(95),
        )
        .unwrap();

        assert_eq!(attempt.correct_count(), 2);
        assert_eq!(attempt.score_percentage(), 67);
        assert_eq!(attempt.points_earned(), 30);
        assert_eq!(attempt.max_points(), 45);
        assert_eq!(attempt.total_seconds(), 95);
        assert!(attempt.passed(60));
        assert!(!attempt.passed(80));
    }

    #[test]
    fn attempt_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = Attempt::from_entries(
            CategoryId::new("x"),
            "X",
            vec![entry("q1", 10, 0)],
            now,
            now - Duration::seconds(1),
        )
        .unwrap_err();
        assert_eq!(err, AttemptError::InvalidTimeRange);
    }

    #[test]
    fn attempt_rejects_empty_entries() {
        let now = fixed_now();
        let err =
            Attempt::from_entries(CategoryId::new("x"), "X", Vec::new(), now, now).unwrap_err();
        assert_eq!(err, AttemptError::NoEntries);
    }

    #[test]
    fn persisted_attempt_checks_counts() {
        let now = fixed_now();
        let err = Attempt::from_persisted(
            AttemptId::generate(),
            CategoryId::new("x"),
            "X",
            vec![entry("q1", 10, 1)],
            now,
            now,
            100,
            1,
            10,
            10,
        )
        .unwrap_err();
        assert_eq!(err, AttemptError::CountMismatch { correct: 1, derived: 0 });
    }

    #[test]
    fn persisted_attempt_checks_points() {
        let now = fixed_now();
        let err = Attempt::from_persisted(
            AttemptId::generate(),
            CategoryId::new("x"),
            "X",
            vec![entry("q1", 10, 0)],
            now,
            now,
            100,
            1,
            9999,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, AttemptError::PointsMismatch { earned: 9999, .. }));
    }

    fn stored_wrong_answer() -> serde_json::Value {
        let now = fixed_now();
        let attempt = Attempt::from_entries(
            CategoryId::new("x"),
            "X",
            vec![entry("q1", 10, 1)],
            now,
            now + Duration::seconds(30),
        )
        .unwrap();
        serde_json::to_value(&attempt).unwrap()
    }

    #[test]
    fn loading_rejects_inflated_totals() {
        let mut json = stored_wrong_answer();
        json["correct_count"] = 7.into();
        json["score_percentage"] = 100.into();
        json["points_earned"] = 9999.into();

        let err = serde_json::from_value::<Attempt>(json).unwrap_err();
        assert!(err.to_string().contains("correct count"), "{err}");
    }

    #[test]
    fn loading_rejects_regraded_answers() {
        let mut json = stored_wrong_answer();
        json["entries"][0]["answer"]["is_correct"] = true.into();
        json["correct_count"] = 1.into();
        json["score_percentage"] = 100.into();
        json["points_earned"] = 10.into();

        let err = serde_json::from_value::<Attempt>(json).unwrap_err();
        assert!(err.to_string().contains("graded differently"), "{err}");
    }

    #[test]
    fn attempt_survives_json_roundtrip() {
        let now = fixed_now();
        let attempt = Attempt::from_entries(
            CategoryId::new("x"),
            "X",
            vec![entry("q1", 10, 0)],
            now,
            now + Duration::seconds(30),
        )
        .unwrap();
        let json = serde_json::to_string(&attempt).unwrap();
        let back: Attempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attempt);
    }
}
