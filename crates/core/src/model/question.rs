use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 2 options, got {len}")]
    TooFewOptions { len: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("question points must be > 0")]
    ZeroPoints,

    #[error("question topic cannot be empty")]
    EmptyTopic,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Three-level difficulty tier shared by questions and categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }

    /// The next tier up, if any.
    #[must_use]
    pub fn harder(self) -> Option<Self> {
        match self {
            Difficulty::Beginner => Some(Difficulty::Intermediate),
            Difficulty::Intermediate => Some(Difficulty::Advanced),
            Difficulty::Advanced => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Questions are immutable once built; `correct_option_index` always points
/// at one of `options`. Deserialization goes through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option_index: usize,
    explanation: String,
    difficulty: Difficulty,
    topic: String,
    points: u32,
}

/// Wire shape of a question before validation.
#[derive(Deserialize)]
struct QuestionRecord {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    correct_option_index: usize,
    #[serde(default)]
    explanation: String,
    difficulty: Difficulty,
    topic: String,
    points: u32,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.id,
            record.prompt,
            record.options,
            record.correct_option_index,
            record.explanation,
            record.difficulty,
            record.topic,
            record.points,
        )
    }
}

impl Question {
    /// Creates a validated Question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or topic is blank, there are
    /// fewer than two options, an option is blank, the correct index is out of
    /// range, or `points` is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        explanation: impl Into<String>,
        difficulty: Difficulty,
        topic: impl Into<String>,
        points: u32,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_option_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_option_index,
                len: options.len(),
            });
        }
        if points == 0 {
            return Err(QuestionError::ZeroPoints);
        }
        let topic = topic.into().trim().to_owned();
        if topic.is_empty() {
            return Err(QuestionError::EmptyTopic);
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_option_index,
            explanation: explanation.into().trim().to_owned(),
            difficulty,
            topic,
            points,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        self.option(self.correct_option_index).unwrap_or_default()
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn is_correct(&self, selected_option_index: usize) -> bool {
        selected_option_index == self.correct_option_index
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    fn build(options: Vec<String>, correct: usize, points: u32) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new("q1"),
            "What is the median of [1, 2, 3]?",
            options,
            correct,
            "The middle value.",
            Difficulty::Beginner,
            "Descriptive Statistics",
            points,
        )
    }

    #[test]
    fn question_new_happy_path() {
        let q = build(options(4), 2, 10).unwrap();
        assert_eq!(q.options().len(), 4);
        assert_eq!(q.correct_option(), "option 2");
        assert!(q.is_correct(2));
        assert!(!q.is_correct(1));
        assert_eq!(q.topic(), "Descriptive Statistics");
    }

    #[test]
    fn question_rejects_single_option() {
        let err = build(options(1), 0, 10).unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn question_rejects_out_of_range_correct_index() {
        let err = build(options(3), 3, 10).unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn question_rejects_zero_points() {
        let err = build(options(2), 0, 0).unwrap_err();
        assert_eq!(err, QuestionError::ZeroPoints);
    }

    #[test]
    fn question_rejects_blank_option() {
        let err = build(vec!["a".into(), "  ".into()], 0, 5).unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("ADVANCED".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Beginner.harder(), Some(Difficulty::Intermediate));
        assert_eq!(Difficulty::Advanced.harder(), None);
    }
}
