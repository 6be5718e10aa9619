use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

use crate::model::ids::{CategoryId, QuestionId};
use crate::model::question::{Difficulty, Question};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("category title cannot be empty")]
    EmptyTitle,

    #[error("estimated time must be > 0 minutes")]
    InvalidEstimatedTime,

    #[error("duplicate question id in category: {0}")]
    DuplicateQuestion(QuestionId),
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// A named, fixed collection of questions sharing a topic area and difficulty tier.
///
/// Categories are owned by the question bank and never mutated at runtime.
/// A category may be announced before its questions are authored, so an empty
/// question list is representable; sessions refuse to start on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    id: CategoryId,
    title: String,
    description: String,
    difficulty: Difficulty,
    estimated_minutes: u32,
    topics: BTreeSet<String>,
    questions: Vec<Question>,
}

impl Category {
    /// Creates a new Category.
    ///
    /// `topics` is merged with the topics of the given questions.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyTitle` if the title is blank,
    /// `CategoryError::InvalidEstimatedTime` if `estimated_minutes` is zero, or
    /// `CategoryError::DuplicateQuestion` if two questions share an id.
    pub fn new(
        id: CategoryId,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        estimated_minutes: u32,
        topics: impl IntoIterator<Item = String>,
        questions: Vec<Question>,
    ) -> Result<Self, CategoryError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CategoryError::EmptyTitle);
        }
        if estimated_minutes == 0 {
            return Err(CategoryError::InvalidEstimatedTime);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(CategoryError::DuplicateQuestion(question.id().clone()));
            }
        }

        let mut topics: BTreeSet<String> = topics
            .into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect();
        topics.extend(questions.iter().map(|q| q.topic().to_owned()));

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: description.into().trim().to_owned(),
            difficulty,
            estimated_minutes,
            topics,
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn estimated_minutes(&self) -> u32 {
        self.estimated_minutes
    }

    #[must_use]
    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
