use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Record of a single answered question.
///
/// `is_correct` is derived from the question when the answer is created and
/// the record never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    question_id: QuestionId,
    selected_option_index: usize,
    is_correct: bool,
    time_spent_seconds: u64,
    answered_at: DateTime<Utc>,
}

impl Answer {
    #[must_use]
    pub fn for_question(
        question: &Question,
        selected_option_index: usize,
        time_spent_seconds: u64,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id: question.id().clone(),
            selected_option_index,
            is_correct: question.is_correct(selected_option_index),
            time_spent_seconds,
            answered_at,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> &QuestionId {
        &self.question_id
    }

    #[must_use]
    pub fn selected_option_index(&self) -> usize {
        self.selected_option_index
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }

    #[must_use]
    pub fn answered_at(&self) -> DateTime<Utc> {
        self.answered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use crate::time::fixed_now;

    #[test]
    fn answer_derives_correctness_from_question() {
        let q = Question::new(
            QuestionId::new("py-1"),
            "Which keyword defines a function in Python?",
            vec!["func".into(), "def".into(), "fn".into()],
            1,
            "`def` starts a function definition.",
            Difficulty::Beginner,
            "Python Basics",
            10,
        )
        .unwrap();

        let right = Answer::for_question(&q, 1, 12, fixed_now());
        let wrong = Answer::for_question(&q, 2, 7, fixed_now());

        assert!(right.is_correct());
        assert!(!wrong.is_correct());
        assert_eq!(right.question_id(), &QuestionId::new("py-1"));
        assert_eq!(wrong.time_spent_seconds(), 7);
    }
}
