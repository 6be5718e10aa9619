use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, rng};

use quiz_core::model::{Category, Question};

/// How questions are ordered when a session is planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShuffleMode {
    /// Keep the bank order and take the first questions.
    InOrder,
    /// Shuffle with the thread-local generator.
    #[default]
    Random,
    /// Shuffle with a seeded generator, for reproducible sessions.
    Seeded(u64),
}

/// Selection result for a session build, in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
}

/// Clamp a requested question count to `[1, available]`.
///
/// `available` must be non-zero; callers reject empty categories first.
#[must_use]
pub fn clamp_question_count(requested: usize, available: usize) -> usize {
    requested.clamp(1, available.max(1))
}

/// Samples questions from a category without replacement.
pub struct SessionPlanner<'a> {
    category: &'a Category,
    shuffle: ShuffleMode,
}

impl<'a> SessionPlanner<'a> {
    #[must_use]
    pub fn new(category: &'a Category) -> Self {
        Self {
            category,
            shuffle: ShuffleMode::default(),
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Pick `question_count` questions (clamped to the category size).
    ///
    /// The returned order is the presentation order for the whole session.
    #[must_use]
    pub fn build(self, question_count: usize) -> SessionPlan {
        let take = clamp_question_count(question_count, self.category.question_count());
        let mut candidates: Vec<Question> = self.category.questions().to_vec();

        match self.shuffle {
            ShuffleMode::InOrder => {}
            ShuffleMode::Random => candidates.shuffle(&mut rng()),
            ShuffleMode::Seeded(seed) => candidates.shuffle(&mut StdRng::seed_from_u64(seed)),
        }
        candidates.truncate(take);

        SessionPlan {
            questions: candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CategoryId, Difficulty, QuestionId};
    use std::collections::HashSet;

    fn build_category(n: usize) -> Category {
        let questions = (0..n)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q{i}")),
                    format!("Question {i}"),
                    vec!["a".into(), "b".into()],
                    0,
                    "",
                    Difficulty::Beginner,
                    "Topic",
                    10,
                )
                .unwrap()
            })
            .collect();
        Category::new(
            CategoryId::new("test"),
            "Test",
            "",
            Difficulty::Beginner,
            5,
            Vec::new(),
            questions,
        )
        .unwrap()
    }

    #[test]
    fn clamps_requested_count() {
        assert_eq!(clamp_question_count(0, 5), 1);
        assert_eq!(clamp_question_count(3, 5), 3);
        assert_eq!(clamp_question_count(99, 5), 5);
    }

    #[test]
    fn in_order_takes_leading_questions() {
        let category = build_category(5);
        let plan = SessionPlanner::new(&category)
            .with_shuffle(ShuffleMode::InOrder)
            .build(3);
        let ids: Vec<_> = plan.questions.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn sampling_never_repeats_questions() {
        let category = build_category(8);
        let plan = SessionPlanner::new(&category).build(8);
        let unique: HashSet<_> = plan.questions.iter().map(|q| q.id().clone()).collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn seeded_plans_are_reproducible() {
        let category = build_category(10);
        let first = SessionPlanner::new(&category)
            .with_shuffle(ShuffleMode::Seeded(7))
            .build(4);
        let second = SessionPlanner::new(&category)
            .with_shuffle(ShuffleMode::Seeded(7))
            .build(4);
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_request_is_clamped() {
        let category = build_category(2);
        let plan = SessionPlanner::new(&category).build(10);
        let ids: Vec<_> = plan.questions.iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"q0") && ids.contains(&"q1"));
    }
}
