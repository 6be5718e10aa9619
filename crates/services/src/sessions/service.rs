use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use quiz_core::model::{Answer, Attempt, AttemptEntry, Category, CategoryId, Question};
use quiz_core::time::elapsed_seconds;

use super::plan::{SessionPlan, SessionPlanner, ShuffleMode};
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz attempt. There is no way back from `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
}

/// What the caller learns after submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub is_last_question: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session for one category.
///
/// Holds a fixed, pre-sampled list of questions and steps through them,
/// appending one answer per question in presentation order. Answers are never
/// retracted; `completed_at` is set when the last question is answered.
pub struct QuizSession {
    category_id: CategoryId,
    category_title: String,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<Answer>,
    started_at: DateTime<Utc>,
    presented_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    attempt: Option<Attempt>,
}

impl QuizSession {
    /// Sample `question_count` questions from `category` and start a session.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCategory` if the category has no questions.
    pub fn start(
        category: &Category,
        question_count: usize,
        shuffle: ShuffleMode,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if category.is_empty() {
            return Err(SessionError::EmptyCategory(category.id().clone()));
        }
        let plan = SessionPlanner::new(category)
            .with_shuffle(shuffle)
            .build(question_count);
        Self::from_plan(category, plan, started_at)
    }

    /// Start a session from an already-built plan.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCategory` if the plan holds no questions.
    pub fn from_plan(
        category: &Category,
        plan: SessionPlan,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if plan.questions.is_empty() {
            return Err(SessionError::EmptyCategory(category.id().clone()));
        }

        Ok(Self {
            category_id: category.id().clone(),
            category_title: category.title().to_owned(),
            answers: Vec::with_capacity(plan.questions.len()),
            questions: plan.questions,
            current_index: 0,
            started_at,
            presented_at: started_at,
            completed_at: None,
            attempt: None,
        })
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
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.answers.len(), self.questions.len())
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// The answer recorded for the question at `index`, if it was answered.
    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&Answer> {
        self.answers.get(index)
    }

    /// Answer the current question and advance.
    ///
    /// On the last question the session completes, the attempt snapshot is
    /// taken and the pointer stays on that question for review. The session
    /// is only changed once every check, including the snapshot, has passed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionNotActive` once the session is completed,
    /// `SessionError::DuplicateAnswer` if the current question was already
    /// answered, `SessionError::AnswerOutOfOrder` if earlier questions are
    /// still unanswered, or `SessionError::InvalidOption` if the selection is
    /// not one of the question's options. `SessionError::Attempt` is returned
    /// if the final snapshot fails validation; the answer is not recorded then.
    pub fn submit_answer(
        &mut self,
        selected_option_index: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionNotActive);
        }

        let index = self.current_index;
        let expected = self.answers.len();
        if index < expected {
            return Err(SessionError::DuplicateAnswer { index });
        }
        if index > expected {
            return Err(SessionError::AnswerOutOfOrder { index, expected });
        }

        let question = self
            .questions
            .get(index)
            .ok_or(SessionError::SessionNotActive)?;
        if selected_option_index >= question.options().len() {
            return Err(SessionError::InvalidOption {
                index: selected_option_index,
                options: question.options().len(),
            });
        }

        // A clock that stepped backwards must not produce an answer before the
        // question was shown, or an attempt that ends before it started.
        let answered_at = answered_at.max(self.presented_at);
        let time_spent = elapsed_seconds(self.presented_at, answered_at);
        let answer = Answer::for_question(question, selected_option_index, time_spent, answered_at);
        let is_correct = answer.is_correct();

        let is_last_question = index + 1 == self.questions.len();
        let attempt = if is_last_question {
            Some(self.snapshot_with(&answer, answered_at)?)
        } else {
            None
        };

        self.answers.push(answer);
        self.presented_at = answered_at;
        if attempt.is_some() {
            self.completed_at = Some(answered_at);
            self.attempt = attempt;
        } else {
            self.current_index += 1;
        }

        tracing::debug!(
            category = %self.category_id,
            index,
            is_correct,
            completed = is_last_question,
            "answer recorded"
        );

        Ok(AnswerOutcome {
            is_correct,
            is_last_question,
        })
    }

    /// Restart the answer timer for the current question.
    ///
    /// Hosts that show feedback between questions call this once the next
    /// question is on screen, so feedback time is not billed to it. Ignored
    /// once the session is complete or when `at` is earlier than the timer.
    pub fn mark_presented(&mut self, at: DateTime<Utc>) {
        if self.is_complete() || at <= self.presented_at {
            return;
        }
        self.presented_at = at;
        tracing::debug!(index = self.current_index, "question presented");
    }

    /// Move the pointer to `index` for review.
    ///
    /// Out-of-range indices are ignored. Returns whether the pointer moved.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        if index >= self.questions.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// The attempt snapshot taken when the last question was answered.
    #[must_use]
    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    fn snapshot_with(&self, last: &Answer, ended_at: DateTime<Utc>) -> Result<Attempt, SessionError> {
        let entries = self
            .questions
            .iter()
            .zip(self.answers.iter().chain(std::iter::once(last)))
            .map(|(question, answer)| AttemptEntry {
                question: question.clone(),
                answer: answer.clone(),
            })
            .collect();

        Ok(Attempt::from_entries(
            self.category_id.clone(),
            self.category_title.clone(),
            entries,
            self.started_at,
            ended_at,
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("category_id", &self.category_id)
            .field("questions_len", &self.questions.len())
            .field("current_index", &self.current_index)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
