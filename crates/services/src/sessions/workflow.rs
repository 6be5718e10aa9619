use std::sync::Arc;

use chrono::Duration;
use quiz_core::QuestionBank;
use quiz_core::model::{Answer, CategoryId, Question, QuizSettings};

use super::plan::ShuffleMode;
use super::progress::SessionProgress;
use super::service::{AnswerOutcome, QuizSession, SessionState};
use crate::Clock;
use crate::error::{ResultsError, SessionError};
use crate::results::{Results, calculate_results};
use crate::stats::ProgressTracker;

/// Presentation-facing facade over the question bank, the active session and
/// the progress tracker.
///
/// Holds at most one session. All transitions are synchronous; persisting the
/// tracker is left to `ProgressService`.
#[derive(Debug)]
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
    clock: Clock,
    settings: QuizSettings,
    shuffle: ShuffleMode,
    session: Option<QuizSession>,
    tracker: ProgressTracker,
}

impl QuizEngine {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self {
            bank,
            clock: Clock::default(),
            settings: QuizSettings::default(),
            shuffle: ShuffleMode::default(),
            session: None,
            tracker: ProgressTracker::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use `settings` for results and progress thresholds.
    #[must_use]
    pub fn with_settings(mut self, settings: QuizSettings) -> Self {
        self.tracker.set_settings(settings.clone());
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: ShuffleMode) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Resume from a previously loaded tracker. The engine's settings win.
    #[must_use]
    pub fn with_tracker(mut self, mut tracker: ProgressTracker) -> Self {
        tracker.set_settings(self.settings.clone());
        self.tracker = tracker;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Step a fixed clock forward. No effect on the system clock.
    pub fn advance_clock(&mut self, delta: Duration) {
        self.clock.advance(delta);
    }

    #[must_use]
    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::NotStarted, QuizSession::state)
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Start a session over `question_count` questions of a category.
    ///
    /// The count is clamped to the category size. Any session still in
    /// progress is discarded without producing an attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CategoryNotFound` for unknown ids, or
    /// `SessionError::EmptyCategory` if the category has no questions.
    pub fn start_session(
        &mut self,
        category_id: &CategoryId,
        question_count: usize,
    ) -> Result<&QuizSession, SessionError> {
        let Some(category) = self.bank.category(category_id) else {
            tracing::warn!(category = %category_id, "start rejected: unknown category");
            return Err(SessionError::CategoryNotFound(category_id.clone()));
        };

        let started_at = self.clock.now();
        let session = QuizSession::start(category, question_count, self.shuffle, started_at)
            .inspect_err(|err| tracing::warn!(category = %category_id, error = %err, "start rejected"))?;

        if let Some(previous) = self.session.as_ref().filter(|s| !s.is_complete()) {
            tracing::warn!(
                category = %previous.category_id(),
                answered = previous.answers().len(),
                "discarding unfinished session"
            );
        }

        tracing::info!(
            category = %category_id,
            requested = question_count,
            questions = session.total_questions(),
            "session started"
        );
        Ok(self.session.insert(session))
    }

    /// Start a session with the configured default question count.
    ///
    /// # Errors
    ///
    /// See [`QuizEngine::start_session`].
    pub fn start_default_session(
        &mut self,
        category_id: &CategoryId,
    ) -> Result<&QuizSession, SessionError> {
        let count = self.settings.default_question_count();
        self.start_session(category_id, count)
    }

    /// Answer the current question.
    ///
    /// Completing the last question records exactly one attempt in the tracker.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SessionNotActive` when no session is running or
    /// it already completed, plus the per-answer errors of
    /// [`QuizSession::submit_answer`].
    pub fn submit_answer(
        &mut self,
        selected_option_index: usize,
    ) -> Result<AnswerOutcome, SessionError> {
        let answered_at = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            tracing::warn!("answer rejected: no session");
            return Err(SessionError::SessionNotActive);
        };

        let outcome = session
            .submit_answer(selected_option_index, answered_at)
            .inspect_err(|err| tracing::warn!(error = %err, "answer rejected"))?;

        if let Some(attempt) = session.attempt().filter(|_| outcome.is_last_question) {
            tracing::info!(
                category = %attempt.category_id(),
                score = attempt.score_percentage(),
                seconds = attempt.total_seconds(),
                "session completed"
            );
            self.tracker.record_attempt(attempt.clone());
        }

        Ok(outcome)
    }

    /// Restart the current question's answer timer at the clock's time.
    ///
    /// See [`QuizSession::mark_presented`].
    pub fn mark_presented(&mut self) {
        let now = self.clock.now();
        if let Some(session) = self.session.as_mut() {
            session.mark_presented(now);
        }
    }

    /// Move the review pointer. Returns `false` when out of range or no session exists.
    pub fn go_to_question(&mut self, index: usize) -> bool {
        let moved = self
            .session
            .as_mut()
            .is_some_and(|session| session.go_to_question(index));
        tracing::debug!(index, moved, "navigate");
        moved
    }

    /// Drop the current session without recording anything.
    pub fn abandon_session(&mut self) -> Option<QuizSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            tracing::debug!(category = %session.category_id(), "session abandoned");
        }
        session
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.session
            .as_ref()
            .map_or_else(SessionProgress::not_started, QuizSession::progress)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref()?.current_question()
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<&Answer> {
        self.session.as_ref()?.answer_for(index)
    }

    /// Results for the completed session.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::NoSession` before any session starts, otherwise
    /// the errors of [`calculate_results`].
    pub fn results(&self) -> Result<Results, ResultsError> {
        let session = self.session.as_ref().ok_or(ResultsError::NoSession)?;
        calculate_results(session, &self.bank, &self.settings)
    }
}
