mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionPlan, SessionPlanner, ShuffleMode, clamp_question_count};
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QuizSession, SessionState};
pub use workflow::QuizEngine;
