#![forbid(unsafe_code)]

pub mod error;
pub mod results;
pub mod sessions;
pub mod settings_service;
pub mod stats;

pub use quiz_core::Clock;

pub use error::{ProgressServiceError, ResultsError, SessionError, SettingsServiceError};
pub use results::{
    DifficultyBreakdown, QuestionReview, Recommendation, Results, ScoreSummary, TopicBreakdown,
    calculate_results,
};
pub use sessions::{
    AnswerOutcome, QuizEngine, QuizSession, SessionPlan, SessionPlanner, SessionProgress,
    SessionState, ShuffleMode,
};
pub use settings_service::SettingsService;
pub use stats::{AggregateStats, ProgressService, ProgressTracker, aggregate_stats, compute_streak};
