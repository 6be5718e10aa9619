mod answer;
mod attempt;
mod category;
mod ids;
mod percent;
mod progress;
mod question;
pub mod settings;

pub use ids::{AttemptId, CategoryId, ParseIdError, QuestionId};

pub use answer::Answer;
pub use attempt::{Attempt, AttemptEntry, AttemptError};
pub use category::{Category, CategoryError};
pub use percent::rounded_percentage;
pub use progress::{CategoryProgress, ProgressSnapshot};
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionError};
pub use settings::{QuizSettings, QuizSettingsDraft, SettingsError};
