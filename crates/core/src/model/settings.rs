use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score (percent) at which a category counts as mastered.
pub const MASTERY_THRESHOLD: u32 = 80;
/// Topic accuracy (percent) at or above which a topic is a strong area.
pub const STRONG_AREA_THRESHOLD: u32 = 80;
/// Topic accuracy (percent) below which a topic is a weak area.
pub const WEAK_AREA_THRESHOLD: u32 = 60;
/// Score (percent) an attempt needs to extend the streak.
pub const STREAK_PASS_THRESHOLD: u32 = 60;
/// Multiplier on a category's estimated time before pace advice kicks in.
pub const SLOW_PACE_FACTOR: f64 = 1.5;
/// Number of most recent attempts kept in history.
pub const HISTORY_LIMIT: usize = 50;
/// Questions per session when the caller does not choose a count.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{field} must be a percentage in 0..=100, got {value}")]
    InvalidPercentage { field: &'static str, value: u32 },

    #[error("weak area threshold must be <= strong area threshold")]
    InvalidAreaBounds,

    #[error("slow pace factor must be finite and > 0")]
    InvalidPaceFactor,

    #[error("history limit must be > 0")]
    InvalidHistoryLimit,

    #[error("default question count must be > 0")]
    InvalidQuestionCount,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Thresholds and limits used by results, recommendations and progress tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizSettingsDraft", into = "QuizSettingsDraft")]
pub struct QuizSettings {
    mastery_threshold: u32,
    strong_area_threshold: u32,
    weak_area_threshold: u32,
    streak_pass_threshold: u32,
    slow_pace_factor: f64,
    history_limit: usize,
    default_question_count: usize,
}

/// Unvalidated settings, as read from storage or built by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettingsDraft {
    pub mastery_threshold: u32,
    pub strong_area_threshold: u32,
    pub weak_area_threshold: u32,
    pub streak_pass_threshold: u32,
    pub slow_pace_factor: f64,
    pub history_limit: usize,
    pub default_question_count: usize,
}

impl Default for QuizSettingsDraft {
    fn default() -> Self {
        Self {
            mastery_threshold: MASTERY_THRESHOLD,
            strong_area_threshold: STRONG_AREA_THRESHOLD,
            weak_area_threshold: WEAK_AREA_THRESHOLD,
            streak_pass_threshold: STREAK_PASS_THRESHOLD,
            slow_pace_factor: SLOW_PACE_FACTOR,
            history_limit: HISTORY_LIMIT,
            default_question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

fn percentage(field: &'static str, value: u32) -> Result<u32, SettingsError> {
    if value > 100 {
        return Err(SettingsError::InvalidPercentage { field, value });
    }
    Ok(value)
}

impl QuizSettingsDraft {
    /// Validate the draft into usable settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a threshold is not a percentage, the weak
    /// threshold exceeds the strong one, the pace factor is not positive, or a
    /// limit is zero.
    pub fn validate(self) -> Result<QuizSettings, SettingsError> {
        let mastery_threshold = percentage("mastery_threshold", self.mastery_threshold)?;
        let strong_area_threshold =
            percentage("strong_area_threshold", self.strong_area_threshold)?;
        let weak_area_threshold = percentage("weak_area_threshold", self.weak_area_threshold)?;
        let streak_pass_threshold =
            percentage("streak_pass_threshold", self.streak_pass_threshold)?;
        if weak_area_threshold > strong_area_threshold {
            return Err(SettingsError::InvalidAreaBounds);
        }
        if !self.slow_pace_factor.is_finite() || self.slow_pace_factor <= 0.0 {
            return Err(SettingsError::InvalidPaceFactor);
        }
        if self.history_limit == 0 {
            return Err(SettingsError::InvalidHistoryLimit);
        }
        if self.default_question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount);
        }

        Ok(QuizSettings {
            mastery_threshold,
            strong_area_threshold,
            weak_area_threshold,
            streak_pass_threshold,
            slow_pace_factor: self.slow_pace_factor,
            history_limit: self.history_limit,
            default_question_count: self.default_question_count,
        })
    }
}

impl TryFrom<QuizSettingsDraft> for QuizSettings {
    type Error = SettingsError;

    fn try_from(draft: QuizSettingsDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<QuizSettings> for QuizSettingsDraft {
    fn from(settings: QuizSettings) -> Self {
        Self {
            mastery_threshold: settings.mastery_threshold,
            strong_area_threshold: settings.strong_area_threshold,
            weak_area_threshold: settings.weak_area_threshold,
            streak_pass_threshold: settings.streak_pass_threshold,
            slow_pace_factor: settings.slow_pace_factor,
            history_limit: settings.history_limit,
            default_question_count: settings.default_question_count,
        }
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            mastery_threshold: MASTERY_THRESHOLD,
            strong_area_threshold: STRONG_AREA_THRESHOLD,
            weak_area_threshold: WEAK_AREA_THRESHOLD,
            streak_pass_threshold: STREAK_PASS_THRESHOLD,
            slow_pace_factor: SLOW_PACE_FACTOR,
            history_limit: HISTORY_LIMIT,
            default_question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl QuizSettings {
    #[must_use]
    pub fn to_draft(&self) -> QuizSettingsDraft {
        self.clone().into()
    }

    // Accessors
    #[must_use]
    pub fn mastery_threshold(&self) -> u32 {
        self.mastery_threshold
    }

    #[must_use]
    pub fn strong_area_threshold(&self) -> u32 {
        self.strong_area_threshold
    }

    #[must_use]
    pub fn weak_area_threshold(&self) -> u32 {
        self.weak_area_threshold
    }

    #[must_use]
    pub fn streak_pass_threshold(&self) -> u32 {
        self.streak_pass_threshold
    }

    #[must_use]
    pub fn slow_pace_factor(&self) -> f64 {
        self.slow_pace_factor
    }

    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    #[must_use]
    pub fn default_question_count(&self) -> usize {
        self.default_question_count
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let settings = QuizSettings::default();
        assert_eq!(settings.mastery_threshold(), 80);
        assert_eq!(settings.strong_area_threshold(), 80);
        assert_eq!(settings.weak_area_threshold(), 60);
        assert_eq!(settings.streak_pass_threshold(), 60);
        assert!((settings.slow_pace_factor() - 1.5).abs() < f64::EPSILON);
        assert_eq!(settings.history_limit(), 50);
        assert_eq!(settings.default_question_count(), 10);
        assert_eq!(QuizSettingsDraft::default().validate().unwrap(), settings);
    }

    #[test]
    fn rejects_out_of_range_percentage() {
        let draft = QuizSettingsDraft {
            mastery_threshold: 120,
            ..QuizSettingsDraft::default()
        };
        assert_eq!(
            draft.validate().unwrap_err(),
            SettingsError::InvalidPercentage {
                field: "mastery_threshold",
                value: 120
            }
        );
    }

    #[test]
    fn rejects_weak_above_strong() {
        let draft = QuizSettingsDraft {
            weak_area_threshold: 90,
            ..QuizSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), SettingsError::InvalidAreaBounds);
    }

    #[test]
    fn rejects_bad_pace_and_limits() {
        let draft = QuizSettingsDraft {
            slow_pace_factor: f64::NAN,
            ..QuizSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), SettingsError::InvalidPaceFactor);

        let draft = QuizSettingsDraft {
            history_limit: 0,
            ..QuizSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), SettingsError::InvalidHistoryLimit);

        let draft = QuizSettingsDraft {
            default_question_count: 0,
            ..QuizSettingsDraft::default()
        };
        assert_eq!(draft.validate().unwrap_err(), SettingsError::InvalidQuestionCount);
    }

    #[test]
    fn deserializing_fills_missing_fields_and_validates() {
        let settings: QuizSettings = serde_json::from_str(r#"{"history_limit": 5}"#).unwrap();
        assert_eq!(settings.history_limit(), 5);
        assert_eq!(settings.mastery_threshold(), 80);

        let bad = serde_json::from_str::<QuizSettings>(r#"{"history_limit": 0}"#);
        assert!(bad.is_err());
    }
}
