use serde::Serialize;

use quiz_core::model::rounded_percentage;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionProgress {
    pub answered: usize,
    pub total: usize,
    pub percentage: u32,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn new(answered: usize, total: usize) -> Self {
        Self {
            answered,
            total,
            percentage: rounded_percentage(answered as u64, total as u64),
            remaining: total.saturating_sub(answered),
            is_complete: total > 0 && answered == total,
        }
    }

    /// Progress reported before any session exists.
    #[must_use]
    pub fn not_started() -> Self {
        Self::default()
    }
}
