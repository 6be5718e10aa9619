use std::sync::Arc;

use quiz_core::model::{QuizSettings, QuizSettingsDraft};
use storage::repository::SettingsRepository;

use crate::error::SettingsServiceError;

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    #[must_use]
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Load persisted settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` on storage failures.
    pub async fn load(&self) -> Result<QuizSettings, SettingsServiceError> {
        let settings = self.repo.load_settings().await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsServiceError` if validation fails or persistence fails.
    pub async fn save(&self, draft: QuizSettingsDraft) -> Result<QuizSettings, SettingsServiceError> {
        let settings = draft.validate().inspect_err(|err| {
            tracing::warn!(error = %err, "rejected quiz settings");
        })?;
        self.repo.save_settings(&settings).await?;
        tracing::info!("quiz settings saved");
        Ok(settings)
    }
}
