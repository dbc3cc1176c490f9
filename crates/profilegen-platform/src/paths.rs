use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR_NAME: &str = "profilegen";
const SETTINGS_FILE_NAME: &str = "settings.json";
const LOG_FILE_NAME: &str = "debug.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AppPathsError {
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,
    #[error("Could not determine data directory")]
    DataDirUnavailable,
}

/// Where profilegen keeps its settings file and debug log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Per-user locations from the platform's known folders.
    ///
    /// # Errors
    /// Returns an error when the platform has no config or data directory
    /// for the current user.
    pub fn new() -> Result<Self, AppPathsError> {
        let config_base = dirs::config_dir().ok_or(AppPathsError::ConfigDirUnavailable)?;
        let data_base = dirs::data_dir().ok_or(AppPathsError::DataDirUnavailable)?;
        Ok(Self::under(&config_base, &data_base))
    }

    #[must_use]
    pub fn under(config_base: &Path, data_base: &Path) -> Self {
        Self {
            config_dir: config_base.join(APP_DIR_NAME),
            data_dir: data_base.join(APP_DIR_NAME),
        }
    }

    #[must_use]
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    #[must_use]
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
