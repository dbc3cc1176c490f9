use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Paths(#[from] profilegen_platform::AppPathsError),

    #[error("Settings file already exists: {}", .0.display())]
    SettingsExist(std::path::PathBuf),

    #[error("Invalid settings file {}: {details}", path.display())]
    InvalidSettings {
        path: std::path::PathBuf,
        details: String,
    },

    #[error(transparent)]
    Match(#[from] profilegen_model::ProfileMatchError),
}
