use std::path::{Path, PathBuf};

use profilegen_platform::AppPaths;
use profilegen_pwsh::{PowerShellFlags, SearchLocations, SearchRoot};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,

    #[serde(default = "default_true")]
    pub include_user_tools: bool,

    /// Additional `<root>\<version>\pwsh.exe` roots, scanned after the
    /// built-in program directories.
    #[serde(default)]
    pub extra_program_roots: Vec<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
            include_user_tools: true,
            extra_program_roots: Vec::new(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<Self, AppError> {
        Self::load_from(&AppPaths::new()?.settings_file())
    }

    /// Read settings from `path`. A missing file yields the defaults; an
    /// unreadable or malformed one is an error the caller reports once
    /// logging is up.
    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let invalid = |details: String| AppError::InvalidSettings {
            path: path.to_path_buf(),
            details,
        };

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(invalid(e.to_string())),
        };
        serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    pub fn apply_to(&self, locations: SearchLocations) -> SearchLocations {
        let locations = self
            .extra_program_roots
            .iter()
            .fold(locations, |locations, root| {
                locations.with_program_root(SearchRoot::new(root.clone(), PowerShellFlags::NONE))
            });

        if self.include_user_tools {
            locations
        } else {
            locations.without_user_tools()
        }
    }
}
