//! Platform-specific state directory management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "BATTERIES_STATE_DIR";

/// Manages platform-specific application directories
pub struct StateDir {
    /// Project directories from the directories crate
    project_dirs: Option<ProjectDirs>,
    /// Override directory for testing or custom installations
    override_dir: Option<PathBuf>,
}

impl StateDir {
    /// Create a new `StateDir` instance
    #[must_use]
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("com", "Batteries", "batteries");
        if project_dirs.is_none() {
            warn!("Failed to determine platform-specific directories, will use fallback");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    /// Create a new `StateDir` with an override directory
    #[must_use]
    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            project_dirs: None,
            override_dir: Some(path.into()),
        }
    }

    /// Pick the explicit directory, then `BATTERIES_STATE_DIR`, then the platform default
    #[must_use]
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        match explicit.or_else(|| std::env::var_os(STATE_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => Self::with_override(dir),
            None => Self::new(),
        }
    }

    /// Get the configuration directory
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("config");
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from("./config")
        }
    }

    /// Get the data directory for persistent storage
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("data");
        }

        if let Some(project_dirs) = &self.project_dirs {
            project_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from("./data")
        }
    }

    /// Get the directory for log files
    #[must_use]
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Key-value document holding the stored credential
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir().join("storage.json")
    }

    /// User configuration file, if one was placed in the config directory
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("batteries.toml")
    }

    #[must_use]
    pub fn log_path(&self, component: &str) -> PathBuf {
        self.log_dir().join(format!("{component}.log"))
    }

    /// Create all required directories
    pub async fn create_directories(&self) -> Result<()> {
        for dir in [self.config_dir(), self.data_dir(), self.log_dir()] {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            debug!("Ensured directory exists: {}", dir.display());
        }
        Ok(())
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
