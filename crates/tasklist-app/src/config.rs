use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tasklist_store::{DEFAULT_KEY, validate_key};

const CONFIG_DIR: &str = ".tasklist";
const CONFIG_FILE: &str = "config.toml";

/// Top-level project configuration loaded from `.tasklist/config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Where and under which key the task list is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ProjectConfig {
    /// Load configuration from `workdir`, falling back to defaults when no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed, or validated.
    pub fn from_workdir(workdir: impl AsRef<Path>) -> Result<Self> {
        let config_path = Self::path_in(workdir);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;
        Ok(config)
    }

    /// Location of the configuration file under `workdir`.
    pub fn path_in(workdir: impl AsRef<Path>) -> PathBuf {
        workdir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE)
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

/// Storage configuration block.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_key")]
    key: String,
    #[serde(default)]
    data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            data_dir: None,
        }
    }
}

fn default_key() -> String {
    DEFAULT_KEY.to_owned()
}

impl StorageConfig {
    /// Key the task list is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Explicit data directory, if configured.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            bail!("storage key must not be empty");
        }
        validate_key(&self.key)?;
        if let Some(dir) = &self.data_dir
            && dir.as_os_str().is_empty()
        {
            bail!("storage data_dir must not be empty");
        }
        Ok(())
    }
}
