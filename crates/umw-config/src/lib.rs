//! # umw-config
//!
//! Layered configuration loading for Umwelt using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`UMWELT_*` prefix, `__` as separator)
//! 2. Project-level `.umwelt/config.toml`
//! 3. User-level `~/.config/umwelt/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `UMWELT_STORAGE__DB_PATH` -> `storage.db_path`,
//! `UMWELT_MERGE__MAX_ATTEMPTS` -> `merge.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use umw_config::UmwConfig;
//!
//! let config = UmwConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.storage.db_path);
//! ```

mod error;
mod general;
mod merge;
mod report;
mod storage;
mod vocabulary;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use merge::MergeConfig;
pub use report::ReportConfig;
pub use storage::StorageConfig;
pub use vocabulary::VocabularyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local configuration directory.
pub const PROJECT_DIR: &str = ".umwelt";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UmwConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl UmwConfig {
    /// Load configuration rooted at the current directory.
    ///
    /// Does NOT call `dotenvy`. Use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_for(Path::new("."))
    }

    /// Load configuration with the project-local file taken from
    /// `{project_root}/.umwelt/config.toml`.
    pub fn load_for(project_root: &Path) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_for(project_root).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the workspace root, then [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the provider chain. Public so tests can add providers on top.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("UMWELT_").split("__"))
    }

    /// Reject values that would make the pipeline misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.merge.max_attempts == 0 {
            return Err(invalid("merge.max_attempts", "must be at least 1"));
        }
        if self.merge.base_delay_ms > self.merge.max_delay_ms {
            return Err(invalid(
                "merge.base_delay_ms",
                "must not exceed merge.max_delay_ms",
            ));
        }
        if !self.report.imbalance_ratio.is_finite() || self.report.imbalance_ratio < 1.0 {
            return Err(invalid(
                "report.imbalance_ratio",
                "must be a finite number >= 1",
            ));
        }
        if self.storage.db_path.trim().is_empty() {
            return Err(invalid("storage.db_path", "must not be empty"));
        }
        if self.general.default_limit == 0 {
            return Err(invalid("general.default_limit", "must be at least 1"));
        }
        if let Some((label, _)) = self
            .vocabulary
            .synonyms
            .iter()
            .find(|(label, target)| label.trim().is_empty() || target.trim().is_empty())
        {
            return Err(invalid(
                "vocabulary.synonyms",
                &format!("entry '{label}' needs a non-empty label and modality"),
            ));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("umwelt").join("config.toml"))
    }

    /// Walks up from `CARGO_MANIFEST_DIR` (if set) looking for `.env`, then
    /// falls back to the current directory. Silently does nothing if none.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
