//! Where profiles, the graph, and the ingest trail are kept.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

fn default_db_path() -> String {
    ".umwelt/umwelt.db".to_string()
}

fn default_trail_dir() -> String {
    ".umwelt/trail".to_string()
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// libSQL database file. Relative paths resolve against the project root.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Directory holding `{batch}.jsonl` trail files.
    #[serde(default = "default_trail_dir")]
    pub trail_dir: String,

    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            trail_dir: default_trail_dir(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn db_path_in(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.db_path)
    }

    #[must_use]
    pub fn trail_dir_in(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.trail_dir)
    }
}

fn resolve(root: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}
