use std::path::{Path, PathBuf};

use anyhow::Context;
use umw_config::PROJECT_DIR;

/// Walk upwards from `start` until a `.umwelt` directory is found.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(PROJECT_DIR).is_dir() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// `--project` when given (a `.umwelt` directory resolves to its parent),
/// else the nearest ancestor holding `.umwelt`, else the current directory.
/// The store is created on first use, so a fresh directory is a valid root.
pub fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.umwelt' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    Ok(find_project_root(&start).unwrap_or(start))
}
