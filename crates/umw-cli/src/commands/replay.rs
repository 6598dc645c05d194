use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use umw_config::UmwConfig;
use umw_db::service::UmwService;
use umw_db::trail::replayer::TrailReplayer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReplayArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ReplayDryRunResponse {
    dry_run: bool,
    strict: bool,
    trail_dir: String,
    trail_files: usize,
    operations_detected: usize,
}

/// Handle `umw replay`. Unless `--keep-store` is given the database files are
/// removed first, so the store ends up exactly as the trail describes it.
pub async fn handle(
    args: &ReplayArgs,
    project_root: &Path,
    config: &UmwConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let trail_dir = args
        .trail_dir
        .as_ref()
        .map_or_else(|| config.storage.trail_dir_in(project_root), PathBuf::from);
    if !trail_dir.is_dir() {
        anyhow::bail!("replay: trail directory {} does not exist", trail_dir.display());
    }

    if args.dry_run {
        let (trail_files, operations_detected) = count_trail_files_and_ops(&trail_dir)?;
        return output(
            &ReplayDryRunResponse {
                dry_run: true,
                strict: args.strict,
                trail_dir: trail_dir.to_string_lossy().to_string(),
                trail_files,
                operations_detected,
            },
            flags.format,
        );
    }

    if !args.keep_store {
        let db_path = config.storage.db_path_in(project_root);
        remove_if_exists(&db_path)?;
        remove_if_exists(&PathBuf::from(format!("{}-wal", db_path.to_string_lossy())))?;
        remove_if_exists(&PathBuf::from(format!("{}-shm", db_path.to_string_lossy())))?;
        tracing::info!(db = %db_path.display(), "store removed before replay");
    }

    let mut service = UmwService::from_config(config, project_root)
        .await
        .context("replay: failed to initialize umw-db service")?;

    let response = TrailReplayer::replay(&mut service, &trail_dir, args.strict)
        .await
        .context("replay: failed to replay trail files")?;

    output(&response, flags.format)
}

fn count_trail_files_and_ops(trail_dir: &Path) -> anyhow::Result<(usize, usize)> {
    let mut files = 0usize;
    let mut ops = 0usize;
    for entry in std::fs::read_dir(trail_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|v| v.to_str()) != Some("jsonl") {
            continue;
        }
        files += 1;
        let content = std::fs::read_to_string(path)?;
        ops += content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();
    }
    Ok((files, ops))
}

fn remove_if_exists(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("replay: failed to remove {}", path.display()))?;
    }
    Ok(())
}
