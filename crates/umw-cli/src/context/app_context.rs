use std::path::PathBuf;

use anyhow::Context;
use umw_config::UmwConfig;
use umw_db::service::UmwService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: UmwService,
    pub config: UmwConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the configured store under `project_root`.
    pub async fn init(project_root: PathBuf, config: UmwConfig) -> anyhow::Result<Self> {
        let service = UmwService::from_config(&config, &project_root)
            .await
            .context("failed to initialize umw-db service")?;
        tracing::debug!(
            project = %project_root.display(),
            batch = service.batch(),
            trail = service.trail().is_enabled(),
            "application context ready"
        );
        Ok(Self {
            service,
            config,
            project_root,
        })
    }
}
