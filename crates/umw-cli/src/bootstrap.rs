use std::path::Path;

use anyhow::Context;
use umw_config::UmwConfig;

/// Load `.env` from the project root when present, then the layered config.
pub fn load_config(project_root: &Path) -> anyhow::Result<UmwConfig> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    } else {
        let _ = dotenvy::dotenv();
    }

    UmwConfig::load_for(project_root).context("failed to load umwelt configuration")
}
