use serde::{Deserialize, Serialize};

const fn default_limit() -> u32 {
    20
}

/// Settings shared by the read commands.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Rows returned by `umw query` when neither the command nor `--limit`
    /// names a count.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}
