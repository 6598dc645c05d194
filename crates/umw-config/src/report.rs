//! Thresholds and sizes for diagnostic reports.

use serde::{Deserialize, Serialize};

const fn default_imbalance_ratio() -> f64 {
    5.0
}

const fn default_top_modalities() -> u32 {
    10
}

const fn default_matrix_orders() -> u32 {
    15
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Claim density `max / min` above which the report is flagged.
    #[serde(default = "default_imbalance_ratio")]
    pub imbalance_ratio: f64,

    /// Number of senses listed in the graph summary.
    #[serde(default = "default_top_modalities")]
    pub top_modalities: u32,

    /// Number of orders shown in the order/modality matrix.
    #[serde(default = "default_matrix_orders")]
    pub matrix_orders: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            imbalance_ratio: default_imbalance_ratio(),
            top_modalities: default_top_modalities(),
            matrix_orders: default_matrix_orders(),
        }
    }
}
