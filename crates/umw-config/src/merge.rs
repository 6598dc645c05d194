//! Merge behaviour and optimistic-concurrency retry policy.

use serde::{Deserialize, Serialize};

fn default_note_separator() -> String {
    " | ".to_string()
}

const fn default_max_attempts() -> u32 {
    4
}

const fn default_base_delay_ms() -> u64 {
    100
}

const fn default_max_delay_ms() -> u64 {
    2_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MergeConfig {
    /// Joins family notes from successive passes.
    #[serde(default = "default_note_separator")]
    pub note_separator: String,

    /// Attempts before a stale-version conflict is surfaced.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            note_separator: default_note_separator(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}
