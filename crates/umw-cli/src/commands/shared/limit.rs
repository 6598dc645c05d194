/// Row count for a read command: the command's own option, then `--limit`,
/// then the configured default. A zero count is treated as unset.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, fallback: u32) -> u32 {
    local
        .filter(|n| *n > 0)
        .or_else(|| global.filter(|n| *n > 0))
        .unwrap_or(fallback)
}
