use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `umw normalize`.
pub async fn handle(ctx: &mut AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.service.normalize_graph().await?;
    output(&report, flags.format)
}
