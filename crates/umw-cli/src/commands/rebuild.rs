use serde::Serialize;
use umw_core::responses::{NormalizeReport, RebuildResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RebuildArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RebuildCommandResponse {
    #[serde(flatten)]
    rebuild: RebuildResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    normalize: Option<NormalizeReport>,
}

/// Handle `umw rebuild`.
pub async fn handle(
    args: &RebuildArgs,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let rebuild = ctx.service.rebuild_graph().await?;
    let normalize = if args.normalize {
        Some(ctx.service.normalize_graph().await?)
    } else {
        None
    };
    output(&RebuildCommandResponse { rebuild, normalize }, flags.format)
}
