mod candidates;

use serde::Serialize;
use umw_core::enums::EntityKind;
use umw_core::identity::IdentityHint;
use umw_core::responses::{BatchReport, RebuildResponse};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{IngestArgs, IngestCommands};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct IngestCommandResponse {
    #[serde(flatten)]
    report: BatchReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    rebuild: Option<RebuildResponse>,
}

/// Handle `umw ingest`.
pub async fn handle(
    action: &IngestCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let (kind, args) = match action {
        IngestCommands::Species(args) => (EntityKind::Species, args),
        IngestCommands::Family(args) => (EntityKind::Family, args),
    };
    run(kind, args, ctx, flags).await
}

async fn run(
    kind: EntityKind,
    args: &IngestArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let hint = command_line_hint(args);

    let mut loaded = Vec::new();
    for path in &args.paths {
        loaded.extend(candidates::load(path.as_ref(), &hint)?);
    }
    if (args.name.is_some() || args.stable_id.is_some()) && loaded.len() > 1 {
        anyhow::bail!(
            "ingest: --name and --stable-id describe one entity, but {} candidates were loaded",
            loaded.len()
        );
    }
    tracing::info!(%kind, candidates = loaded.len(), files = args.paths.len(), "ingesting batch");

    let report = ctx.service.ingest_batch(kind, &loaded).await?;
    let rebuild = if args.rebuild {
        Some(ctx.service.rebuild_graph().await?)
    } else {
        None
    };

    output(&IngestCommandResponse { report, rebuild }, flags.format)
}

fn command_line_hint(args: &IngestArgs) -> IdentityHint {
    let mut hint = IdentityHint::named(args.name.clone().unwrap_or_default())
        .with_representatives(args.representatives.iter().cloned());
    hint.stable_id = args.stable_id;
    if let Some(order) = &args.order {
        hint = hint.with_order(order);
    }
    hint
}
