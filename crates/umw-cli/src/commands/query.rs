use umw_core::enums::NodeKind;
use umw_db::repos::graph::EdgeFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{EdgesArgs, QueryCommands};
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::{parse_enum, parse_modality, parse_relationship};
use crate::context::AppContext;
use crate::output::output;

/// Handle `umw query`.
pub async fn handle(
    action: &QueryCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        QueryCommands::Edges(args) => {
            let filter = edge_filter(args, effective_limit(None, flags.limit, ctx.config.general.default_limit))?;
            let edges = ctx.service.query_edges(&filter).await?;
            output(&edges, flags.format)
        }
        QueryCommands::Orders { modality } => {
            let domain = parse_modality(modality, &ctx.service)?;
            let mut orders = ctx.service.orders_with_modality(domain).await?;
            if let Some(limit) = flags.limit {
                orders.truncate(usize::try_from(limit)?);
            }
            output(&orders, flags.format)
        }
    }
}

fn edge_filter(args: &EdgesArgs, limit: u32) -> anyhow::Result<EdgeFilter> {
    let kind = |raw: &Option<String>, field: &str| -> anyhow::Result<Option<NodeKind>> {
        raw.as_deref().map(|value| parse_enum(value, field)).transpose()
    };
    Ok(EdgeFilter {
        relationship: args.relationship.as_deref().map(parse_relationship).transpose()?,
        source_id: args.source.clone(),
        target_id: args.target.clone(),
        source_kind: kind(&args.source_kind, "source kind")?,
        target_kind: kind(&args.target_kind, "target kind")?,
        limit: Some(limit),
    })
}
