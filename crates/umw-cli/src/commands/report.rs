use crate::cli::GlobalFlags;
use crate::cli::subcommands::ReportCommands;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `umw report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let report = &ctx.config.report;
    match action {
        ReportCommands::Density { threshold } => {
            let threshold = threshold.unwrap_or(report.imbalance_ratio);
            if !threshold.is_finite() || threshold < 1.0 {
                anyhow::bail!("invalid --threshold {threshold}: must be a finite number >= 1");
            }
            let mut density = ctx.service.claim_density(threshold).await?;
            if let Some(limit) = flags.limit {
                density.rows.truncate(usize::try_from(limit)?);
            }
            output(&density, flags.format)
        }
        ReportCommands::Summary { top } => {
            let top = effective_limit(*top, flags.limit, report.top_modalities);
            let summary = ctx.service.graph_summary(usize::try_from(top)?).await?;
            output(&summary, flags.format)
        }
        ReportCommands::Matrix { orders } => {
            let orders = effective_limit(*orders, flags.limit, report.matrix_orders);
            let matrix = ctx
                .service
                .order_modality_matrix(usize::try_from(orders)?)
                .await?;
            output(&matrix, flags.format)
        }
    }
}
