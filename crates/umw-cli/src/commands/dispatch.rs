use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Ingest { action } => commands::ingest::handle(&action, ctx, flags).await,
        Commands::Rebuild(args) => commands::rebuild::handle(&args, ctx, flags).await,
        Commands::Normalize => commands::normalize::handle(ctx, flags).await,
        Commands::Report { action } => commands::report::handle(&action, ctx, flags).await,
        Commands::Query { action } => commands::query::handle(&action, ctx, flags).await,
        Commands::Profile { action } => commands::profile::handle(&action, ctx, flags).await,
        Commands::Schema(_) | Commands::Replay(_) => {
            unreachable!("schema/replay are pre-dispatched in main")
        }
    }
}
