use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod ui;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("umw error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;

    let command = cli.command;
    let write_lock = if command_requires_write_lock(&command) {
        Some(write_lock::acquire_for_project(&project_root).await?)
    } else {
        None
    };

    // Replay may start from an empty store, so it opens its own service.
    if let cli::Commands::Replay(args) = &command {
        let result = commands::replay::handle(args, &project_root, &config, &flags).await;
        drop(write_lock);
        return result;
    }

    let mut ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize umwelt application context")?;

    let result = commands::dispatch::dispatch(command, &mut ctx, &flags).await;
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("UMWELT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Store-wide rewrites are serialized per project. Ingest relies on
/// optimistic versioning instead.
const fn command_requires_write_lock(command: &cli::Commands) -> bool {
    match command {
        cli::Commands::Rebuild(_) | cli::Commands::Normalize | cli::Commands::Replay(_) => true,
        cli::Commands::Ingest { .. }
        | cli::Commands::Report { .. }
        | cli::Commands::Query { .. }
        | cli::Commands::Profile { .. }
        | cli::Commands::Schema(_) => false,
    }
}
