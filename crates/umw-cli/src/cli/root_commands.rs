use clap::{Args, Subcommand};

use crate::cli::subcommands::{IngestCommands, ProfileCommands, QueryCommands, ReportCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Validate, normalize, and merge candidate records.
    Ingest {
        #[command(subcommand)]
        action: IngestCommands,
    },
    /// Rebuild the modality graph from stored profiles.
    Rebuild(RebuildArgs),
    /// Collapse synonym modality nodes in the stored graph.
    Normalize,
    /// Diagnostic reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Query the stored graph.
    Query {
        #[command(subcommand)]
        action: QueryCommands,
    },
    /// Show a stored profile.
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Print registered JSON schemas.
    Schema(SchemaArgs),
    /// Rebuild the profile store from the ingest trail.
    Replay(ReplayArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RebuildArgs {
    /// Run graph normalization after the rebuild.
    #[arg(long)]
    pub normalize: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name. Lists the registered names when omitted.
    pub name: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ReplayArgs {
    /// Trail directory (defaults to the configured one).
    #[arg(long)]
    pub trail_dir: Option<String>,

    /// Reject trail payloads that fail the ingest payload schema.
    #[arg(long)]
    pub strict: bool,

    /// Count trail files and operations without touching the store.
    #[arg(long)]
    pub dry_run: bool,

    /// Replay onto the existing store instead of starting from an empty one.
    #[arg(long)]
    pub keep_store: bool,
}
