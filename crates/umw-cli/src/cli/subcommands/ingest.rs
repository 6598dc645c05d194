use clap::{Args, Subcommand};

/// Ingest subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum IngestCommands {
    /// Ingest species candidate records.
    Species(IngestArgs),
    /// Ingest family profile candidates.
    Family(IngestArgs),
}

#[derive(Clone, Debug, Args)]
pub struct IngestArgs {
    /// `.json` (object or array) or `.jsonl` files.
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Entity display name, used when a candidate carries no name of its own.
    /// Only valid when the files hold a single candidate.
    #[arg(long)]
    pub name: Option<String>,

    /// Taxonomy-registry key (e.g. a GBIF usage key) for a single candidate.
    #[arg(long)]
    pub stable_id: Option<u64>,

    /// Order name passed as an identity hint with every candidate.
    #[arg(long)]
    pub order: Option<String>,

    /// Representative species a family pass was researched from (repeatable).
    #[arg(long = "representative")]
    pub representatives: Vec<String>,

    /// Rebuild the graph once the batch is stored.
    #[arg(long)]
    pub rebuild: bool,
}
