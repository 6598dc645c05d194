use clap::{Args, Subcommand};

/// Graph query subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum QueryCommands {
    /// Stored edges matching the given filters.
    Edges(EdgesArgs),
    /// Orders whose members have a modality, by member count.
    Orders {
        /// Modality name or synonym, e.g. `Electroreception` or `vision`.
        modality: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct EdgesArgs {
    /// MEMBER_OF, HAS_SENSE or INSTANCE_OF (any case, `-` or `_`).
    #[arg(long)]
    pub relationship: Option<String>,

    /// Source node id, e.g. `species:Tyto alba`.
    #[arg(long)]
    pub source: Option<String>,

    /// Target node id.
    #[arg(long)]
    pub target: Option<String>,

    #[arg(long)]
    pub source_kind: Option<String>,

    #[arg(long)]
    pub target_kind: Option<String>,
}
