use clap::Subcommand;

/// Report subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Claim slots per species, flagged when coverage is lopsided.
    Density {
        /// Max/min ratio above which the store is flagged.
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Node and edge counts with the most-connected senses.
    Summary {
        #[arg(long)]
        top: Option<u32>,
    },
    /// Members per order and canonical modality.
    Matrix {
        #[arg(long)]
        orders: Option<u32>,
    },
}
