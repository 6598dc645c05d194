use clap::Subcommand;

/// Profile lookup subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProfileCommands {
    /// Show a species profile by key or by any of its names.
    Species { name_or_key: String },
    /// Show a family profile by key or name.
    Family { name_or_key: String },
}
