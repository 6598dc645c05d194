mod ingest;
mod profile;
mod query;
mod report;

pub use ingest::{IngestArgs, IngestCommands};
pub use profile::ProfileCommands;
pub use query::{EdgesArgs, QueryCommands};
pub use report::ReportCommands;
