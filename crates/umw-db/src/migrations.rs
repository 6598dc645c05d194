//! Schema setup, run every time a database is opened.

use crate::UmwDb;
use crate::error::DatabaseError;

/// Profile tables, the folded-name index, and the graph tables. Every
/// statement is `IF NOT EXISTS`, so re-running is a no-op.
const SCHEMA: &[(&str, &str)] = &[("001_initial", include_str!("../migrations/001_initial.sql"))];

impl UmwDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in SCHEMA {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
        }
        tracing::debug!(migrations = SCHEMA.len(), "schema up to date");
        Ok(())
    }
}
