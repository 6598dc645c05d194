//! # umw-db
//!
//! libSQL storage for Umwelt.
//!
//! Holds the species and family profiles (the source of truth), a folded-name
//! index used for identity resolution, and the derived graph. The ingest
//! pipeline validates, normalizes, and merges candidate records into stored
//! profiles under optimistic versioning, and every accepted ingest is appended
//! to a replayable JSONL trail.

pub mod error;
pub mod helpers;
mod migrations;
pub mod pipeline;
pub mod repos;
pub mod retry;
pub mod service;
pub mod trail;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Database handle wrapping a libSQL database and its connection.
pub struct UmwDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl UmwDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let umw_db = Self { db, conn };
        umw_db.run_migrations().await?;
        Ok(umw_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> UmwDb {
        UmwDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "species_profiles",
            "family_profiles",
            "profile_names",
            "graph_nodes",
            "graph_edges",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn edges_require_existing_nodes() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO graph_edges (source_id, target_id, relationship) VALUES ('species:A', 'modality:B', 'HAS_SENSE')",
                (),
            )
            .await;
        assert!(result.is_err(), "foreign keys should reject a dangling edge");
    }

    #[tokio::test]
    async fn profile_key_is_unique() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO species_profiles (key, name, body) VALUES ('sp-gbif-1', 'A', '{}')",
                (),
            )
            .await
            .unwrap();
        let result = db
            .conn()
            .execute(
                "INSERT INTO species_profiles (key, name, body) VALUES ('sp-gbif-1', 'B', '{}')",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
