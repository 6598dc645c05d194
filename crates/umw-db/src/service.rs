//! Service layer tying the store, trail, schemas, and normalizer together.
//!
//! `UmwService` wraps `UmwDb` (raw database access), `TrailWriter` (JSONL
//! persistence), `SchemaRegistry` (trail validation), and the `Normalizer`
//! applied to every candidate. Repo and pipeline methods are implemented as
//! `impl UmwService` blocks.

use std::path::{Path, PathBuf};

use chrono::Utc;
use umw_config::UmwConfig;
use umw_schema::SchemaRegistry;
use umw_vocab::{Normalizer, Vocabulary};

use crate::UmwDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;
use crate::trail::writer::TrailWriter;

/// Every accepted ingest follows this protocol:
/// 1. Validate and normalize the candidate
/// 2. Resolve identity and load the stored profile
/// 3. Merge and save under the loaded version (retry on a stale version)
/// 4. Append the raw candidate to the JSONL trail
pub struct UmwService {
    db: UmwDb,
    trail: TrailWriter,
    schema: SchemaRegistry,
    normalizer: Normalizer,
    retry: RetryConfig,
    batch: String,
}

impl UmwService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. Pass `None` to disable
    ///   trail writing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
    ) -> Result<Self, DatabaseError> {
        let db = UmwDb::open_local(db_path).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self::from_db(db, trail))
    }

    /// Open the store described by a loaded config, resolving relative paths
    /// against `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, the trail
    /// directory cannot be created, or a configured synonym is invalid.
    pub async fn from_config(config: &UmwConfig, project_root: &Path) -> Result<Self, DatabaseError> {
        let db_path = config.storage.db_path_in(project_root);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
        }
        let trail_dir = config
            .storage
            .trail_enabled
            .then(|| config.storage.trail_dir_in(project_root));

        let vocabulary = Vocabulary::builtin().with_synonyms(&config.vocabulary.synonyms)?;
        let normalizer =
            Normalizer::new(vocabulary).with_note_separator(config.merge.note_separator.clone());

        let service = Self::new_local(&db_path.to_string_lossy(), trail_dir)
            .await?
            .with_normalizer(normalizer)
            .with_retry(RetryConfig::from_merge_config(&config.merge));
        Ok(service)
    }

    /// Create from an existing `UmwDb` (for testing).
    #[must_use]
    pub fn from_db(db: UmwDb, trail: TrailWriter) -> Self {
        Self {
            db,
            trail,
            schema: SchemaRegistry::new(),
            normalizer: Normalizer::default(),
            retry: RetryConfig::default(),
            batch: default_batch_id(),
        }
    }

    #[must_use]
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Name of the trail file (`{batch}.jsonl`) this service appends to.
    #[must_use]
    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = batch.into();
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &UmwDb {
        &self.db
    }

    /// Access the trail writer mutably (e.g., to disable during replay).
    pub const fn trail_mut(&mut self) -> &mut TrailWriter {
        &mut self.trail
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    #[must_use]
    pub const fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    #[must_use]
    pub const fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[must_use]
    pub const fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    #[must_use]
    pub fn batch(&self) -> &str {
        &self.batch
    }
}

fn default_batch_id() -> String {
    format!("batch-{}", Utc::now().format("%Y%m%dT%H%M%S%3f"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_local_without_trail() {
        let svc = UmwService::new_local(":memory:", None).await.unwrap();
        assert!(!svc.trail().is_enabled());
        assert!(svc.batch().starts_with("batch-"));
    }

    #[tokio::test]
    async fn from_config_creates_store_under_project() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = UmwConfig::default();

        let svc = UmwService::from_config(&config, dir.path()).await.unwrap();

        assert!(dir.path().join(".umwelt/umwelt.db").exists());
        assert!(svc.trail().is_enabled());
        assert_eq!(svc.trail().trail_dir(), dir.path().join(".umwelt/trail"));
        assert_eq!(svc.retry().max_attempts, 4);
    }

    #[tokio::test]
    async fn from_config_rejects_bad_synonym() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = UmwConfig::default();
        config
            .vocabulary
            .synonyms
            .insert("sixth sense".into(), "Telepathy".into());

        let result = UmwService::from_config(&config, dir.path()).await;
        assert!(matches!(result, Err(DatabaseError::Vocabulary(_))));
    }
}
