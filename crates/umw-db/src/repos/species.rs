//! Species profile repository.

use umw_core::entities::SpeciesRecord;
use umw_core::enums::EntityKind;

use crate::error::DatabaseError;
use crate::repos::Stored;
use crate::service::UmwService;

impl UmwService {
    /// # Errors
    ///
    /// Returns `DatabaseError::MergeConflict` if the stored body is unreadable.
    pub async fn load_species(&self, key: &str) -> Result<Option<Stored<SpeciesRecord>>, DatabaseError> {
        self.load_profile(key).await
    }

    /// Durable when this returns. See [`UmwService::save_profile`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::StaleVersion` if `expected_version` is out of date.
    pub async fn save_species(
        &self,
        key: &str,
        record: &SpeciesRecord,
        expected_version: Option<i64>,
    ) -> Result<i64, DatabaseError> {
        self.save_profile(key, record, expected_version).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a body is unreadable.
    pub async fn list_species(&self) -> Result<Vec<Stored<SpeciesRecord>>, DatabaseError> {
        self.list_profiles().await
    }

    /// Keys of species whose common name, scientific name, or an alias folds to
    /// the same text as `name`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_species_by_name(&self, name: &str) -> Result<Vec<String>, DatabaseError> {
        self.find_keys_by_name(EntityKind::Species, name).await
    }
}
