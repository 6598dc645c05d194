//! Family profile repository.

use umw_core::entities::FamilyProfile;
use umw_core::enums::EntityKind;

use crate::error::DatabaseError;
use crate::repos::Stored;
use crate::service::UmwService;

impl UmwService {
    /// # Errors
    ///
    /// Returns `DatabaseError::MergeConflict` if the stored body is unreadable.
    pub async fn load_family(&self, key: &str) -> Result<Option<Stored<FamilyProfile>>, DatabaseError> {
        self.load_profile(key).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::StaleVersion` if `expected_version` is out of date.
    pub async fn save_family(
        &self,
        key: &str,
        profile: &FamilyProfile,
        expected_version: Option<i64>,
    ) -> Result<i64, DatabaseError> {
        self.save_profile(key, profile, expected_version).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a body is unreadable.
    pub async fn list_families(&self) -> Result<Vec<Stored<FamilyProfile>>, DatabaseError> {
        self.list_profiles().await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_families_by_name(&self, name: &str) -> Result<Vec<String>, DatabaseError> {
        self.find_keys_by_name(EntityKind::Family, name).await
    }
}
