//! Storage shared by species and family profiles.
//!
//! Both tables have the same envelope (`key`, `stable_id`, `name`, JSON
//! `body`, `version`, timestamps). Saves are compare-and-swap on `version`
//! and rewrite the profile's rows in `profile_names` in the same transaction.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use umw_core::entities::{FamilyProfile, SpeciesRecord};
use umw_core::enums::EntityKind;
use umw_core::ids::{fold_name, is_known};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_stable_id, parse_datetime, profile_table, stable_id_param};
use crate::repos::Stored;
use crate::service::UmwService;

/// What the store needs to know about a record type.
pub trait Profile: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn stable_id(&self) -> Option<u64>;

    /// Name stored in the `name` column and used for name keys.
    fn display_name(&self) -> &str;

    /// Names a later record may be matched by, before folding.
    fn lookup_names(&self) -> Vec<&str>;

    /// Claim slots for species, modality entries for families.
    fn claim_count(&self) -> usize;
}

impl Profile for SpeciesRecord {
    const KIND: EntityKind = EntityKind::Species;

    fn stable_id(&self) -> Option<u64> {
        self.identity.stable_id
    }

    fn display_name(&self) -> &str {
        &self.identity.common_name
    }

    fn lookup_names(&self) -> Vec<&str> {
        let identity = &self.identity;
        std::iter::once(identity.common_name.as_str())
            .chain(std::iter::once(identity.scientific_name.as_str()))
            .chain(identity.aliases.iter().map(String::as_str))
            .filter(|name| is_known(name))
            .collect()
    }

    fn claim_count(&self) -> usize {
        self.claims.len()
    }
}

impl Profile for FamilyProfile {
    const KIND: EntityKind = EntityKind::Family;

    fn stable_id(&self) -> Option<u64> {
        self.stable_id
    }

    fn display_name(&self) -> &str {
        &self.family_name
    }

    fn lookup_names(&self) -> Vec<&str> {
        vec![self.family_name.as_str()]
    }

    fn claim_count(&self) -> usize {
        self.modalities.len()
    }
}

fn folded_names<T: Profile>(record: &T) -> BTreeSet<String> {
    record
        .lookup_names()
        .into_iter()
        .map(fold_name)
        .filter(|name| !name.is_empty())
        .collect()
}

fn row_to_stored<T: Profile>(row: &libsql::Row) -> Result<Stored<T>, DatabaseError> {
    let key = row.get::<String>(0)?;
    let body = row.get::<String>(2)?;
    let record = serde_json::from_str(&body).map_err(|e| DatabaseError::MergeConflict {
        profile_id: key.clone(),
        reason: format!("stored profile is unreadable: {e}"),
    })?;
    Ok(Stored {
        stable_id: get_opt_stable_id(row, 1)?,
        version: row.get::<i64>(3)?,
        record,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
        key,
    })
}

const COLUMNS: &str = "key, stable_id, body, version, created_at, updated_at";

impl UmwService {
    /// # Errors
    ///
    /// Returns `DatabaseError::MergeConflict` if the stored body cannot be
    /// deserialized, or `DatabaseError` if the query fails.
    pub async fn load_profile<T: Profile>(&self, key: &str) -> Result<Option<Stored<T>>, DatabaseError> {
        let table = profile_table(T::KIND);
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {COLUMNS} FROM {table} WHERE key = ?1"), [key])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_stored(&row)?)),
            None => Ok(None),
        }
    }

    /// Every stored profile of one kind, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::MergeConflict` for the first unreadable body.
    pub async fn list_profiles<T: Profile>(&self) -> Result<Vec<Stored<T>>, DatabaseError> {
        let table = profile_table(T::KIND);
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {COLUMNS} FROM {table} ORDER BY key"), ())
            .await?;
        let mut profiles = Vec::new();
        while let Some(row) = rows.next().await? {
            profiles.push(row_to_stored(&row)?);
        }
        Ok(profiles)
    }

    /// Write a profile under optimistic versioning.
    ///
    /// `expected_version` is `None` for a profile that must not exist yet and
    /// `Some(v)` for one last read at version `v`. Returns the new version.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::StaleVersion` when the row was created or changed
    /// since it was read (`expected` is 0 for a lost insert), or `DatabaseError`
    /// if a statement fails. Nothing is written in either case.
    pub async fn save_profile<T: Profile>(
        &self,
        key: &str,
        record: &T,
        expected_version: Option<i64>,
    ) -> Result<i64, DatabaseError> {
        let body = serde_json::to_string(record).map_err(|e| DatabaseError::Other(e.into()))?;
        let tx = self.db().conn().transaction().await?;
        match write_profile(&tx, key, record, &body, expected_version).await {
            Ok(version) => {
                tx.commit().await?;
                let kind = T::KIND;
                tracing::debug!(%kind, key, version, "profile saved");
                Ok(version)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    /// Keys of profiles that answer to `name` (folded) as a primary name or alias.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_keys_by_name(&self, kind: EntityKind, name: &str) -> Result<Vec<String>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT DISTINCT key FROM profile_names WHERE kind = ?1 AND name = ?2 ORDER BY key",
                libsql::params![kind.as_str(), fold_name(name)],
            )
            .await?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next().await? {
            keys.push(row.get::<String>(0)?);
        }
        Ok(keys)
    }

    /// Key of the profile carrying `stable_id`, whether it is keyed by that id
    /// or is a name-keyed profile that learned the id later.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_key_by_stable_id(
        &self,
        kind: EntityKind,
        stable_id: u64,
    ) -> Result<Option<String>, DatabaseError> {
        let table = profile_table(kind);
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT key FROM {table} WHERE stable_id = ?1 ORDER BY key LIMIT 1"),
                libsql::params![stable_id_param(Some(stable_id))?],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn profile_exists(&self, kind: EntityKind, key: &str) -> Result<bool, DatabaseError> {
        let table = profile_table(kind);
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT 1 FROM {table} WHERE key = ?1"), [key])
            .await?;
        Ok(rows.next().await?.is_some())
    }
}

async fn write_profile<T: Profile>(
    conn: &libsql::Connection,
    key: &str,
    record: &T,
    body: &str,
    expected_version: Option<i64>,
) -> Result<i64, DatabaseError> {
    let table = profile_table(T::KIND);
    let now = Utc::now().to_rfc3339();
    let stable_id = stable_id_param(record.stable_id())?;
    let name = record.display_name();
    let claim_count = i64::try_from(record.claim_count()).unwrap_or(i64::MAX);

    let version = match expected_version {
        None => {
            let changed = conn
                .execute(
                    &format!(
                        "INSERT INTO {table} (key, stable_id, name, body, claim_count, version, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)
                         ON CONFLICT(key) DO NOTHING"
                    ),
                    libsql::params![key, stable_id, name, body, claim_count, now.as_str()],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::StaleVersion {
                    profile_id: key.to_string(),
                    expected: 0,
                });
            }
            1
        }
        Some(expected) => {
            let changed = conn
                .execute(
                    &format!(
                        "UPDATE {table}
                         SET stable_id = ?2, name = ?3, body = ?4, claim_count = ?5,
                             version = version + 1, updated_at = ?6
                         WHERE key = ?1 AND version = ?7"
                    ),
                    libsql::params![key, stable_id, name, body, claim_count, now.as_str(), expected],
                )
                .await?;
            if changed == 0 {
                return Err(DatabaseError::StaleVersion {
                    profile_id: key.to_string(),
                    expected,
                });
            }
            expected + 1
        }
    };

    let kind = T::KIND.as_str();
    conn.execute(
        "DELETE FROM profile_names WHERE kind = ?1 AND key = ?2",
        libsql::params![kind, key],
    )
    .await?;
    for folded in folded_names(record) {
        conn.execute(
            "INSERT OR IGNORE INTO profile_names (kind, name, key) VALUES (?1, ?2, ?3)",
            libsql::params![kind, folded, key],
        )
        .await?;
    }

    Ok(version)
}
