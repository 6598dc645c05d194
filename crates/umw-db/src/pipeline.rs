//! Ingest pipeline.
//!
//! A candidate goes through validation, vocabulary normalization, identity
//! resolution, and a merge into its stored profile. The save is conditioned on
//! the version that was loaded. A lost race re-reads and re-merges with
//! backoff. Graph rebuild and normalization operate on the derived view only.

use std::collections::BTreeSet;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use umw_core::entities::{FamilyProfile, SpeciesRecord};
use umw_core::enums::{EntityKind, TrailOp};
use umw_core::identity::IdentityHint;
use umw_core::ids::{disambiguated_key, profile_key};
use umw_core::outcome::{IdentityResolution, MergeOutcome};
use umw_core::responses::{BatchReport, IngestFailure, IngestResponse, NormalizeReport, RebuildResponse};
use umw_core::trail::{IngestPayload, TrailOperation};
use umw_graph::build_graph;
use umw_merge::{merge_family, merge_species, seed_family, seed_species};
use umw_schema::{SchemaViolation, Validator};
use umw_vocab::Normalizer;

use crate::error::DatabaseError;
use crate::helpers::to_u32;
use crate::repos::Stored;
use crate::repos::profile::Profile;
use crate::retry::is_retryable;
use crate::service::UmwService;

const UNNAMED: &str = "<unnamed>";
const GRAPH_TRAIL_ID: &str = "graph";

/// Per-kind steps of the ingest pipeline.
pub trait Ingest: Profile + Clone + PartialEq {
    fn parse(raw: &Value, hint: &IdentityHint) -> Result<Self, SchemaViolation>;

    #[must_use]
    fn normalize(self, normalizer: &Normalizer) -> Self;

    /// The profile to store when nothing exists under the key yet.
    fn seed(&self) -> (Self, MergeOutcome);

    fn merge_into(&self, existing: &mut Self, note_separator: &str) -> MergeOutcome;
}

impl Ingest for SpeciesRecord {
    fn parse(raw: &Value, hint: &IdentityHint) -> Result<Self, SchemaViolation> {
        Validator::parse_species(raw, hint)
    }

    fn normalize(self, normalizer: &Normalizer) -> Self {
        normalizer.normalize_species(self)
    }

    fn seed(&self) -> (Self, MergeOutcome) {
        seed_species(self)
    }

    fn merge_into(&self, existing: &mut Self, _note_separator: &str) -> MergeOutcome {
        merge_species(existing, self)
    }
}

impl Ingest for FamilyProfile {
    fn parse(raw: &Value, hint: &IdentityHint) -> Result<Self, SchemaViolation> {
        Validator::parse_family(raw, hint)
    }

    fn normalize(self, normalizer: &Normalizer) -> Self {
        normalizer.normalize_family(self)
    }

    fn seed(&self) -> (Self, MergeOutcome) {
        seed_family(self)
    }

    fn merge_into(&self, existing: &mut Self, note_separator: &str) -> MergeOutcome {
        merge_family(existing, self, note_separator)
    }
}

/// One candidate record of a batch.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Where the candidate came from, e.g. `owls.jsonl:3`.
    pub origin: String,
    pub hint: IdentityHint,
    pub raw: Value,
}

struct Resolved {
    key: String,
    resolution: IdentityResolution,
}

struct Merged {
    version: i64,
    created: bool,
    outcome: MergeOutcome,
}

fn trail_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl UmwService {
    /// Validate, normalize, and merge one species candidate.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Schema` if the candidate is rejected,
    /// `DatabaseError::MergeConflict` if the stored profile is unreadable, and
    /// `DatabaseError::StaleVersion` if every retry lost the race.
    pub async fn ingest_species(&self, raw: &Value, hint: &IdentityHint) -> Result<IngestResponse, DatabaseError> {
        self.ingest::<SpeciesRecord>(raw, hint).await
    }

    /// Validate, normalize, and merge one family candidate.
    ///
    /// # Errors
    ///
    /// Same as [`UmwService::ingest_species`].
    pub async fn ingest_family(&self, raw: &Value, hint: &IdentityHint) -> Result<IngestResponse, DatabaseError> {
        self.ingest::<FamilyProfile>(raw, hint).await
    }

    /// Ingest candidates in order. Record-scoped failures are reported in the
    /// batch and the remaining candidates are still ingested.
    ///
    /// # Errors
    ///
    /// Returns the first error that is not specific to one record (e.g. the
    /// database is unreachable).
    pub async fn ingest_batch(
        &self,
        kind: EntityKind,
        candidates: &[Candidate],
    ) -> Result<BatchReport, DatabaseError> {
        let mut report = BatchReport::default();
        for candidate in candidates {
            let result = match kind {
                EntityKind::Species => self.ingest_species(&candidate.raw, &candidate.hint).await,
                EntityKind::Family => self.ingest_family(&candidate.raw, &candidate.hint).await,
            };
            match result {
                Ok(response) => report.record_accepted(response),
                Err(e) if e.is_record_scoped() => {
                    let entity = match &e {
                        DatabaseError::Schema(violation) => violation.entity.clone(),
                        _ => candidate.hint.display_name().unwrap_or(UNNAMED).to_string(),
                    };
                    tracing::warn!(origin = %candidate.origin, %entity, error = %e, "candidate rejected");
                    report.record_rejected(IngestFailure {
                        origin: candidate.origin.clone(),
                        entity,
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        tracing::info!(
            %kind,
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            created = report.created,
            merged = report.merged,
            "batch ingested"
        );
        Ok(report)
    }

    /// Recompute the graph from every stored profile and replace the stored
    /// graph with it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if profiles cannot be read or the replace fails.
    /// On failure the previously stored graph is kept.
    pub async fn rebuild_graph(&self) -> Result<RebuildResponse, DatabaseError> {
        let (species, families) = self.profile_snapshot().await?;
        let species: Vec<(String, SpeciesRecord)> =
            species.into_iter().map(|s| (s.key, s.record)).collect();
        let families: Vec<(String, FamilyProfile)> =
            families.into_iter().map(|f| (f.key, f.record)).collect();

        let graph = build_graph(&species, &families);
        self.replace_graph(&graph).await?;

        let response = RebuildResponse {
            species: to_u32(species.len()),
            families: to_u32(families.len()),
            nodes: to_u32(graph.node_count()),
            edges: to_u32(graph.edge_count()),
        };
        tracing::info!(
            species = response.species,
            families = response.families,
            nodes = response.nodes,
            edges = response.edges,
            "graph rebuilt"
        );
        self.append_graph_op(TrailOp::RebuildGraph, &response)?;
        Ok(response)
    }

    /// Collapse synonym modality and sub_type nodes in the stored graph.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the graph cannot be loaded or replaced.
    pub async fn normalize_graph(&self) -> Result<NormalizeReport, DatabaseError> {
        let mut graph = self.load_graph().await?;
        let report = self.normalizer().normalize_graph(&mut graph);
        if report != NormalizeReport::default() {
            self.replace_graph(&graph).await?;
        }
        self.append_graph_op(TrailOp::NormalizeGraph, &report)?;
        Ok(report)
    }

    async fn ingest<T: Ingest>(&self, raw: &Value, hint: &IdentityHint) -> Result<IngestResponse, DatabaseError> {
        let record = T::parse(raw, hint)?.normalize(self.normalizer());
        let resolved = self.resolve_identity(&record).await?;
        let merged = self.merge_with_retry(&resolved.key, &record).await?;

        let payload = IngestPayload {
            hint: hint.clone(),
            candidate: raw.clone(),
        };
        let op = TrailOperation {
            v: 1,
            ts: trail_timestamp(),
            batch: self.batch().to_string(),
            op: TrailOp::Ingest,
            entity: Some(T::KIND),
            id: resolved.key.clone(),
            data: serde_json::to_value(&payload).map_err(|e| DatabaseError::Other(e.into()))?,
        };
        self.trail().append_validated(&op, self.schema())?;

        let kind = T::KIND;
        tracing::info!(
            %kind,
            key = %resolved.key,
            resolution = %resolved.resolution,
            created = merged.created,
            version = merged.version,
            claims_added = merged.outcome.claims_added,
            evidence_added = merged.outcome.evidence_added,
            "profile ingested"
        );

        Ok(IngestResponse {
            kind,
            key: resolved.key,
            name: record.display_name().to_string(),
            resolution: resolved.resolution,
            created: merged.created,
            version: merged.version,
            outcome: merged.outcome,
        })
    }

    /// A known stable identifier always decides the key. Otherwise a record
    /// joins an existing profile only when exactly one profile answers to one
    /// of its names.
    async fn resolve_identity<T: Ingest>(&self, record: &T) -> Result<Resolved, DatabaseError> {
        let kind = T::KIND;
        let name = record.display_name();

        if let Some(stable_id) = record.stable_id() {
            if let Some(key) = self.find_key_by_stable_id(kind, stable_id).await? {
                return Ok(Resolved {
                    key,
                    resolution: IdentityResolution::StableId,
                });
            }
            // A name-keyed profile that never had an identifier may be the same
            // entity. It keeps its key and learns the identifier on save.
            let unclaimed = self.name_matches_without_id::<T>(record).await?;
            if let [key] = unclaimed.as_slice() {
                tracing::debug!(%kind, key = %key, stable_id, "stable id attached to name-keyed profile");
                return Ok(Resolved {
                    key: key.clone(),
                    resolution: IdentityResolution::NameMatch,
                });
            }
            return Ok(Resolved {
                key: profile_key(kind, Some(stable_id), name),
                resolution: IdentityResolution::StableId,
            });
        }

        let matches = self.name_matches(record).await?;
        match matches.len() {
            0 => Ok(Resolved {
                key: profile_key(kind, None, name),
                resolution: IdentityResolution::New,
            }),
            1 => Ok(Resolved {
                key: matches.into_iter().next().unwrap_or_default(),
                resolution: IdentityResolution::NameMatch,
            }),
            n => {
                let key = self.free_disambiguated_key(kind, name).await?;
                tracing::warn!(
                    %kind,
                    name,
                    candidates = n,
                    key = %key,
                    "ambiguous name without stable id, stored as a new profile"
                );
                Ok(Resolved {
                    key,
                    resolution: IdentityResolution::Ambiguous,
                })
            }
        }
    }

    async fn name_matches<T: Ingest>(&self, record: &T) -> Result<BTreeSet<String>, DatabaseError> {
        let mut keys = BTreeSet::new();
        for name in record.lookup_names() {
            keys.extend(self.find_keys_by_name(T::KIND, name).await?);
        }
        Ok(keys)
    }

    async fn name_matches_without_id<T: Ingest>(&self, record: &T) -> Result<Vec<String>, DatabaseError> {
        let mut unclaimed = Vec::new();
        for key in self.name_matches(record).await? {
            let stored: Option<Stored<T>> = self.load_profile(&key).await?;
            if stored.is_some_and(|s| s.stable_id.is_none()) {
                unclaimed.push(key);
            }
        }
        Ok(unclaimed)
    }

    async fn free_disambiguated_key(&self, kind: EntityKind, name: &str) -> Result<String, DatabaseError> {
        for n in 1..=u32::MAX {
            let key = disambiguated_key(kind, name, n);
            if !self.profile_exists(kind, &key).await? {
                return Ok(key);
            }
        }
        Err(DatabaseError::InvalidState(format!(
            "no free key left for {kind} '{name}'"
        )))
    }

    async fn merge_with_retry<T: Ingest>(&self, key: &str, record: &T) -> Result<Merged, DatabaseError> {
        let retry = self.retry();
        let mut attempt = 1;
        loop {
            match self.merge_once(key, record).await {
                Err(e) if is_retryable(&e) && attempt < retry.max_attempts => {
                    let delay = retry.delay_for(attempt);
                    tracing::warn!(key, attempt, ?delay, "stale profile version, retrying merge");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn merge_once<T: Ingest>(&self, key: &str, record: &T) -> Result<Merged, DatabaseError> {
        match self.load_profile::<T>(key).await? {
            Some(stored) => {
                let mut merged = stored.record.clone();
                let outcome = record.merge_into(&mut merged, self.normalizer().note_separator());
                if merged == stored.record {
                    return Ok(Merged {
                        version: stored.version,
                        created: false,
                        outcome,
                    });
                }
                let version = self.save_profile(key, &merged, Some(stored.version)).await?;
                Ok(Merged {
                    version,
                    created: false,
                    outcome,
                })
            }
            None => {
                let (seeded, outcome) = record.seed();
                let version = self.save_profile(key, &seeded, None).await?;
                Ok(Merged {
                    version,
                    created: true,
                    outcome,
                })
            }
        }
    }

    /// Both profile lists read inside one transaction.
    async fn profile_snapshot(
        &self,
    ) -> Result<(Vec<Stored<SpeciesRecord>>, Vec<Stored<FamilyProfile>>), DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        let read = async {
            let species = self.list_species().await?;
            let families = self.list_families().await?;
            Ok::<_, DatabaseError>((species, families))
        }
        .await;
        match read {
            Ok(snapshot) => {
                tx.commit().await?;
                Ok(snapshot)
            }
            Err(e) => {
                tx.rollback().await?;
                Err(e)
            }
        }
    }

    fn append_graph_op<R: serde::Serialize>(&self, op: TrailOp, response: &R) -> Result<(), DatabaseError> {
        let op = TrailOperation {
            v: 1,
            ts: trail_timestamp(),
            batch: self.batch().to_string(),
            op,
            entity: None,
            id: GRAPH_TRAIL_ID.to_string(),
            data: serde_json::to_value(response).map_err(|e| DatabaseError::Other(e.into()))?,
        };
        self.trail().append(&op)
    }
}
