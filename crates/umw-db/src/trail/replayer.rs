//! Rebuild the profile store by feeding trail operations back through the
//! ingest pipeline.

use std::path::{Path, PathBuf};

use umw_core::enums::{EntityKind, TrailOp};
use umw_core::responses::ReplayResponse;
use umw_core::trail::{IngestPayload, TrailOperation};

use crate::error::DatabaseError;
use crate::helpers::to_u32;
use crate::service::UmwService;

pub struct TrailReplayer;

impl TrailReplayer {
    /// Replay every `*.jsonl` file under `trail_dir` in timestamp order.
    ///
    /// Trail writing is switched off for the duration. Merges are idempotent,
    /// so replaying onto a store that already holds the profiles changes
    /// nothing but family timestamps. With `strict`, ingest payloads that fail
    /// the `ingest_payload` schema are rejected instead of attempted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the trail cannot be read, an operation has an
    /// unsupported version, or the store fails for a reason not specific to
    /// one record.
    pub async fn replay(
        service: &mut UmwService,
        trail_dir: &Path,
        strict: bool,
    ) -> Result<ReplayResponse, DatabaseError> {
        let was_enabled = service.trail().is_enabled();
        service.trail_mut().set_enabled(false);
        let result = replay_all(service, trail_dir, strict).await;
        service.trail_mut().set_enabled(was_enabled);
        result
    }
}

fn trail_files(trail_dir: &Path) -> Result<Vec<PathBuf>, DatabaseError> {
    let entries = std::fs::read_dir(trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DatabaseError::Other(e.into()))?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn replay_all(
    service: &UmwService,
    trail_dir: &Path,
    strict: bool,
) -> Result<ReplayResponse, DatabaseError> {
    let files = trail_files(trail_dir)?;

    let mut all_ops: Vec<TrailOperation> = Vec::new();
    for path in &files {
        let ops: Vec<TrailOperation> = serde_jsonlines::json_lines(path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DatabaseError::Other(e.into()))?;
        all_ops.extend(ops);
    }
    // Stable: operations with equal timestamps keep file order.
    all_ops.sort_by(|a, b| a.ts.cmp(&b.ts));

    let mut response = ReplayResponse {
        trail_files: to_u32(files.len()),
        operations: 0,
        accepted: 0,
        rejected: 0,
    };

    for op in &all_ops {
        if op.v != 1 {
            return Err(DatabaseError::InvalidState(format!(
                "Unsupported trail version {} for op {}",
                op.v, op.id
            )));
        }
        response.operations += 1;

        match op.op {
            TrailOp::Ingest => {
                if replay_ingest(service, op, strict).await? {
                    response.accepted += 1;
                } else {
                    response.rejected += 1;
                }
            }
            TrailOp::RebuildGraph => {
                service.rebuild_graph().await?;
            }
            TrailOp::NormalizeGraph => {
                service.normalize_graph().await?;
            }
        }
    }

    tracing::info!(
        files = response.trail_files,
        operations = response.operations,
        accepted = response.accepted,
        rejected = response.rejected,
        "trail replayed"
    );
    Ok(response)
}

/// `Ok(false)` when the operation was rejected for reasons local to it.
async fn replay_ingest(
    service: &UmwService,
    op: &TrailOperation,
    strict: bool,
) -> Result<bool, DatabaseError> {
    if strict {
        if let Err(e) = service.schema().validate("ingest_payload", &op.data) {
            tracing::warn!(entity = ?op.entity, id = %op.id, error = ?e, "ingest payload failed schema validation");
            return Ok(false);
        }
    }

    let payload: IngestPayload = match serde_json::from_value(op.data.clone()) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(id = %op.id, error = %e, "unreadable ingest payload skipped");
            return Ok(false);
        }
    };

    let result = match op.entity {
        Some(EntityKind::Species) => service.ingest_species(&payload.candidate, &payload.hint).await,
        Some(EntityKind::Family) => service.ingest_family(&payload.candidate, &payload.hint).await,
        None => {
            tracing::warn!(id = %op.id, "ingest without an entity kind skipped");
            return Ok(false);
        }
    };
    match result {
        Ok(response) => {
            if response.key != op.id {
                tracing::debug!(recorded = %op.id, resolved = %response.key, "replayed under a different key");
            }
            Ok(true)
        }
        Err(e) if e.is_record_scoped() => {
            tracing::warn!(id = %op.id, error = %e, "replayed ingest rejected");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
