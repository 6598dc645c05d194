//! Read-only diagnostic reports over stored profiles and the stored graph.

use umw_core::enums::ModalityDomain;
use umw_core::responses::{
    ClaimDensityReport, ClaimDensityRow, GraphSummary, OrderModalityCount, OrderModalityMatrix,
};
use umw_graph::analysis;

use crate::error::DatabaseError;
use crate::service::UmwService;

/// Rows sorted by claim count descending, ties by name. Species with no claims
/// are listed but left out of the max/min ratio.
#[must_use]
pub fn density_report(rows: Vec<ClaimDensityRow>, threshold: f64) -> ClaimDensityReport {
    let max_claims = rows.iter().map(|r| r.claims).max().unwrap_or(0);
    let min_claims = rows
        .iter()
        .map(|r| r.claims)
        .filter(|claims| *claims > 0)
        .min()
        .unwrap_or(0);
    let ratio = (min_claims > 0).then(|| f64::from(max_claims) / f64::from(min_claims));
    let imbalanced = ratio.is_some_and(|r| r > threshold);
    ClaimDensityReport {
        rows,
        max_claims,
        min_claims,
        ratio,
        threshold,
        imbalanced,
    }
}

impl UmwService {
    /// Claim slots per species, flagged when `max / min` exceeds `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn claim_density(&self, threshold: f64) -> Result<ClaimDensityReport, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT key, name, claim_count FROM species_profiles
                 ORDER BY claim_count DESC, name, key",
                (),
            )
            .await?;
        let mut density = Vec::new();
        while let Some(row) = rows.next().await? {
            density.push(ClaimDensityRow {
                key: row.get::<String>(0)?,
                name: row.get::<String>(1)?,
                claims: u32::try_from(row.get::<i64>(2)?).unwrap_or(0),
            });
        }

        let report = density_report(density, threshold);
        if report.imbalanced {
            tracing::warn!(
                max = report.max_claims,
                min = report.min_claims,
                threshold,
                "claim density is imbalanced across species"
            );
        }
        Ok(report)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the stored graph cannot be loaded.
    pub async fn graph_summary(&self, top_n: usize) -> Result<GraphSummary, DatabaseError> {
        let graph = self.load_graph().await?;
        Ok(analysis::summary(&graph, top_n))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the stored graph cannot be loaded.
    pub async fn orders_with_modality(
        &self,
        modality: ModalityDomain,
    ) -> Result<Vec<OrderModalityCount>, DatabaseError> {
        let graph = self.load_graph().await?;
        Ok(analysis::orders_with_modality(&graph, modality))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the stored graph cannot be loaded.
    pub async fn order_modality_matrix(
        &self,
        max_orders: usize,
    ) -> Result<OrderModalityMatrix, DatabaseError> {
        let graph = self.load_graph().await?;
        Ok(analysis::order_modality_matrix(&graph, max_orders))
    }
}
