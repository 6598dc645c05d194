//! Graph repository.
//!
//! The graph is a derived view: `replace_graph` swaps the whole node and edge
//! set in one transaction, so a failed rebuild leaves the previous graph.

use std::collections::BTreeMap;

use umw_core::entities::{Edge, Node};
use umw_core::enums::{NodeKind, Relationship};
use umw_graph::Graph;

use crate::error::DatabaseError;
use crate::helpers::parse_enum;
use crate::service::UmwService;

/// Filter criteria for edge queries.
#[derive(Debug, Default, Clone)]
pub struct EdgeFilter {
    pub relationship: Option<Relationship>,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub source_kind: Option<NodeKind>,
    pub target_kind: Option<NodeKind>,
    pub limit: Option<u32>,
}

fn row_to_node(row: &libsql::Row) -> Result<Node, DatabaseError> {
    Ok(Node {
        id: row.get::<String>(0)?,
        kind: parse_enum(&row.get::<String>(1)?)?,
        display_name: row.get::<String>(2)?,
    })
}

fn row_to_edge(row: &libsql::Row) -> Result<Edge, DatabaseError> {
    let raw = row.get::<String>(3)?;
    let attributes: BTreeMap<String, serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| DatabaseError::Query(format!("Invalid edge attributes: {e}")))?;
    Ok(Edge {
        source_id: row.get::<String>(0)?,
        target_id: row.get::<String>(1)?,
        relationship: parse_enum(&row.get::<String>(2)?)?,
        attributes,
    })
}

impl UmwService {
    /// Replace the stored graph with `graph`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any statement fails. The transaction is rolled
    /// back and the previously stored graph is left untouched.
    pub async fn replace_graph(&self, graph: &Graph) -> Result<(), DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        match write_graph(&tx, graph).await {
            Ok(()) => {
                tx.commit().await?;
                tracing::info!(
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "graph replaced"
                );
                Ok(())
            }
            Err(e) => {
                tx.rollback().await?;
                tracing::warn!(error = %e, "graph replace rolled back");
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails or a row cannot be parsed.
    pub async fn load_graph(&self) -> Result<Graph, DatabaseError> {
        let conn = self.db().conn();

        let mut rows = conn
            .query("SELECT id, kind, display_name FROM graph_nodes ORDER BY id", ())
            .await?;
        let mut nodes = Vec::new();
        while let Some(row) = rows.next().await? {
            nodes.push(row_to_node(&row)?);
        }

        let mut rows = conn
            .query(
                "SELECT source_id, target_id, relationship, attributes FROM graph_edges
                 ORDER BY source_id, target_id, relationship",
                (),
            )
            .await?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next().await? {
            edges.push(row_to_edge(&row)?);
        }

        Ok(Graph::from_parts(nodes, edges))
    }

    /// Query stored edges with optional filters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_edges(&self, filter: &EdgeFilter) -> Result<Vec<Edge>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(rel) = filter.relationship {
            params.push(libsql::Value::Text(rel.as_str().to_string()));
            conditions.push(format!("e.relationship = ?{}", params.len()));
        }
        if let Some(ref source) = filter.source_id {
            params.push(libsql::Value::Text(source.clone()));
            conditions.push(format!("e.source_id = ?{}", params.len()));
        }
        if let Some(ref target) = filter.target_id {
            params.push(libsql::Value::Text(target.clone()));
            conditions.push(format!("e.target_id = ?{}", params.len()));
        }
        if let Some(kind) = filter.source_kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("s.kind = ?{}", params.len()));
        }
        if let Some(kind) = filter.target_kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("t.kind = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT e.source_id, e.target_id, e.relationship, e.attributes
             FROM graph_edges e
             JOIN graph_nodes s ON s.id = e.source_id
             JOIN graph_nodes t ON t.id = e.target_id
             {where_clause}
             ORDER BY e.source_id, e.target_id, e.relationship LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut edges = Vec::new();
        while let Some(row) = rows.next().await? {
            edges.push(row_to_edge(&row)?);
        }
        Ok(edges)
    }
}

async fn write_graph(conn: &libsql::Connection, graph: &Graph) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM graph_edges", ()).await?;
    conn.execute("DELETE FROM graph_nodes", ()).await?;

    for node in graph.nodes() {
        conn.execute(
            "INSERT INTO graph_nodes (id, kind, display_name) VALUES (?1, ?2, ?3)",
            libsql::params![node.id.as_str(), node.kind.as_str(), node.display_name.as_str()],
        )
        .await?;
    }

    for edge in graph.edges() {
        let attributes = serde_json::to_string(&edge.attributes)
            .map_err(|e| DatabaseError::Other(e.into()))?;
        conn.execute(
            "INSERT INTO graph_edges (source_id, target_id, relationship, attributes) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![
                edge.source_id.as_str(),
                edge.target_id.as_str(),
                edge.relationship.as_str(),
                attributes
            ],
        )
        .await?;
    }
    Ok(())
}
