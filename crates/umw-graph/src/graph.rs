use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use umw_core::entities::{Edge, EdgeKey, Node};
use umw_core::enums::{NodeKind, Relationship};

/// Node and edge sets keyed for deterministic iteration.
///
/// Inserting a node or edge that already exists is a no-op: the first
/// inserted display name and attributes win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<EdgeKey, Edge>,
}

/// Serializable form of a [`Graph`], nodes and edges in key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a graph from stored rows. Duplicates are suppressed as on insert.
    #[must_use]
    pub fn from_parts(nodes: impl IntoIterator<Item = Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for edge in edges {
            graph.add_edge(edge);
        }
        graph
    }

    /// Returns `true` if the node was new.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Returns `true` if no edge with the same `(source, target, relationship)`
    /// existed.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        let key = edge.key();
        if self.edges.contains_key(&key) {
            return false;
        }
        self.edges.insert(key, edge);
        true
    }

    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    /// Take every edge out of the graph, leaving the nodes in place.
    pub fn drain_edges(&mut self) -> Vec<Edge> {
        std::mem::take(&mut self.edges).into_values().collect()
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn has_edge(&self, source_id: &str, target_id: &str, relationship: Relationship) -> bool {
        self.edges.contains_key(&(
            source_id.to_string(),
            target_id.to_string(),
            relationship,
        ))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    /// Edges leaving `source_id` with the given relationship.
    pub fn outgoing<'a>(
        &'a self,
        source_id: &'a str,
        relationship: Relationship,
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges
            .values()
            .filter(move |e| e.source_id == source_id && e.relationship == relationship)
    }

    /// Whether any edge references `id` as source or target.
    #[must_use]
    pub fn is_referenced(&self, id: &str) -> bool {
        self.edges
            .values()
            .any(|e| e.source_id == id || e.target_id == id)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
        }
    }

    /// Canonical JSON bytes. Identical graphs serialize identically.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge attribute cannot be serialized.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.snapshot())
    }
}
