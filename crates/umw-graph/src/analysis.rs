//! Aggregate queries over a built graph.

use std::collections::{BTreeMap, BTreeSet};

use umw_core::enums::{ModalityDomain, NodeKind, Relationship};
use umw_core::ids::node_id;
use umw_core::responses::{GraphSummary, OrderModalityCount, OrderModalityMatrix, SenseCount};

use crate::graph::Graph;

/// Order labels that carry no taxonomic information.
const NOISE_ORDERS: &[&str] = &[
    "unknown",
    "not available",
    "not specified in context",
    "unspecified",
    "none",
    "null",
];

fn is_noise(label: &str) -> bool {
    let folded = label.trim().to_lowercase();
    folded.is_empty() || NOISE_ORDERS.contains(&folded.as_str())
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Node counts per kind, edge counts per relationship, and the `top_n`
/// modality/sub_type nodes by `HAS_SENSE` in-degree.
#[must_use]
pub fn summary(graph: &Graph, top_n: usize) -> GraphSummary {
    let mut nodes_by_kind = BTreeMap::new();
    for node in graph.nodes() {
        *nodes_by_kind.entry(node.kind.as_str().to_string()).or_insert(0) += 1;
    }

    let mut edges_by_relationship = BTreeMap::new();
    let mut in_degree: BTreeMap<&str, u32> = BTreeMap::new();
    for edge in graph.edges() {
        *edges_by_relationship
            .entry(edge.relationship.as_str().to_string())
            .or_insert(0) += 1;
        if edge.relationship == Relationship::HasSense {
            *in_degree.entry(edge.target_id.as_str()).or_insert(0) += 1;
        }
    }

    let mut top_senses: Vec<SenseCount> = in_degree
        .into_iter()
        .filter_map(|(id, count)| {
            let node = graph.node(id)?;
            matches!(node.kind, NodeKind::Modality | NodeKind::SubType).then(|| SenseCount {
                id: node.id.clone(),
                display_name: node.display_name.clone(),
                count,
            })
        })
        .collect();
    top_senses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
    top_senses.truncate(top_n);

    GraphSummary {
        nodes_by_kind,
        edges_by_relationship,
        top_senses,
    }
}

/// Walk `MEMBER_OF` edges upward from a member to the orders it belongs to.
fn orders_of(graph: &Graph, member_id: &str) -> BTreeSet<String> {
    let mut orders = BTreeSet::new();
    let mut frontier = vec![member_id.to_string()];
    let mut seen = BTreeSet::new();
    while let Some(id) = frontier.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        for edge in graph.outgoing(&id, Relationship::MemberOf) {
            match graph.node(&edge.target_id) {
                Some(node) if node.kind == NodeKind::Order => {
                    if !is_noise(&node.display_name) {
                        orders.insert(node.display_name.clone());
                    }
                }
                Some(_) => frontier.push(edge.target_id.clone()),
                None => {}
            }
        }
    }
    orders
}

/// Species and family members of each order.
fn members_by_order(graph: &Graph) -> BTreeMap<String, BTreeSet<String>> {
    let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for node in graph
        .nodes()
        .filter(|n| matches!(n.kind, NodeKind::Species | NodeKind::Family))
    {
        for order in orders_of(graph, &node.id) {
            members.entry(order).or_default().insert(node.id.clone());
        }
    }
    members
}

/// Orders whose species or families have a `HAS_SENSE` edge to `modality`,
/// with the number of distinct such members, largest first.
#[must_use]
pub fn orders_with_modality(graph: &Graph, modality: ModalityDomain) -> Vec<OrderModalityCount> {
    let target = node_id(NodeKind::Modality, modality.as_str());
    let mut counts: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for edge in graph
        .edges()
        .filter(|e| e.relationship == Relationship::HasSense && e.target_id == target)
    {
        for order in orders_of(graph, &edge.source_id) {
            counts.entry(order).or_default().insert(edge.source_id.clone());
        }
    }

    let mut rows: Vec<OrderModalityCount> = counts
        .into_iter()
        .map(|(order, members)| OrderModalityCount {
            order,
            members: to_u32(members.len()),
        })
        .collect();
    rows.sort_by(|a, b| b.members.cmp(&a.members).then_with(|| a.order.cmp(&b.order)));
    rows
}

/// For the `max_orders` orders with most members, the number of distinct
/// members having each canonical modality.
#[must_use]
pub fn order_modality_matrix(graph: &Graph, max_orders: usize) -> OrderModalityMatrix {
    let members = members_by_order(graph);

    let mut ranked: Vec<(&String, &BTreeSet<String>)> = members.iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_orders);

    let modalities: Vec<String> = ModalityDomain::ALL
        .iter()
        .map(|m| m.as_str().to_string())
        .collect();

    let mut cells = BTreeMap::new();
    for (order, order_members) in &ranked {
        let mut row = BTreeMap::new();
        for modality in ModalityDomain::ALL {
            let target = node_id(NodeKind::Modality, modality.as_str());
            let count = order_members
                .iter()
                .filter(|m| graph.has_edge(m, &target, Relationship::HasSense))
                .count();
            row.insert(modality.as_str().to_string(), to_u32(count));
        }
        cells.insert((*order).clone(), row);
    }

    OrderModalityMatrix {
        orders: ranked.into_iter().map(|(order, _)| order.clone()).collect(),
        modalities,
        cells,
    }
}
