//! Keyword/type seeded subgraph extraction with bounded BFS expansion.

use std::collections::{BTreeSet, HashSet, VecDeque};

use super::model::KnowledgeGraph;
use super::NodeKind;

/// A neighbourhood query over a built graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphQuery {
    /// Case-insensitive substring; empty matches every node.
    pub keyword: String,
    /// Only nodes of these types can seed the result.
    pub node_types: BTreeSet<NodeKind>,
    /// Rounds of expansion to direct successors and predecessors.
    pub hops: usize,
}

impl SubgraphQuery {
    pub fn new(
        keyword: impl Into<String>,
        node_types: impl IntoIterator<Item = NodeKind>,
        hops: usize,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            node_types: node_types.into_iter().collect(),
            hops,
        }
    }

    /// Query seeding from every node type.
    pub fn all_types(keyword: impl Into<String>, hops: usize) -> Self {
        Self::new(keyword, NodeKind::ALL, hops)
    }
}

/// Extract the induced subgraph around the nodes matching `query`.
///
/// Seeds are nodes whose type is allowed and whose lower-cased name contains
/// the trimmed, lower-cased keyword. Expansion ignores edge direction and node
/// type; edge inclusion keeps direction. No seeds means an empty graph. The
/// source graph is never modified.
pub fn filter_graph(graph: &KnowledgeGraph, query: &SubgraphQuery) -> KnowledgeGraph {
    let keyword = query.keyword.trim().to_lowercase();

    let seeds: Vec<_> = graph
        .node_indices()
        .filter(|&idx| {
            let node = graph.node_at(idx);
            query.node_types.contains(&node.kind)
                && (keyword.is_empty() || node.name.to_lowercase().contains(&keyword))
        })
        .collect();

    if seeds.is_empty() {
        log::debug!("No nodes match keyword '{}'", keyword);
        return KnowledgeGraph::new();
    }

    let mut visited: HashSet<_> = seeds.iter().copied().collect();
    let mut queue: VecDeque<_> = seeds.iter().map(|&idx| (idx, 0usize)).collect();

    while let Some((idx, depth)) = queue.pop_front() {
        if depth >= query.hops {
            continue;
        }
        for neighbor in graph.neighbors_undirected(idx) {
            if visited.insert(neighbor) {
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    let sub = graph.induced_subgraph(&visited);
    log::info!(
        "Filtered graph: {} seeds, {} nodes, {} edges (keyword='{}', hops={})",
        seeds.len(),
        sub.node_count(),
        sub.edge_count(),
        keyword,
        query.hops
    );
    sub
}
