//! In-memory knowledge graph over petgraph.

use std::collections::{BTreeMap, HashSet};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::identity::{Claim, ClaimMode, Collision, NameIndex, NodeKey};
use super::{Edge, Node, NodeKind, Relation};
use crate::error::{CourseGraphError, Result};

/// Directed, typed, attributed graph of courses, modules, trainers, skills and students.
///
/// Nodes and edges enumerate in insertion order, so two builds over the same
/// rows produce identical enumerations. At most one node exists per trimmed
/// name and at most one edge per `(source, target, relation)` triple.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<Node, Relation>,
    names: NameIndex,
    edge_set: HashSet<(NodeIndex, NodeIndex, Relation)>,
    collisions: Vec<Collision>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the node or retype an existing one (last write wins).
    pub fn put_node(&mut self, name: &str, kind: NodeKind) -> NodeIndex {
        self.claim(name, kind, ClaimMode::Overwrite)
    }

    /// Create the node only if the name is unknown; an existing node keeps its kind.
    pub fn ensure_node(&mut self, name: &str, kind: NodeKind) -> NodeIndex {
        self.claim(name, kind, ClaimMode::KeepExisting)
    }

    fn claim(&mut self, name: &str, kind: NodeKind, mode: ClaimMode) -> NodeIndex {
        let name = name.trim();
        debug_assert!(!name.is_empty(), "node names are never empty");

        let graph = &mut self.graph;
        let claim = self.names.claim(name, kind, mode, || {
            graph.add_node(Node {
                name: name.to_string(),
                kind,
            })
        });

        if let Claim::Retyped { index, previous } = claim {
            log::debug!("Identity collision on '{}': {} -> {}", name, previous, kind);
            self.graph[index].kind = kind;
            self.collisions.push(Collision {
                name: name.to_string(),
                previous,
                current: kind,
            });
        }
        claim.index()
    }

    /// Add an edge. Returns false when the triple already exists.
    ///
    /// Self-loops can only arise from identity collisions and are dropped.
    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, relation: Relation) -> bool {
        if source == target {
            log::debug!("Dropping {} self-loop on '{}'", relation, self.graph[source].name);
            return false;
        }
        if !self.edge_set.insert((source, target, relation)) {
            return false;
        }
        self.graph.add_edge(source, target, relation);
        true
    }

    /// Add an edge between two existing nodes identified by name.
    pub fn add_edge_by_name(&mut self, source: &str, target: &str, relation: Relation) -> Result<bool> {
        let from = self.index_of(source).ok_or_else(|| {
            CourseGraphError::InvalidInput(format!("Edge source node not found: {}", source))
        })?;
        let to = self.index_of(target).ok_or_else(|| {
            CourseGraphError::InvalidInput(format!("Edge target node not found: {}", target))
        })?;
        Ok(self.add_edge(from, to, relation))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().map(move |e| Edge {
            source: self.graph[e.source()].name.clone(),
            target: self.graph[e.target()].name.clone(),
            relation: *e.weight(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.get(name.trim()).is_some()
    }

    pub fn kind_of(&self, name: &str) -> Option<NodeKind> {
        self.names.current_kind(name.trim())
    }

    /// Kinds that claimed `name` during the build, in claim order.
    pub fn candidates(&self, name: &str) -> &[NodeKind] {
        self.names.candidates(name.trim())
    }

    /// Look up a node by composite key.
    pub fn lookup(&self, key: &NodeKey) -> Option<&Node> {
        self.names.resolve(key).map(|idx| &self.graph[idx])
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn has_edge(&self, source: &str, target: &str, relation: Relation) -> bool {
        match (self.index_of(source), self.index_of(target)) {
            (Some(s), Some(t)) => self.edge_set.contains(&(s, t, relation)),
            _ => false,
        }
    }

    /// Direct successors of `name`, in edge insertion order.
    pub fn successors(&self, name: &str) -> Vec<&str> {
        self.neighbors_in_order(name, Direction::Outgoing)
    }

    /// Direct predecessors of `name`, in edge insertion order.
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        self.neighbors_in_order(name, Direction::Incoming)
    }

    fn neighbors_in_order(&self, name: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.index_of(name) else {
            return Vec::new();
        };
        self.edges_in_order(idx, direction)
            .into_iter()
            .map(|(other, _)| self.graph[other].name.as_str())
            .collect()
    }

    /// Total degree (in + out).
    pub fn degree(&self, name: &str) -> usize {
        self.index_of(name)
            .map(|idx| {
                self.graph.edges_directed(idx, Direction::Outgoing).count()
                    + self.graph.edges_directed(idx, Direction::Incoming).count()
            })
            .unwrap_or(0)
    }

    pub fn count_by_kind(&self) -> BTreeMap<NodeKind, usize> {
        let mut counts = BTreeMap::new();
        for node in self.graph.node_weights() {
            *counts.entry(node.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_by_relation(&self) -> BTreeMap<Relation, usize> {
        let mut counts = BTreeMap::new();
        for rel in self.graph.edge_weights() {
            *counts.entry(*rel).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.names.get(name.trim())
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.graph[idx]
    }

    pub(crate) fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Indices of nodes whose current kind is `kind`, in insertion order.
    pub(crate) fn indices_of_kind(&self, kind: NodeKind) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.graph[idx].kind == kind)
            .collect()
    }

    /// Neighbours of `idx` along `relation`, ordered by edge insertion.
    pub(crate) fn related(&self, idx: NodeIndex, relation: Relation, direction: Direction) -> Vec<NodeIndex> {
        self.edges_in_order(idx, direction)
            .into_iter()
            .filter(|(_, rel)| *rel == relation)
            .map(|(other, _)| other)
            .collect()
    }

    /// Successors and predecessors together; direction is ignored.
    pub(crate) fn neighbors_undirected(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_undirected(idx)
    }

    fn edges_in_order(&self, idx: NodeIndex, direction: Direction) -> Vec<(NodeIndex, Relation)> {
        // petgraph walks adjacency lists newest first; sort back to insertion order.
        let mut edges: Vec<(EdgeIndex, NodeIndex, Relation)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id(), other, *e.weight())
            })
            .collect();
        edges.sort_by_key(|(id, _, _)| *id);
        edges.into_iter().map(|(_, other, rel)| (other, rel)).collect()
    }

    /// Copy of the graph restricted to `keep` and the edges between them.
    pub(crate) fn induced_subgraph(&self, keep: &HashSet<NodeIndex>) -> KnowledgeGraph {
        let mut sub = KnowledgeGraph::new();
        let mut mapping = BTreeMap::new();
        for idx in self.graph.node_indices().filter(|idx| keep.contains(idx)) {
            let node = &self.graph[idx];
            mapping.insert(idx, sub.put_node(&node.name, node.kind));
        }
        for edge in self.graph.edge_references() {
            if let (Some(&s), Some(&t)) = (mapping.get(&edge.source()), mapping.get(&edge.target())) {
                sub.add_edge(s, t, *edge.weight());
            }
        }
        sub
    }
}
