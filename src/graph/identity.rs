//! Node identity: composite keys and the name → node index.
//!
//! Every node is keyed by `(name, kind)`, but display names are shared across
//! kinds in the record sources (a skill can be spelled exactly like a module).
//! The [`NameIndex`] keeps one node per trimmed name and resolves competing
//! kinds explicitly: an overwriting claim retypes the node (last write wins)
//! while a keep-existing claim reuses whatever kind is already there.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use super::NodeKind;

/// Composite node key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub name: String,
    pub kind: NodeKind,
}

impl NodeKey {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into().trim().to_string(),
            kind,
        }
    }
}

/// How a claim treats a name that already exists under another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimMode {
    /// Retype the existing node to the claimed kind.
    Overwrite,
    /// Reuse the existing node unchanged.
    KeepExisting,
}

/// Outcome of claiming a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Created(NodeIndex),
    Reused(NodeIndex),
    Retyped { index: NodeIndex, previous: NodeKind },
}

impl Claim {
    pub fn index(&self) -> NodeIndex {
        match *self {
            Claim::Created(index) | Claim::Reused(index) => index,
            Claim::Retyped { index, .. } => index,
        }
    }
}

/// A name that was claimed by two different kinds during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    pub name: String,
    pub previous: NodeKind,
    pub current: NodeKind,
}

#[derive(Debug, Clone)]
struct NameSlot {
    index: NodeIndex,
    current: NodeKind,
    /// Every kind that ever claimed this name, first claim first.
    candidates: Vec<NodeKind>,
}

/// Lookup from trimmed display name to the single node carrying it.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    slots: HashMap<String, NameSlot>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name` for `kind`. `allocate` is only called when the name is new.
    pub fn claim<F>(&mut self, name: &str, kind: NodeKind, mode: ClaimMode, allocate: F) -> Claim
    where
        F: FnOnce() -> NodeIndex,
    {
        if let Some(slot) = self.slots.get_mut(name) {
            if !slot.candidates.contains(&kind) {
                slot.candidates.push(kind);
            }
            if slot.current == kind || mode == ClaimMode::KeepExisting {
                return Claim::Reused(slot.index);
            }
            let previous = slot.current;
            slot.current = kind;
            return Claim::Retyped {
                index: slot.index,
                previous,
            };
        }

        let index = allocate();
        self.slots.insert(
            name.to_string(),
            NameSlot {
                index,
                current: kind,
                candidates: vec![kind],
            },
        );
        Claim::Created(index)
    }

    pub fn get(&self, name: &str) -> Option<NodeIndex> {
        self.slots.get(name).map(|s| s.index)
    }

    /// The kind the name currently resolves to.
    pub fn current_kind(&self, name: &str) -> Option<NodeKind> {
        self.slots.get(name).map(|s| s.current)
    }

    /// Every kind that claimed `name`, in claim order. Empty if unknown.
    pub fn candidates(&self, name: &str) -> &[NodeKind] {
        self.slots
            .get(name)
            .map(|s| s.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a composite key; only matches when the name currently has that kind.
    pub fn resolve(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.slots
            .get(&key.name)
            .filter(|s| s.current == key.kind)
            .map(|s| s.index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(counter: &mut usize) -> impl FnOnce() -> NodeIndex + '_ {
        move || {
            let idx = NodeIndex::new(*counter);
            *counter += 1;
            idx
        }
    }

    #[test]
    fn test_claim_creates_then_reuses() {
        let mut index = NameIndex::new();
        let mut next = 0;
        let first = index.claim("SQL", NodeKind::Module, ClaimMode::Overwrite, alloc(&mut next));
        let second = index.claim("SQL", NodeKind::Module, ClaimMode::Overwrite, alloc(&mut next));
        assert!(matches!(first, Claim::Created(_)));
        assert_eq!(second, Claim::Reused(first.index()));
        assert_eq!(next, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_overwrite_claim_retypes_last_write_wins() {
        let mut index = NameIndex::new();
        let mut next = 0;
        index.claim("python", NodeKind::Module, ClaimMode::Overwrite, alloc(&mut next));
        let claim = index.claim("python", NodeKind::Skill, ClaimMode::Overwrite, alloc(&mut next));
        assert!(matches!(
            claim,
            Claim::Retyped { previous: NodeKind::Module, .. }
        ));
        assert_eq!(index.current_kind("python"), Some(NodeKind::Skill));
        assert_eq!(index.candidates("python"), &[NodeKind::Module, NodeKind::Skill]);
    }

    #[test]
    fn test_keep_existing_claim_preserves_kind() {
        let mut index = NameIndex::new();
        let mut next = 0;
        index.claim("Testing", NodeKind::Module, ClaimMode::Overwrite, alloc(&mut next));
        let claim = index.claim("Testing", NodeKind::Course, ClaimMode::KeepExisting, alloc(&mut next));
        assert!(matches!(claim, Claim::Reused(_)));
        assert_eq!(index.current_kind("Testing"), Some(NodeKind::Module));
        assert_eq!(index.candidates("Testing").len(), 2);
    }

    #[test]
    fn test_resolve_requires_current_kind() {
        let mut index = NameIndex::new();
        let mut next = 0;
        index.claim("Alice", NodeKind::Student, ClaimMode::Overwrite, alloc(&mut next));
        assert!(index.resolve(&NodeKey::new("Alice", NodeKind::Student)).is_some());
        assert!(index.resolve(&NodeKey::new(" Alice ", NodeKind::Student)).is_some());
        assert!(index.resolve(&NodeKey::new("Alice", NodeKind::Trainer)).is_none());
        assert!(index.candidates("Bob").is_empty());
    }
}
