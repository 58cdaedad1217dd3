//! Knowledge graph module: typed model, ingestion, inference and filtering.
//!
//! Record sources are linked into one directed graph of courses, modules,
//! trainers, skills and students. Relations the records do not state
//! explicitly are inferred by containment matching, and keyword queries
//! extract bounded neighbourhoods of the result.

mod builder;
mod filter;
mod identity;
mod inference;
mod model;

pub use builder::GraphBuilder;
pub use filter::{filter_graph, SubgraphQuery};
pub use identity::{Claim, ClaimMode, Collision, NameIndex, NodeKey};
pub use inference::{
    derive_trainer_records, matcher_from_config, MinLengthMatcher, RelevanceMatcher,
    SubstringMatcher, WordBoundaryMatcher,
};
pub use model::KnowledgeGraph;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CourseGraphError;

/// The closed set of node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Course,
    Module,
    Trainer,
    Student,
    Skill,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Course,
        NodeKind::Module,
        NodeKind::Trainer,
        NodeKind::Student,
        NodeKind::Skill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Course => "Course",
            NodeKind::Module => "Module",
            NodeKind::Trainer => "Trainer",
            NodeKind::Student => "Student",
            NodeKind::Skill => "Skill",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = CourseGraphError;

    /// Case-insensitive, so `course` and `Course` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CourseGraphError::Parse(format!("Unknown node type: {}", s)))
    }
}

/// The closed set of edge relations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Course → Module
    HasModule,
    /// Trainer → Course, explicit or inferred
    Teaches,
    /// Student → Course
    EnrolledIn,
    /// Trainer → Skill
    SkilledIn,
    /// Skill → Module, inferred
    RelevantTo,
}

impl Relation {
    pub const ALL: [Relation; 5] = [
        Relation::HasModule,
        Relation::Teaches,
        Relation::EnrolledIn,
        Relation::SkilledIn,
        Relation::RelevantTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::HasModule => "has_module",
            Relation::Teaches => "teaches",
            Relation::EnrolledIn => "enrolled_in",
            Relation::SkilledIn => "skilled_in",
            Relation::RelevantTo => "relevant_to",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = CourseGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| CourseGraphError::Parse(format!("Unknown relation: {}", s)))
    }
}

/// A node: its display string is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
}

/// A single edge in the knowledge graph (source --relation--> target).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}
