pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod records;
pub mod session;

pub use config::Config;
pub use error::{CourseGraphError, Result};
pub use graph::{
    filter_graph, GraphBuilder, KnowledgeGraph, NodeKind, Relation, SubgraphQuery,
};
pub use session::GraphContext;
