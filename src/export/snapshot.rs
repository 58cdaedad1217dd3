//! Full-fidelity JSON snapshot of a built graph.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ensure_parent_dir;
use crate::error::{CourseGraphError, Result};
use crate::graph::{Edge, KnowledgeGraph, Node};

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            created_at: Utc::now(),
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().collect(),
        }
    }

    /// Rebuild the graph. Nodes and edges keep their stored order.
    pub fn into_graph(self) -> Result<KnowledgeGraph> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CourseGraphError::InvalidInput(format!(
                "Unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }

        let mut graph = KnowledgeGraph::new();
        for node in &self.nodes {
            if node.name.trim().is_empty() {
                return Err(CourseGraphError::InvalidInput(
                    "Snapshot contains a node with an empty name".to_string(),
                ));
            }
            graph.put_node(&node.name, node.kind);
        }
        for edge in &self.edges {
            graph.add_edge_by_name(&edge.source, &edge.target, edge.relation)?;
        }
        Ok(graph)
    }
}

pub fn save_snapshot(path: &Path, graph: &KnowledgeGraph) -> Result<()> {
    ensure_parent_dir(path)?;
    let snapshot = GraphSnapshot::from_graph(graph);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;

    log::info!(
        "Saved snapshot ({} nodes, {} edges) to {}",
        snapshot.nodes.len(),
        snapshot.edges.len(),
        path.display()
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<KnowledgeGraph> {
    let json = fs::read_to_string(path)?;
    let snapshot: GraphSnapshot = serde_json::from_str(&json)?;
    log::debug!(
        "Loaded snapshot v{} created at {}",
        snapshot.version,
        snapshot.created_at.to_rfc3339()
    );
    snapshot.into_graph()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeKind, Relation};
    use crate::records::{CourseRecord, RecordSet, StudentRecord, TrainerRecord, TrainerSkillRecord};
    use tempfile::TempDir;

    fn built_graph() -> KnowledgeGraph {
        let records = RecordSet {
            courses: vec![CourseRecord {
                course_name: "Data Engineering".to_string(),
                modules: "ETL, SQL".to_string(),
            }],
            trainers: vec![TrainerRecord {
                trainer_name: "Ravi".to_string(),
                teaches: "Cloud Basics".to_string(),
            }],
            students: vec![StudentRecord {
                student_name: "Meera".to_string(),
                enrolled: "Data Engineering".to_string(),
            }],
            trainer_skills: vec![TrainerSkillRecord {
                trainer_name: "Asha".to_string(),
                skills: "sql, etl".to_string(),
            }],
        };
        GraphBuilder::new().build(&records)
    }

    #[test]
    fn test_snapshot_reload_is_identical() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/knowledge_graph.json");
        let original = built_graph();

        save_snapshot(&path, &original).unwrap();
        let reloaded = load_snapshot(&path).unwrap();

        assert_eq!(
            reloaded.nodes().collect::<Vec<_>>(),
            original.nodes().collect::<Vec<_>>()
        );
        assert_eq!(
            reloaded.edges().collect::<Vec<_>>(),
            original.edges().collect::<Vec<_>>()
        );
        assert_eq!(reloaded.kind_of("Cloud Basics"), Some(NodeKind::Course));
        assert!(reloaded.has_edge("sql", "SQL", Relation::RelevantTo));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = GraphSnapshot::from_graph(&built_graph());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["created_at"].is_string());
        assert_eq!(value["nodes"][0]["name"], "Data Engineering");
        assert_eq!(value["nodes"][0]["kind"], "Course");
        assert_eq!(value["edges"][0]["relation"], "has_module");
    }

    #[test]
    fn test_edge_to_unknown_node_rejected() {
        let json = r#"{
            "version": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "nodes": [{"name": "Data Engineering", "kind": "Course"}],
            "edges": [{"source": "Data Engineering", "target": "Ghost", "relation": "has_module"}]
        }"#;
        let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
        let err = snapshot.into_graph().unwrap_err();
        assert!(matches!(err, CourseGraphError::InvalidInput(_)));
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let json = r#"{"version": 99, "created_at": "2024-01-01T00:00:00Z", "nodes": [], "edges": []}"#;
        let snapshot: GraphSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.into_graph().is_err());
    }

    #[test]
    fn test_corrupt_snapshot_is_snapshot_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_snapshot(&path).unwrap_err(),
            CourseGraphError::Snapshot(_)
        ));
    }
}
