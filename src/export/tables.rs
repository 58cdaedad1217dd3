use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ensure_parent_dir;
use crate::error::Result;
use crate::graph::{KnowledgeGraph, NodeKind, Relation};

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRow {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// One row of the edge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub relation: Relation,
}

const NODE_COLUMNS: [&str; 2] = ["node", "type"];
const EDGE_COLUMNS: [&str; 3] = ["source", "target", "relation"];

/// Node rows in insertion order.
pub fn node_table(graph: &KnowledgeGraph) -> Vec<NodeRow> {
    graph
        .nodes()
        .map(|n| NodeRow {
            node: n.name.clone(),
            kind: n.kind,
        })
        .collect()
}

/// Edge rows in insertion order.
pub fn edge_table(graph: &KnowledgeGraph) -> Vec<EdgeRow> {
    graph
        .edges()
        .map(|e| EdgeRow {
            source: e.source,
            target: e.target,
            relation: e.relation,
        })
        .collect()
}

pub fn write_nodes_csv(path: &Path, graph: &KnowledgeGraph) -> Result<()> {
    write_table(path, &NODE_COLUMNS, &node_table(graph))
}

pub fn write_edges_csv(path: &Path, graph: &KnowledgeGraph) -> Result<()> {
    write_table(path, &EDGE_COLUMNS, &edge_table(graph))
}

fn write_table<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    ensure_parent_dir(path)?;

    // Header goes out explicitly so an empty table still has one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn small_graph() -> KnowledgeGraph {
        let mut g = KnowledgeGraph::new();
        let course = g.put_node("Data Engineering", NodeKind::Course);
        let module = g.put_node("ETL, Batch", NodeKind::Module);
        let student = g.put_node("Meera", NodeKind::Student);
        g.add_edge(course, module, Relation::HasModule);
        g.add_edge(student, course, Relation::EnrolledIn);
        g
    }

    #[test]
    fn test_tables_follow_insertion_order() {
        let g = small_graph();
        let nodes = node_table(&g);
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].node, "Data Engineering");
        assert_eq!(nodes[2].kind, NodeKind::Student);

        let edges = edge_table(&g);
        assert_eq!(
            edges,
            vec![
                EdgeRow {
                    source: "Data Engineering".to_string(),
                    target: "ETL, Batch".to_string(),
                    relation: Relation::HasModule,
                },
                EdgeRow {
                    source: "Meera".to_string(),
                    target: "Data Engineering".to_string(),
                    relation: Relation::EnrolledIn,
                },
            ]
        );
    }

    #[test]
    fn test_write_csv_tables() {
        let temp_dir = TempDir::new().unwrap();
        let nodes_path = temp_dir.path().join("out/nodes.csv");
        let edges_path = temp_dir.path().join("out/edges.csv");
        let g = small_graph();

        write_nodes_csv(&nodes_path, &g).unwrap();
        write_edges_csv(&edges_path, &g).unwrap();

        let nodes = std::fs::read_to_string(&nodes_path).unwrap();
        let mut lines = nodes.lines();
        assert_eq!(lines.next(), Some("node,type"));
        assert_eq!(lines.next(), Some("Data Engineering,Course"));
        assert_eq!(lines.next(), Some("\"ETL, Batch\",Module"));

        let edges = std::fs::read_to_string(&edges_path).unwrap();
        let mut lines = edges.lines();
        assert_eq!(lines.next(), Some("source,target,relation"));
        assert_eq!(lines.next(), Some("Data Engineering,\"ETL, Batch\",has_module"));
        assert_eq!(lines.next(), Some("Meera,Data Engineering,enrolled_in"));
    }

    #[test]
    fn test_empty_graph_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("edges.csv");
        write_edges_csv(&path, &KnowledgeGraph::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "source,target,relation\n");
    }
}
