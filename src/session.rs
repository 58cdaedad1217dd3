//! Explicit owner of a built graph for a filtering/rendering session.

use crate::config::SourcesConfig;
use crate::error::Result;
use crate::graph::{filter_graph, GraphBuilder, KnowledgeGraph, SubgraphQuery};
use crate::records::{load_record_set, SourceWarning};

/// A built graph plus the non-fatal warnings produced while loading its sources.
///
/// Filter calls borrow the context and return new graphs, so any number of
/// them can run against one build.
#[derive(Debug, Clone)]
pub struct GraphContext {
    graph: KnowledgeGraph,
    warnings: Vec<SourceWarning>,
}

impl GraphContext {
    /// Load every source and build a fresh graph.
    pub fn build(sources: &SourcesConfig, builder: &GraphBuilder) -> Result<Self> {
        let (records, warnings) = load_record_set(sources)?;
        let graph = builder.build(&records);
        Ok(Self { graph, warnings })
    }

    pub fn from_graph(graph: KnowledgeGraph) -> Self {
        Self {
            graph,
            warnings: Vec::new(),
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn warnings(&self) -> &[SourceWarning] {
        &self.warnings
    }

    pub fn filter(&self, query: &SubgraphQuery) -> KnowledgeGraph {
        filter_graph(&self.graph, query)
    }

    pub fn into_graph(self) -> KnowledgeGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, Relation};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn sources_in(dir: &Path) -> SourcesConfig {
        SourcesConfig {
            courses: dir.join("courses_and_modules.csv"),
            trainers: dir.join("trainers.csv"),
            students: dir.join("students.csv"),
            trainer_skills: dir.join("trainer_skills.csv"),
        }
    }

    #[test]
    fn test_build_with_missing_sources_warns() {
        let temp_dir = TempDir::new().unwrap();
        let sources = sources_in(temp_dir.path());
        fs::write(
            &sources.courses,
            "course_name,modules\nData Engineering,\"ETL, SQL\"\n",
        )
        .unwrap();
        fs::write(&sources.trainer_skills, "trainer_name,skills\nAsha,sql\n").unwrap();

        let ctx = GraphContext::build(&sources, &GraphBuilder::new()).unwrap();
        assert_eq!(ctx.warnings().len(), 2);
        assert!(ctx
            .warnings()
            .iter()
            .all(|w| matches!(w, SourceWarning::MissingSource { .. })));
        assert!(ctx.graph().has_edge("Asha", "Data Engineering", Relation::Teaches));
        assert!(ctx.graph().has_edge("sql", "SQL", Relation::RelevantTo));
    }

    #[test]
    fn test_all_sources_missing_is_empty_graph() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = GraphContext::build(&sources_in(temp_dir.path()), &GraphBuilder::new()).unwrap();
        assert!(ctx.graph().is_empty());
        assert_eq!(ctx.warnings().len(), 4);
    }

    #[test]
    fn test_unreadable_source_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let sources = sources_in(temp_dir.path());
        // Unequal field counts are fine; invalid UTF-8 is not.
        fs::write(&sources.students, b"student_name,enrolled\n\xff\xfe,x\n").unwrap();
        assert!(GraphContext::build(&sources, &GraphBuilder::new()).is_err());
    }

    #[test]
    fn test_repeated_filters_leave_graph_untouched() {
        let mut g = KnowledgeGraph::new();
        let c = g.put_node("Data Engineering", NodeKind::Course);
        let m = g.put_node("ETL", NodeKind::Module);
        g.add_edge(c, m, Relation::HasModule);
        let ctx = GraphContext::from_graph(g);

        let a = ctx.filter(&SubgraphQuery::new("etl", [NodeKind::Module], 0));
        let b = ctx.filter(&SubgraphQuery::all_types("data", 1));
        assert_eq!(a.node_count(), 1);
        assert_eq!(b.node_count(), 2);
        assert_eq!(ctx.graph().node_count(), 2);
        assert_eq!(ctx.graph().edge_count(), 1);
    }
}
