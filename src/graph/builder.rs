//! Graph construction from the four record sources.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use super::inference::{
    infer_skill_modules, infer_trainer_courses, matcher_from_config, RelevanceMatcher,
    SubstringMatcher,
};
use super::model::KnowledgeGraph;
use super::{NodeKind, Relation};
use crate::config::InferenceConfig;
use crate::records::{
    split_list, CourseRecord, RecordSet, StudentRecord, TrainerRecord, TrainerSkillRecord,
};

/// Builds a [`KnowledgeGraph`] from record sources.
///
/// A build is a pure function of its inputs: the same rows in the same order
/// always produce the same nodes and edges in the same order. Rows missing
/// their identity field are skipped, never reported as errors.
pub struct GraphBuilder {
    matcher: Box<dyn RelevanceMatcher>,
}

impl GraphBuilder {
    /// Builder using plain substring containment for inference.
    pub fn new() -> Self {
        Self::with_matcher(Box::new(SubstringMatcher))
    }

    pub fn with_matcher(matcher: Box<dyn RelevanceMatcher>) -> Self {
        Self { matcher }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::with_matcher(matcher_from_config(config))
    }

    /// Build the full graph from a loaded record set.
    pub fn build(&self, records: &RecordSet) -> KnowledgeGraph {
        self.build_from_parts(
            &records.courses,
            &records.trainer_skills,
            Some(records.trainers.as_slice()),
            &records.students,
        )
    }

    /// Build from individual sources; `trainers` is optional and `None` reads as empty.
    pub fn build_from_parts(
        &self,
        courses: &[CourseRecord],
        trainer_skills: &[TrainerSkillRecord],
        trainers: Option<&[TrainerRecord]>,
        students: &[StudentRecord],
    ) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();

        self.ingest_courses(&mut graph, courses);
        self.ingest_trainers(&mut graph, trainers.unwrap_or(&[]));
        self.ingest_students(&mut graph, students);
        let skill_sets = self.ingest_trainer_skills(&mut graph, trainer_skills);

        if !trainer_skills.is_empty() {
            let relevant = infer_skill_modules(&mut graph, self.matcher.as_ref());
            let teaches = infer_trainer_courses(&mut graph, &skill_sets, self.matcher.as_ref());
            log::debug!("Inferred edges: relevant_to={}, teaches={}", relevant, teaches);
        }

        if !graph.collisions().is_empty() {
            log::debug!("{} node identity collision(s) resolved by last write", graph.collisions().len());
        }
        log::info!(
            "Built graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    fn ingest_courses(&self, graph: &mut KnowledgeGraph, courses: &[CourseRecord]) {
        for record in courses {
            let course = record.course_name.trim();
            if course.is_empty() {
                log::trace!("Skipping course row without course_name");
                continue;
            }
            let course_idx = graph.put_node(course, NodeKind::Course);
            for module in split_list(&record.modules) {
                let module_idx = graph.put_node(&module, NodeKind::Module);
                graph.add_edge(course_idx, module_idx, Relation::HasModule);
            }
        }
    }

    fn ingest_trainers(&self, graph: &mut KnowledgeGraph, trainers: &[TrainerRecord]) {
        for record in trainers {
            let trainer = record.trainer_name.trim();
            if trainer.is_empty() {
                log::trace!("Skipping trainer row without trainer_name");
                continue;
            }
            let trainer_idx = graph.put_node(trainer, NodeKind::Trainer);
            for course in split_list(&record.teaches) {
                let course_idx = graph.ensure_node(&course, NodeKind::Course);
                graph.add_edge(trainer_idx, course_idx, Relation::Teaches);
            }
        }
    }

    fn ingest_students(&self, graph: &mut KnowledgeGraph, students: &[StudentRecord]) {
        for record in students {
            let student = record.student_name.trim();
            let course = record.enrolled.trim();
            if student.is_empty() || course.is_empty() {
                log::trace!("Skipping student row without student_name or enrolled");
                continue;
            }
            let course_idx = graph.ensure_node(course, NodeKind::Course);
            let student_idx = graph.put_node(student, NodeKind::Student);
            graph.add_edge(student_idx, course_idx, Relation::EnrolledIn);
        }
    }

    /// Ingest trainer skills; returns each trainer's skill set, first-seen order.
    fn ingest_trainer_skills(
        &self,
        graph: &mut KnowledgeGraph,
        trainer_skills: &[TrainerSkillRecord],
    ) -> Vec<(NodeIndex, Vec<String>)> {
        let mut sets: Vec<(NodeIndex, Vec<String>)> = Vec::new();
        let mut positions: HashMap<NodeIndex, usize> = HashMap::new();

        for record in trainer_skills {
            let trainer = record.trainer_name.trim();
            if trainer.is_empty() {
                log::trace!("Skipping trainer skill row without trainer_name");
                continue;
            }
            let trainer_idx = graph.put_node(trainer, NodeKind::Trainer);
            let pos = *positions.entry(trainer_idx).or_insert_with(|| {
                sets.push((trainer_idx, Vec::new()));
                sets.len() - 1
            });

            for skill in split_list(&record.skills) {
                let skill = skill.to_lowercase();
                let skill_idx = graph.put_node(&skill, NodeKind::Skill);
                graph.add_edge(trainer_idx, skill_idx, Relation::SkilledIn);
                if !sets[pos].1.contains(&skill) {
                    sets[pos].1.push(skill);
                }
            }
        }
        sets
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
