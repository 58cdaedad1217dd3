//! Containment-based relationship inference.
//!
//! Skills are linked to modules, and trainers to courses, when a skill string
//! appears inside module text. Plain substring containment is the default and
//! is intentionally loose: a short skill such as `c` matches inside unrelated
//! module names. Stricter matchers are available through [`RelevanceMatcher`].

use petgraph::graph::NodeIndex;
use petgraph::Direction;

use super::model::KnowledgeGraph;
use super::{NodeKind, Relation};
use crate::config::{InferenceConfig, MatcherKind};
use crate::records::{split_list, CourseRecord, TrainerRecord, TrainerSkillRecord};

/// Decides whether a candidate phrase is relevant to a target text.
///
/// Callers lower-case both arguments before asking.
pub trait RelevanceMatcher: Send + Sync {
    fn is_relevant(&self, phrase: &str, text: &str) -> bool;
}

/// `phrase` occurs anywhere in `text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl RelevanceMatcher for SubstringMatcher {
    fn is_relevant(&self, phrase: &str, text: &str) -> bool {
        !phrase.is_empty() && text.contains(phrase)
    }
}

/// `phrase` occurs in `text` with no letter or digit directly on either side.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBoundaryMatcher;

impl RelevanceMatcher for WordBoundaryMatcher {
    fn is_relevant(&self, phrase: &str, text: &str) -> bool {
        if phrase.is_empty() {
            return false;
        }
        text.char_indices().any(|(start, _)| {
            if !text[start..].starts_with(phrase) {
                return false;
            }
            let before = text[..start].chars().next_back();
            let after = text[start + phrase.len()..].chars().next();
            before.map_or(true, |c| !c.is_alphanumeric())
                && after.map_or(true, |c| !c.is_alphanumeric())
        })
    }
}

/// Rejects phrases shorter than `min_len` characters, then defers to `inner`.
#[derive(Debug, Clone, Copy)]
pub struct MinLengthMatcher<M> {
    inner: M,
    min_len: usize,
}

impl<M: RelevanceMatcher> MinLengthMatcher<M> {
    pub fn new(inner: M, min_len: usize) -> Self {
        Self { inner, min_len }
    }
}

impl<M: RelevanceMatcher> RelevanceMatcher for MinLengthMatcher<M> {
    fn is_relevant(&self, phrase: &str, text: &str) -> bool {
        phrase.chars().count() >= self.min_len && self.inner.is_relevant(phrase, text)
    }
}

/// Build the matcher selected by the `[inference]` config section.
pub fn matcher_from_config(config: &InferenceConfig) -> Box<dyn RelevanceMatcher> {
    match (config.matcher, config.min_token_len) {
        (MatcherKind::Substring, 0) => Box::new(SubstringMatcher),
        (MatcherKind::Substring, n) => Box::new(MinLengthMatcher::new(SubstringMatcher, n)),
        (MatcherKind::WordBoundary, 0) => Box::new(WordBoundaryMatcher),
        (MatcherKind::WordBoundary, n) => Box::new(MinLengthMatcher::new(WordBoundaryMatcher, n)),
    }
}

/// Add `relevant_to` edges from every Skill to every Module whose name contains it.
pub(crate) fn infer_skill_modules(graph: &mut KnowledgeGraph, matcher: &dyn RelevanceMatcher) -> usize {
    let skills: Vec<(NodeIndex, String)> = graph
        .indices_of_kind(NodeKind::Skill)
        .into_iter()
        .map(|idx| (idx, graph.node_at(idx).name.to_lowercase()))
        .collect();
    let modules: Vec<(NodeIndex, String)> = graph
        .indices_of_kind(NodeKind::Module)
        .into_iter()
        .map(|idx| (idx, graph.node_at(idx).name.to_lowercase()))
        .collect();

    let mut added = 0;
    for (module_idx, module_text) in &modules {
        for (skill_idx, skill) in &skills {
            if matcher.is_relevant(skill, module_text)
                && graph.add_edge(*skill_idx, *module_idx, Relation::RelevantTo)
            {
                added += 1;
            }
        }
    }
    added
}

/// Add inferred `teaches` edges from trainers to courses whose module text
/// contains any of the trainer's skills.
///
/// `trainer_skills` pairs each trainer node with its lower-cased skills.
/// Trainers without skills are skipped.
pub(crate) fn infer_trainer_courses(
    graph: &mut KnowledgeGraph,
    trainer_skills: &[(NodeIndex, Vec<String>)],
    matcher: &dyn RelevanceMatcher,
) -> usize {
    let courses: Vec<(NodeIndex, String)> = graph
        .indices_of_kind(NodeKind::Course)
        .into_iter()
        .map(|idx| (idx, course_text(&*graph, idx)))
        .collect();

    let mut added = 0;
    for (trainer_idx, skills) in trainer_skills {
        if skills.is_empty() {
            continue;
        }
        for (course_idx, text) in &courses {
            if skills.iter().any(|sk| matcher.is_relevant(sk, text))
                && graph.add_edge(*trainer_idx, *course_idx, Relation::Teaches)
            {
                added += 1;
            }
        }
    }
    added
}

/// The course's module names, lower-cased and joined in insertion order.
fn course_text(graph: &KnowledgeGraph, course: NodeIndex) -> String {
    graph
        .related(course, Relation::HasModule, Direction::Outgoing)
        .into_iter()
        .map(|idx| graph.node_at(idx).name.to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Derive the trainer → taught-courses dataset from course modules and trainer skills.
///
/// One output row per named trainer row. `teaches` lists each matching
/// course once, in course order; trainers without skills teach nothing.
pub fn derive_trainer_records(
    courses: &[CourseRecord],
    trainer_skills: &[TrainerSkillRecord],
    matcher: &dyn RelevanceMatcher,
) -> Vec<TrainerRecord> {
    let course_texts: Vec<(&str, String)> = courses
        .iter()
        .map(|c| (c.course_name.trim(), c.modules.to_lowercase()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    let mut rows = Vec::new();
    for record in trainer_skills {
        let trainer = record.trainer_name.trim();
        if trainer.is_empty() {
            continue;
        }
        let skills: Vec<String> = split_list(&record.skills)
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();

        let mut teaches: Vec<&str> = Vec::new();
        if !skills.is_empty() {
            for (course, text) in &course_texts {
                if !teaches.contains(course) && skills.iter().any(|sk| matcher.is_relevant(sk, text)) {
                    teaches.push(*course);
                }
            }
        }

        rows.push(TrainerRecord {
            trainer_name: trainer.to_string(),
            teaches: teaches.join(", "),
        });
    }
    rows
}
