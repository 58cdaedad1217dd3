pub mod clean;
pub mod reader;
pub mod writer;

pub use clean::{clean_course_records, clean_module_list};
pub use reader::{load_record_set, read_records, SourceWarning};
pub use writer::write_records;

use serde::Serialize;

/// A tabular record with a fixed, named column set.
///
/// Columns absent from a source are synthesized as empty strings, so
/// `from_fields` always receives exactly `COLUMNS.len()` values.
pub trait Record: Sized + Serialize {
    const COLUMNS: &'static [&'static str];

    fn from_fields(fields: Vec<String>) -> Self;
}

/// One course and its comma-separated modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CourseRecord {
    pub course_name: String,
    pub modules: String,
}

/// One trainer and the comma-separated courses they teach
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainerRecord {
    pub trainer_name: String,
    pub teaches: String,
}

/// One student enrollment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    pub student_name: String,
    pub enrolled: String,
}

/// One trainer and their comma-separated skills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrainerSkillRecord {
    pub trainer_name: String,
    pub skills: String,
}

fn take_two(fields: Vec<String>) -> (String, String) {
    let mut it = fields.into_iter();
    let a = it.next().unwrap_or_default();
    let b = it.next().unwrap_or_default();
    (a, b)
}

impl Record for CourseRecord {
    const COLUMNS: &'static [&'static str] = &["course_name", "modules"];

    fn from_fields(fields: Vec<String>) -> Self {
        let (course_name, modules) = take_two(fields);
        Self { course_name, modules }
    }
}

impl Record for TrainerRecord {
    const COLUMNS: &'static [&'static str] = &["trainer_name", "teaches"];

    fn from_fields(fields: Vec<String>) -> Self {
        let (trainer_name, teaches) = take_two(fields);
        Self { trainer_name, teaches }
    }
}

impl Record for StudentRecord {
    const COLUMNS: &'static [&'static str] = &["student_name", "enrolled"];

    fn from_fields(fields: Vec<String>) -> Self {
        let (student_name, enrolled) = take_two(fields);
        Self { student_name, enrolled }
    }
}

impl Record for TrainerSkillRecord {
    const COLUMNS: &'static [&'static str] = &["trainer_name", "skills"];

    fn from_fields(fields: Vec<String>) -> Self {
        let (trainer_name, skills) = take_two(fields);
        Self { trainer_name, skills }
    }
}

/// The four record sources a graph is built from.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub courses: Vec<CourseRecord>,
    pub trainers: Vec<TrainerRecord>,
    pub students: Vec<StudentRecord>,
    pub trainer_skills: Vec<TrainerSkillRecord>,
}

/// Split a comma-separated field into trimmed, non-empty pieces.
pub fn split_list(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(split_list("ETL, SQL, Pipelines"), vec!["ETL", "SQL", "Pipelines"]);
        assert_eq!(split_list(" a ,, ,b,"), vec!["a", "b"]);
        assert!(split_list("   ").is_empty());
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_from_fields_pads_missing_values() {
        let rec = CourseRecord::from_fields(vec!["Java".to_string()]);
        assert_eq!(rec.course_name, "Java");
        assert_eq!(rec.modules, "");
    }
}
