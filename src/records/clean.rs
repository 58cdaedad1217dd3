//! Cleanup of raw module text scraped from course brochures.

use std::sync::OnceLock;

use regex::Regex;

use super::CourseRecord;

/// Pieces longer than this are paragraph artifacts, not module names.
const MAX_MODULE_CHARS: usize = 80;

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[;•\-\n]+").expect("Invalid regex pattern"))
}

fn splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,\n]+").expect("Invalid regex pattern"))
}

fn numbering() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[\)\.\- ]+").expect("Invalid regex pattern"))
}

fn module_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^Module\s*\d+[:\- ]*").expect("Invalid regex pattern"))
}

/// Split raw module text into clean module names.
///
/// Bullets, semicolons, dashes and newlines become separators; numbering and
/// `Module N:` prefixes are stripped; empty, single-character and overlong
/// pieces are dropped.
pub fn clean_module_list(raw: &str) -> Vec<String> {
    let text = separators().replace_all(raw.trim(), "\n");

    let mut cleaned = Vec::new();
    for piece in splitter().split(&text) {
        let piece = piece.trim();
        if piece.is_empty() || piece.chars().count() > MAX_MODULE_CHARS {
            continue;
        }

        let piece = numbering().replace(piece, "");
        let piece = module_prefix().replace(&piece, "");
        let piece = piece.replace('•', "");
        let piece = piece.trim();

        if piece.chars().count() > 1 {
            cleaned.push(piece.to_string());
        }
    }
    cleaned
}

/// Clean the modules column of every course row, re-joining with `", "`.
pub fn clean_course_records(records: &[CourseRecord]) -> Vec<CourseRecord> {
    records
        .iter()
        .map(|r| CourseRecord {
            course_name: r.course_name.clone(),
            modules: clean_module_list(&r.modules).join(", "),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_numbering_and_prefixes() {
        let raw = "1. Python Basics; 2) Data Types\nModule 3: Loops, •Functions";
        assert_eq!(
            clean_module_list(raw),
            vec!["Python Basics", "Data Types", "Loops", "Functions"]
        );
    }

    #[test]
    fn test_clean_drops_long_and_tiny_pieces() {
        let long = "x".repeat(81);
        let raw = format!("SQL, {}, a, NoSQL", long);
        assert_eq!(clean_module_list(&raw), vec!["SQL", "NoSQL"]);
    }

    #[test]
    fn test_clean_module_prefix_case_insensitive() {
        assert_eq!(clean_module_list("MODULE 12 Cloud Basics"), vec!["Cloud Basics"]);
    }

    #[test]
    fn test_clean_empty_input() {
        assert!(clean_module_list("").is_empty());
        assert!(clean_module_list(" ,\n; ").is_empty());
    }

    #[test]
    fn test_clean_course_records_rejoins() {
        let rows = vec![CourseRecord {
            course_name: "Data Science".to_string(),
            modules: "1. Statistics\n2. Machine Learning".to_string(),
        }];
        let cleaned = clean_course_records(&rows);
        assert_eq!(cleaned[0].course_name, "Data Science");
        assert_eq!(cleaned[0].modules, "Statistics, Machine Learning");
    }
}
