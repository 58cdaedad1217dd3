use std::fmt;
use std::path::{Path, PathBuf};

use super::{CourseRecord, Record, RecordSet, StudentRecord, TrainerRecord, TrainerSkillRecord};
use crate::config::SourcesConfig;
use crate::error::Result;

/// Non-fatal problem found while loading a record source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceWarning {
    /// The source file does not exist; it was read as zero rows.
    MissingSource { path: PathBuf },
    /// The source has no such column; every row got an empty value.
    MissingColumn { path: PathBuf, column: String },
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceWarning::MissingSource { path } => {
                write!(f, "Missing CSV: {}", path.display())
            }
            SourceWarning::MissingColumn { path, column } => {
                write!(f, "Missing column '{}' in {}", column, path.display())
            }
        }
    }
}

/// Read every row of a CSV source as `R`.
///
/// A missing file yields zero rows and a `MissingSource` warning. A missing
/// column is filled with empty strings. A file that exists but cannot be read
/// or parsed is an error.
pub fn read_records<R: Record>(path: &Path) -> Result<(Vec<R>, Vec<SourceWarning>)> {
    let mut warnings = Vec::new();

    if !path.exists() {
        log::warn!("Missing CSV: {}", path.display());
        warnings.push(SourceWarning::MissingSource {
            path: path.to_path_buf(),
        });
        return Ok((Vec::new(), warnings));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let positions: Vec<Option<usize>> = R::COLUMNS
        .iter()
        .map(|col| {
            let pos = headers.iter().position(|h| h == col);
            if pos.is_none() {
                log::debug!("Column '{}' missing in {}, using empty values", col, path.display());
                warnings.push(SourceWarning::MissingColumn {
                    path: path.to_path_buf(),
                    column: col.to_string(),
                });
            }
            pos
        })
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let fields = positions
            .iter()
            .map(|pos| pos.and_then(|i| row.get(i)).unwrap_or("").to_string())
            .collect();
        rows.push(R::from_fields(fields));
    }

    log::debug!("Read {} rows from {}", rows.len(), path.display());
    Ok((rows, warnings))
}

/// Load all four record sources named by the configuration.
pub fn load_record_set(sources: &SourcesConfig) -> Result<(RecordSet, Vec<SourceWarning>)> {
    let mut warnings = Vec::new();

    let (courses, w) = read_records::<CourseRecord>(&sources.courses)?;
    warnings.extend(w);
    let (trainers, w) = read_records::<TrainerRecord>(&sources.trainers)?;
    warnings.extend(w);
    let (students, w) = read_records::<StudentRecord>(&sources.students)?;
    warnings.extend(w);
    let (trainer_skills, w) = read_records::<TrainerSkillRecord>(&sources.trainer_skills)?;
    warnings.extend(w);

    log::info!(
        "Loaded records: courses={}, trainers={}, students={}, trainer_skills={}",
        courses.len(),
        trainers.len(),
        students.len(),
        trainer_skills.len()
    );

    Ok((
        RecordSet {
            courses,
            trainers,
            students,
            trainer_skills,
        },
        warnings,
    ))
}
