use std::path::Path;

use super::Record;
use crate::error::Result;

/// Write records as CSV with a header row, creating parent directories.
///
/// The header is written even when `rows` is empty so the file reloads with
/// its full column set.
pub fn write_records<R: Record>(path: &Path, rows: &[R]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(R::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{read_records, TrainerRecord};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_keeps_commas_quoted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/trainers.csv");
        let rows = vec![TrainerRecord {
            trainer_name: "Asha".to_string(),
            teaches: "Java, Python".to_string(),
        }];
        write_records(&path, &rows).unwrap();

        let (read, warnings) = read_records::<TrainerRecord>(&path).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(read, rows);
    }

    #[test]
    fn test_write_empty_keeps_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        write_records::<TrainerRecord>(&path, &[]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "trainer_name,teaches");
    }
}
