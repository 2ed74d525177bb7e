//! Local CSV exports: a single file or every `.csv` in a directory.

use crate::source::FileSheetSource;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map(|e| e.eq_ignore_ascii_case("csv")).unwrap_or(false) {
            files.push(path);
        }
    }
    // Directory order is platform dependent; later files win on upsert.
    files.sort();
    Ok(files)
}

/// One file source per CSV at `path`.
pub fn file_sources(path: &Path) -> Result<Vec<FileSheetSource>> {
    let files = if path.is_dir() {
        discover_csv_files(path)?
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        bail!("No such file or directory: {:?}", path);
    };

    debug!("{} CSV file(s) under {:?}", files.len(), path);
    Ok(files.into_iter().map(FileSheetSource::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SheetSource;

    #[test]
    fn test_discover_sorted_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.CSV", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let files = discover_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_csv_files(&dir.path().join("nope")).unwrap().is_empty());
        assert!(file_sources(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_single_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "Company,Ticker,Price\n").unwrap();
        let sources = file_sources(&path).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].describe().ends_with("sheet.csv"));
    }
}
