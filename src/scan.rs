//! Input tree discovery and validation.
//!
//! Walks the input directory, returning every file in a stable order. The
//! pipeline consumes the flat list; relative paths are recomputed against
//! the input root when the mirrored output path is built.
//!
//! Validation lives here too: a missing input directory, an input tree
//! with no files at all, and unreadable files are all fatal before any
//! transform runs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Reading directory failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Input directory does not exist: {0}")]
    MissingInput(PathBuf),
    #[error("Input directory is empty: {0}")]
    EmptyInput(PathBuf),
    #[error("Insufficient permissions for file: {0}")]
    Permission(PathBuf),
    #[error("Failed to create output directory {0}: {1}")]
    OutputDir(PathBuf, std::io::Error),
}

/// Collect every file under `input`, sorted by path.
///
/// Errors if the directory does not exist or contains no files.
pub fn collect_files(input: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !input.is_dir() {
        return Err(ScanError::MissingInput(input.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(ScanError::EmptyInput(input.to_path_buf()));
    }
    Ok(files)
}

/// Verify that `file` can be opened for reading.
pub fn check_readable(file: &Path) -> Result<(), ScanError> {
    fs::File::open(file)
        .map(|_| ())
        .map_err(|_| ScanError::Permission(file.to_path_buf()))
}

/// Create the output directory if it does not exist.
///
/// Returns `true` when the directory was created, so the caller can print
/// a notice.
pub fn ensure_output_dir(output: &Path) -> Result<bool, ScanError> {
    if output.exists() {
        return Ok(false);
    }
    fs::create_dir_all(output).map_err(|e| ScanError::OutputDir(output.to_path_buf(), e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn collects_files_recursively() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.css"), "x").unwrap();
        fs::create_dir_all(tmp.path().join("sub/deeper")).unwrap();
        fs::write(tmp.path().join("sub/b.js"), "x").unwrap();
        fs::write(tmp.path().join("sub/deeper/c.html"), "x").unwrap();

        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[test]
    fn files_sorted_by_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.css"), "x").unwrap();
        fs::write(tmp.path().join("a.css"), "x").unwrap();

        let files = collect_files(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.css", "b.css"]);
    }

    #[test]
    fn missing_input_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_files(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::MissingInput(_))));
    }

    #[test]
    fn empty_input_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_files(tmp.path());
        assert!(matches!(result, Err(ScanError::EmptyInput(_))));
    }

    #[test]
    fn empty_subdirectories_do_not_count_as_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("only/dirs")).unwrap();
        let result = collect_files(tmp.path());
        assert!(matches!(result, Err(ScanError::EmptyInput(_))));
    }

    #[test]
    fn readable_file_passes_check() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.css");
        fs::write(&file, "x").unwrap();
        assert!(check_readable(&file).is_ok());
    }

    #[test]
    fn missing_file_fails_check() {
        let tmp = TempDir::new().unwrap();
        let result = check_readable(&tmp.path().join("gone.css"));
        assert!(matches!(result, Err(ScanError::Permission(_))));
    }

    #[test]
    fn ensure_output_dir_creates_missing_tree() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("deep/out");
        assert!(ensure_output_dir(&out).unwrap());
        assert!(out.is_dir());
    }

    #[test]
    fn ensure_output_dir_noop_when_present() {
        let tmp = TempDir::new().unwrap();
        assert!(!ensure_output_dir(tmp.path()).unwrap());
    }
}
