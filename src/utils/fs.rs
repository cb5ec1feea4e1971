//! Filesystem helpers shared by the stages.

use std::fs;
use std::path::Path;

use crate::error_handling::PipelineError;

/// Lists the regular files directly inside `dir`, sorted by name.
///
/// Sorting makes stage order (and therefore merged row order) reproducible
/// across platforms. Names that are not valid UTF-8 are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<String>, PipelineError> {
    let entries = fs::read_dir(dir).map_err(|e| PipelineError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| PipelineError::io(&entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non UTF-8 file name {:?} in {}", raw, dir.display()),
        }
    }
    names.sort();
    Ok(names)
}

/// Creates `dir` (and parents) if it does not exist.
pub fn ensure_dir(dir: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
}

/// Moves a file, replacing any existing destination.
///
/// Falls back to copy + remove when a plain rename fails (e.g. across devices).
pub fn move_file(src: &Path, dst: &Path) -> Result<(), PipelineError> {
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }
    fs::copy(src, dst).map_err(|e| PipelineError::io(dst, e))?;
    fs::remove_file(src).map_err(|e| PipelineError::io(src, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_files_sorted_and_files_only() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("b.csv"), "b").unwrap();
        fs::write(dir.path().join("a.csv"), "a").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(files, vec!["a.csv".to_string(), "b.csv".to_string()]);
    }

    #[test]
    fn test_list_files_missing_dir() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let result = list_files(&dir.path().join("absent"));
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }

    #[test]
    fn test_move_file_overwrites() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let src = dir.path().join("src.csv");
        let dst = dir.path().join("dst.csv");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        move_file(&src, &dst).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }
}
