//! Archive extraction.
//!
//! Unpacks every archive in the download directory into the same directory and
//! deletes the archive afterwards. Supported formats:
//! - `.zip`
//! - `.tar.gz` / `.tgz`
//! - `.gz` (single compressed file, written under the name without `.gz`)
//!
//! A corrupt archive is fatal and is left in place.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::read::GzDecoder;
use log::{debug, info};

use crate::error_handling::PipelineError;
use crate::models::{FileState, SourceFile};
use crate::utils::list_files;

/// Archive formats recognised by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// PKZIP archive
    Zip,
    /// Gzip-compressed tarball
    TarGz,
    /// Single gzip-compressed file
    Gzip,
}

impl ArchiveKind {
    /// Detects the archive kind from a file name, `None` for plain files.
    pub fn detect(file_name: &str) -> Option<Self> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(ArchiveKind::TarGz)
        } else if lower.ends_with(".gz") {
            Some(ArchiveKind::Gzip)
        } else {
            None
        }
    }
}

/// Extracts every archive found in `dir`, then removes it.
///
/// Returns the files produced by extraction, tagged `Extracted`. Running again
/// once no archives remain returns an empty list and touches nothing.
pub fn extract_archives(dir: &Path) -> Result<Vec<SourceFile>, PipelineError> {
    let mut extracted = Vec::new();

    for name in list_files(dir)? {
        let Some(kind) = ArchiveKind::detect(&name) else {
            debug!("Not an archive, leaving {} in place", name);
            continue;
        };

        let path = dir.join(&name);
        let produced = match kind {
            ArchiveKind::Zip => extract_zip(&path, dir)?,
            ArchiveKind::TarGz => extract_tar_gz(&path, dir)?,
            ArchiveKind::Gzip => extract_gzip(&path, dir)?,
        };
        std::fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;

        info!("Extracted {} file(s) from {}", produced.len(), name);
        extracted.extend(
            produced
                .into_iter()
                .map(|entry| SourceFile::new(entry, FileState::Extracted)),
        );
    }

    Ok(extracted)
}

fn corrupt(path: &Path, reason: impl ToString) -> PipelineError {
    PipelineError::CorruptArchive {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn extract_zip(path: &Path, dest: &Path) -> Result<Vec<String>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| corrupt(path, e))?;

    let mut names = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(|e| corrupt(path, e))?;
        if entry.is_file() {
            if let Some(enclosed) = entry.enclosed_name() {
                names.push(enclosed.to_string_lossy().into_owned());
            }
        }
    }

    archive.extract(dest).map_err(|e| corrupt(path, e))?;
    Ok(names)
}

fn extract_tar_gz(path: &Path, dest: &Path) -> Result<Vec<String>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    let mut names = Vec::new();
    let entries = archive.entries().map_err(|e| corrupt(path, e))?;
    for entry_result in entries {
        let mut entry = entry_result.map_err(|e| corrupt(path, e))?;
        let entry_path = entry
            .path()
            .map_err(|e| corrupt(path, e))?
            .to_string_lossy()
            .into_owned();
        let is_file = entry.header().entry_type().is_file();
        // unpack_in refuses entries that would escape `dest`
        let unpacked = entry.unpack_in(dest).map_err(|e| corrupt(path, e))?;
        if unpacked && is_file {
            names.push(entry_path);
        }
    }
    Ok(names)
}

fn extract_gzip(path: &Path, dest: &Path) -> Result<Vec<String>, PipelineError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| corrupt(path, "archive name is not valid UTF-8"))?;
    let out_name = &file_name[..file_name.len() - ".gz".len()];
    if out_name.is_empty() {
        return Err(corrupt(path, "archive name has no stem"));
    }

    let out_path = dest.join(out_name);
    let mut decoder = GzDecoder::new(File::open(path).map_err(|e| PipelineError::io(path, e))?);
    let mut out = File::create(&out_path).map_err(|e| PipelineError::io(&out_path, e))?;
    if let Err(e) = io::copy(&mut decoder, &mut out) {
        drop(out);
        let _ = std::fs::remove_file(&out_path);
        return Err(corrupt(path, e));
    }
    Ok(vec![out_name.to_string()])
}
