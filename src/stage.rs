//! Staging: moves downloaded files into the processing directory.
//!
//! This draws the boundary between the raw inbox and the files currently being
//! normalized. Content is never inspected.

use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::error_handling::PipelineError;
use crate::models::{FileState, SourceFile};
use crate::utils::{ensure_dir, list_files, move_file};

/// Moves every non-excluded file from `src` to `dst`, creating `dst` if needed.
///
/// Existing files in `dst` with the same name are replaced.
pub fn stage_files(
    src: &Path,
    dst: &Path,
    config: &Config,
) -> Result<Vec<SourceFile>, PipelineError> {
    ensure_dir(dst)?;

    let mut staged = Vec::new();
    for name in list_files(src)? {
        if config.is_excluded(&name) {
            debug!("Skipping excluded file {}", name);
            continue;
        }
        move_file(&src.join(&name), &dst.join(&name))?;
        staged.push(SourceFile::new(name, FileState::Staged));
    }

    info!(
        "Staged {} file(s) from {} to {}",
        staged.len(),
        src.display(),
        dst.display()
    );
    Ok(staged)
}
