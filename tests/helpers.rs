// Shared test helpers for feed fixtures and pipeline configuration.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::path::Path;

use feed_pipeline::config::{ArchiveBackend, ArchiveSettings, DGA_PREAMBLE_LINES};
use feed_pipeline::Config;

/// Builds a DGA feed body: the fixed preamble followed by `rows`.
#[allow(dead_code)] // Used by other test files
pub fn dga_feed(rows: &[&str]) -> String {
    let mut body = String::new();
    for i in 0..DGA_PREAMBLE_LINES {
        body.push_str(&format!("## Feed preamble line {}\n", i + 1));
    }
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}

/// Zips `content` as a single entry called `entry_name`.
#[allow(dead_code)]
pub fn zip_bytes(entry_name: &str, content: &[u8]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file(entry_name, zip::write::SimpleFileOptions::default())
        .expect("Failed to start zip entry");
    writer.write_all(content).expect("Failed to write zip entry");
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}

/// Configuration with every directory under `root` and a local archive mirror.
#[allow(dead_code)]
pub fn test_config(root: &Path) -> Config {
    Config {
        downloads_dir: root.join("downloads"),
        processing_dir: root.join("staging"),
        sources: Vec::new(),
        archive: ArchiveSettings {
            bucket: "requex-archive".to_string(),
            backend: ArchiveBackend::Local {
                root: root.join("archive"),
            },
        },
        ..Default::default()
    }
}

/// Writes `content` to `dir/name`, creating `dir` if needed.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: impl AsRef<[u8]>) {
    std::fs::create_dir_all(dir).expect("Failed to create directory");
    std::fs::write(dir.join(name), content).expect("Failed to write file");
}
