//! Atomic playlist writes
//!
//! Content goes to a temporary file in the destination directory which is
//! then renamed over the target, so readers never see a partial playlist.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{MergeError, MergeResult};

/// File name of the debug copy, placed next to the output file
pub const DEBUG_FILE_NAME: &str = "debug.m3u";

pub fn debug_path(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) => parent.join(DEBUG_FILE_NAME),
        None => PathBuf::from(DEBUG_FILE_NAME),
    }
}

/// Write `content` to `path` atomically, creating parent directories
pub fn write_atomic(path: &Path, content: &str) -> MergeResult<()> {
    let to_error = |source: std::io::Error| MergeError::Output {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(to_error)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(to_error)?;
    tmp.write_all(content.as_bytes()).map_err(to_error)?;
    tmp.as_file().sync_all().map_err(to_error)?;
    tmp.persist(path).map_err(|e| to_error(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
