//! Local playlist files

use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::errors::{SourceError, SourceResult};

/// Read a file as text, replacing invalid UTF-8
pub async fn read_file(path: &Path) -> SourceResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| SourceError::Unreadable {
        path: path.display().to_string(),
        message: match e.kind() {
            ErrorKind::NotFound => "file not found".to_string(),
            _ => e.to_string(),
        },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
