use crate::error::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

/// Archive the raw catalog payload verbatim to the configured output path
/// and return its SHA-256 checksum (hex). The archive happens after the
/// fetch and before any persistence, so a failed run still leaves the
/// snapshot on disk for diagnosis.
pub fn archive_payload(path: &Path, payload: &[u8]) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    let checksum = hex::encode(hasher.finalize());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, payload)?;

    info!(
        "archived {} byte snapshot to {} (sha256 {})",
        payload.len(),
        path.display(),
        checksum
    );
    Ok(checksum)
}
