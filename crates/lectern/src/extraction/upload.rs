//! Temporary persistence for uploaded files

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// An uploaded file persisted under a per-request temporary directory.
///
/// The directory, and the file inside it, is removed when this value is
/// dropped. Concurrent uploads with the same filename never collide
/// because each request gets its own directory.
pub struct SavedUpload {
    path: PathBuf,
    filename: String,
    _dir: TempDir,
}

impl SavedUpload {
    /// Path of the persisted file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sanitized filename (directory components stripped)
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Write uploaded bytes into a fresh temporary directory.
///
/// Only the final path component of `filename` is used, so a crafted
/// name like `../../etc/passwd` cannot escape the directory.
pub fn save_upload(filename: &str, data: &[u8]) -> Result<SavedUpload> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let dir = TempDir::new()?;
    let path = dir.path().join(&name);
    std::fs::write(&path, data)?;

    tracing::debug!("Saved upload {} ({} bytes)", name, data.len());

    Ok(SavedUpload {
        path,
        filename: name,
        _dir: dir,
    })
}
