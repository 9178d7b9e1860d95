//! File-system collaborator: reading, atomic writing, and hashing.
//!
//! The planning and apply pipeline is pure; this module is where bytes meet
//! disk. Writes go through a temp file in the target directory, fsync, and
//! rename, so a reader never observes a partially written file.

pub mod checkpoint;

use crate::error::{GraftError, Result};
use crate::source::SourceText;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a file into an immutable source text, rejecting invalid UTF-8.
pub fn read_source(path: &Path) -> Result<SourceText> {
    let bytes = fs::read(path).map_err(|err| GraftError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    let text = String::from_utf8(bytes).map_err(|_| GraftError::InvalidEncoding {
        path: path.to_path_buf(),
    })?;

    Ok(SourceText::new(text))
}

/// Atomically replace `path` with `text`.
///
/// The temp file lives in the target's directory so the final rename stays
/// on one filesystem.
pub fn write_atomic(path: &Path, text: &SourceText) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| GraftError::Other("File has no parent directory".to_string()))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| GraftError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    temp.write_all(text.as_str().as_bytes())
        .map_err(|err| GraftError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    temp.as_file().sync_all().map_err(|err| GraftError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    temp.persist(path).map_err(|err| GraftError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    log::info!("Wrote {} ({} bytes)", path.display(), text.len());
    Ok(())
}

/// SHA-256 hash of content, as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{:x}", result)
}
