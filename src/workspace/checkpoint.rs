//! Pre-apply checkpoints with hash-verified restore.
//!
//! Before a fix is written, the orchestrator can snapshot the affected
//! files under `.graft/checkpoints/<id>/` together with a JSON manifest
//! recording each file's hash and size. Restoring verifies the snapshot
//! hashes before touching anything, so a corrupted checkpoint never
//! overwrites a live file.

use super::content_hash;
use crate::error::{GraftError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata about one snapshotted file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointEntry {
    /// Path of the file, relative to the workspace root.
    pub path: PathBuf,
    /// SHA-256 hash of the snapshotted content.
    pub hash: String,
    /// Byte count of the snapshotted content.
    pub size: u64,
}

/// Manifest describing one checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointManifest {
    /// Unique identifier for this checkpoint.
    pub checkpoint_id: String,
    /// When the checkpoint was created (RFC 3339).
    pub created_at: String,
    /// Files captured by this checkpoint.
    pub files: Vec<CheckpointEntry>,
    /// Absolute path to the checkpoint directory.
    #[serde(skip)]
    pub checkpoint_dir: PathBuf,
}

impl CheckpointManifest {
    fn new(checkpoint_id: String, checkpoint_dir: PathBuf) -> Self {
        let created_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        CheckpointManifest {
            checkpoint_id,
            created_at,
            files: Vec::new(),
            checkpoint_dir,
        }
    }

    /// Save the manifest into its checkpoint directory.
    pub fn save(&self) -> Result<()> {
        let manifest_path = self.checkpoint_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(self).map_err(|err| GraftError::Checkpoint {
            message: format!("Failed to serialize manifest: {}", err),
        })?;
        fs::write(&manifest_path, json).map_err(|err| GraftError::Io {
            path: manifest_path,
            source: err,
        })?;
        Ok(())
    }

    /// Load a manifest from a file.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let json = fs::read_to_string(manifest_path).map_err(|err| GraftError::Io {
            path: manifest_path.to_path_buf(),
            source: err,
        })?;

        let mut manifest: CheckpointManifest =
            serde_json::from_str(&json).map_err(|err| GraftError::Checkpoint {
                message: format!("Failed to parse manifest: {}", err),
            })?;

        manifest.checkpoint_dir = manifest_path
            .parent()
            .ok_or_else(|| GraftError::Checkpoint {
                message: "Manifest has no parent directory".to_string(),
            })?
            .to_path_buf();

        Ok(manifest)
    }
}

/// Writer that snapshots files before an apply cycle.
pub struct CheckpointWriter {
    manifest: CheckpointManifest,
    workspace_root: PathBuf,
}

impl CheckpointWriter {
    /// Create a new checkpoint under `<root>/.graft/checkpoints/<id>/`.
    ///
    /// A v4 UUID is generated when no id is supplied.
    pub fn new(workspace_root: &Path, checkpoint_id: Option<String>) -> Result<Self> {
        let id = checkpoint_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let checkpoint_dir = workspace_root
            .join(".graft")
            .join("checkpoints")
            .join(&id);

        fs::create_dir_all(&checkpoint_dir).map_err(|err| GraftError::Io {
            path: checkpoint_dir.clone(),
            source: err,
        })?;

        Ok(CheckpointWriter {
            manifest: CheckpointManifest::new(id, checkpoint_dir),
            workspace_root: workspace_root.to_path_buf(),
        })
    }

    /// The id of this checkpoint.
    pub fn checkpoint_id(&self) -> &str {
        &self.manifest.checkpoint_id
    }

    /// Path to the manifest file once finalized.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest.checkpoint_dir.join("manifest.json")
    }

    /// Snapshot one file, preserving its path relative to the root.
    pub fn snapshot(&mut self, file_path: &Path) -> Result<()> {
        let content = fs::read(file_path).map_err(|err| GraftError::Io {
            path: file_path.to_path_buf(),
            source: err,
        })?;

        let relative = file_path
            .strip_prefix(&self.workspace_root)
            .map_err(|_| GraftError::Checkpoint {
                message: format!(
                    "File '{}' is not under workspace root '{}'",
                    file_path.display(),
                    self.workspace_root.display()
                ),
            })?;

        let snapshot_path = self.manifest.checkpoint_dir.join(relative);
        if let Some(parent) = snapshot_path.parent() {
            fs::create_dir_all(parent).map_err(|err| GraftError::Io {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }

        fs::write(&snapshot_path, &content).map_err(|err| GraftError::Io {
            path: snapshot_path.clone(),
            source: err,
        })?;

        self.manifest.files.push(CheckpointEntry {
            path: relative.to_path_buf(),
            hash: content_hash(&content),
            size: content.len() as u64,
        });

        log::debug!(
            "Checkpointed {} into {}",
            file_path.display(),
            self.manifest.checkpoint_dir.display()
        );
        Ok(())
    }

    /// Write the manifest and return its path.
    pub fn finalize(self) -> Result<PathBuf> {
        let manifest_path = self.manifest_path();
        self.manifest.save()?;
        Ok(manifest_path)
    }
}

/// Restore every file recorded in a checkpoint manifest.
///
/// Each snapshot is hash-verified before anything is written back; a
/// tampered or truncated snapshot aborts the restore untouched.
pub fn restore_checkpoint(manifest_path: &Path, workspace_root: &Path) -> Result<usize> {
    let manifest = CheckpointManifest::load(manifest_path)?;

    // Verify all snapshots first so a bad one aborts before any write.
    let mut verified = Vec::with_capacity(manifest.files.len());
    for entry in &manifest.files {
        let snapshot_path = manifest.checkpoint_dir.join(&entry.path);
        let content = fs::read(&snapshot_path).map_err(|err| GraftError::Io {
            path: snapshot_path.clone(),
            source: err,
        })?;

        let actual = content_hash(&content);
        if actual != entry.hash {
            return Err(GraftError::Checkpoint {
                message: format!(
                    "Hash mismatch for {}: expected {}, got {}",
                    entry.path.display(),
                    entry.hash,
                    actual
                ),
            });
        }
        verified.push((workspace_root.join(&entry.path), content));
    }

    let mut restored = 0;
    for (target, content) in verified {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| GraftError::Io {
                path: parent.to_path_buf(),
                source: err,
            })?;
        }
        fs::write(&target, &content).map_err(|err| GraftError::Io {
            path: target.clone(),
            source: err,
        })?;
        restored += 1;
    }

    Ok(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_checkpoint_and_restore() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        let root = workspace.path();

        let file = root.join("src").join("lib.rs");
        fs::create_dir_all(file.parent().unwrap()).expect("Failed to create src dir");
        fs::write(&file, "original content").expect("Failed to write file");

        let mut writer = CheckpointWriter::new(root, Some("fix-42".to_string()))
            .expect("Failed to create writer");
        writer.snapshot(&file).expect("Failed to snapshot");
        let manifest_path = writer.finalize().expect("Failed to finalize");

        fs::write(&file, "clobbered").expect("Failed to modify file");

        let restored =
            restore_checkpoint(&manifest_path, root).expect("Failed to restore");
        assert_eq!(restored, 1);

        let content = fs::read_to_string(&file).expect("Failed to read file");
        assert_eq!(content, "original content");
    }

    #[test]
    fn test_restore_rejects_tampered_snapshot() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        let root = workspace.path();

        let file = root.join("main.rs");
        fs::write(&file, "fn main() {}").expect("Failed to write file");

        let mut writer = CheckpointWriter::new(root, Some("tamper-test".to_string()))
            .expect("Failed to create writer");
        writer.snapshot(&file).expect("Failed to snapshot");
        let manifest_path = writer.finalize().expect("Failed to finalize");

        let snapshot = root.join(".graft/checkpoints/tamper-test/main.rs");
        fs::write(&snapshot, "tampered").expect("Failed to tamper");

        let result = restore_checkpoint(&manifest_path, root);
        match result {
            Err(GraftError::Checkpoint { message }) => {
                assert!(message.contains("Hash mismatch"));
            }
            other => panic!("Expected hash mismatch, got {:?}", other),
        }

        // The live file was never touched.
        let content = fs::read_to_string(&file).expect("Failed to read file");
        assert_eq!(content, "fn main() {}");
    }

    #[test]
    fn test_manifest_save_and_load() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        let dir = workspace.path().join(".graft/checkpoints/manifest-test");
        fs::create_dir_all(&dir).expect("Failed to create dir");

        let mut manifest =
            CheckpointManifest::new("manifest-test".to_string(), dir.clone());
        manifest.files.push(CheckpointEntry {
            path: PathBuf::from("src/lib.rs"),
            hash: "abc123".to_string(),
            size: 1024,
        });
        manifest.save().expect("Failed to save manifest");

        let loaded = CheckpointManifest::load(&dir.join("manifest.json"))
            .expect("Failed to load manifest");
        assert_eq!(loaded.checkpoint_id, "manifest-test");
        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.files[0].path, PathBuf::from("src/lib.rs"));
        assert_eq!(loaded.files[0].size, 1024);
        assert_eq!(loaded.checkpoint_dir, dir);
    }

    #[test]
    fn test_generated_checkpoint_ids_are_unique() {
        let workspace = TempDir::new().expect("Failed to create temp dir");
        let first = CheckpointWriter::new(workspace.path(), None)
            .expect("Failed to create writer");
        let second = CheckpointWriter::new(workspace.path(), None)
            .expect("Failed to create writer");
        assert_ne!(first.checkpoint_id(), second.checkpoint_id());
    }
}
