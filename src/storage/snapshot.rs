//! Snapshot persistence
//!
//! The pedigree is saved as one JSON array in `.pedigree/{storage_key}.json`.
//! Every save rewrites the whole file. Reads take a shared lock, writes go
//! to a temp file under an exclusive lock and are renamed into place.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

use super::codec;
use crate::domain::Horse;

/// Store for the pedigree snapshot
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Creates a snapshot store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the store for a workspace using its storage key
    pub fn for_workspace(workspace_root: &Path, storage_key: &str) -> Self {
        Self::new(
            workspace_root
                .join(".pedigree")
                .join(format!("{}.json", storage_key)),
        )
    }

    /// Returns the path to the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a snapshot has been saved
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the saved snapshot, or `None` if nothing was saved yet
    pub fn load(&self) -> Result<Option<Vec<Horse>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open snapshot: {}", self.path.display()))?;

        // Acquire shared lock for reading
        file.lock_shared()
            .context("Failed to acquire read lock on snapshot")?;

        let mut text = String::new();
        file.read_to_string(&mut text)
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;

        let horses = codec::import(&text)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;

        // Lock is released when file is dropped
        Ok(Some(horses))
    }

    /// Saves the full snapshot
    pub fn save(&self, horses: &[Horse]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on snapshot")?;

            let mut writer = BufWriter::new(&file);
            let text = codec::export(horses).context("Failed to serialize snapshot")?;
            writer
                .write_all(text.as_bytes())
                .context("Failed to write snapshot")?;
            writer.flush().context("Failed to flush snapshot")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Deletes the saved snapshot, returning true if one existed
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove snapshot: {}", self.path.display()))?;
        Ok(true)
    }
}
