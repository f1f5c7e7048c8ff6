//! Workspace management
//!
//! Handles workspace initialization and provides access to the config and
//! the saved pedigree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, SnapshotStore};
use crate::domain::{Horse, Pedigree, Sex};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a pedigree workspace. Run 'pedigree init' first.")]
    NotInWorkspace,
}

/// A pedigree workspace (a directory containing `.pedigree/`)
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".pedigree").is_dir() {
            return Err(WorkspaceError::NotInWorkspace.into());
        }

        let config = Config::for_workspace(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_workspace_root().ok_or(WorkspaceError::NotInWorkspace)?;

        Self::open(root)
    }

    /// Initializes a workspace and bootstraps the root horse
    ///
    /// An already initialized workspace keeps its saved pedigree.
    pub fn init(root: impl Into<PathBuf>, name: Option<&str>, sex: Sex) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".pedigree");

        fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create .pedigree directory: {}", data_dir.display())
        })?;

        let config_path = data_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Pedigree configuration

# Snapshot file name inside .pedigree/ (without .json)
storage_key = "horse_app_data_v1"

# Name for a root horse created without one
default_root_name = "My Horse"

# Decimals shown for scores in trees and lists
score_precision = 2
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        let workspace = Self::open(root)?;
        if workspace.saved_horses()?.is_none() {
            workspace.save(&workspace.bootstrap(name, sex))?;
        }

        Ok(workspace)
    }

    /// Returns the workspace root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the snapshot store for this workspace
    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::for_workspace(&self.root, &self.config.workspace.storage_key)
    }

    /// Creates a fresh pedigree, using the configured default name when none is given
    pub fn bootstrap(&self, name: Option<&str>, sex: Sex) -> Pedigree {
        let name = name.unwrap_or(&self.config.workspace.default_root_name);
        Pedigree::bootstrap(name, sex)
    }

    /// Saved horses, or `None` when nothing was saved or the collection is empty
    fn saved_horses(&self) -> Result<Option<Vec<Horse>>> {
        let horses = self.snapshot_store().load()?;
        Ok(horses.filter(|horses| !horses.is_empty()))
    }

    /// Loads the saved pedigree
    ///
    /// A missing or empty snapshot yields a fresh pedigree with a default
    /// root; it is written on the next save.
    pub fn load(&self) -> Result<Pedigree> {
        match self.saved_horses()? {
            Some(horses) => Pedigree::from_snapshot(horses).with_context(|| {
                format!(
                    "Saved pedigree is invalid: {}",
                    self.snapshot_store().path().display()
                )
            }),
            None => Ok(self.bootstrap(None, Sex::Male)),
        }
    }

    /// Saves the pedigree
    pub fn save(&self, pedigree: &Pedigree) -> Result<()> {
        self.snapshot_store().save(&pedigree.snapshot())
    }

    /// Discards the saved pedigree and starts over with a new root
    pub fn reset(&self, name: Option<&str>, sex: Sex) -> Result<Pedigree> {
        self.snapshot_store().clear()?;
        let pedigree = self.bootstrap(name, sex);
        self.save(&pedigree)?;
        Ok(pedigree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HorseId, ParentRole};
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), Some("Comet"), Sex::Male).unwrap();

        assert!(workspace.root().join(".pedigree").is_dir());
        assert!(workspace.root().join(".pedigree").join("config.toml").is_file());
        assert!(workspace.root().join(".pedigree").join("horse_app_data_v1.json").is_file());

        let pedigree = workspace.load().unwrap();
        assert_eq!(pedigree.horse(&HorseId::root()).unwrap().name, "Comet");
    }

    #[test]
    fn init_uses_configured_default_name() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), None, Sex::Female).unwrap();

        let pedigree = workspace.load().unwrap();
        let root = pedigree.horse(&HorseId::root()).unwrap();
        assert_eq!(root.name, "My Horse");
        assert_eq!(root.sex, Sex::Female);
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), Some("Comet"), Sex::Male).unwrap();

        let mut pedigree = workspace.load().unwrap();
        pedigree
            .add_parent(&HorseId::root(), ParentRole::Sire, "Thunder")
            .unwrap();
        workspace.save(&pedigree).unwrap();

        // Second init keeps existing data
        let workspace = Workspace::init(dir.path(), Some("Other"), Sex::Female).unwrap();
        assert_eq!(workspace.load().unwrap().store().len(), 2);
    }

    #[test]
    fn open_non_workspace_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Workspace::open(dir.path()).is_err());
    }

    #[test]
    fn load_without_snapshot_bootstraps_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".pedigree")).unwrap();

        let workspace = Workspace::open(dir.path()).unwrap();
        let pedigree = workspace.load().unwrap();

        assert_eq!(pedigree.store().len(), 1);
        assert_eq!(pedigree.horse(&HorseId::root()).unwrap().name, "My Horse");
        assert!(!workspace.snapshot_store().exists());
    }

    #[test]
    fn empty_snapshot_counts_as_unsaved() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), Some("Comet"), Sex::Male).unwrap();
        fs::write(workspace.snapshot_store().path(), "[]").unwrap();

        let pedigree = workspace.load().unwrap();
        assert_eq!(pedigree.store().len(), 1);
        assert!(pedigree.horse(&HorseId::root()).is_ok());

        // A second init replaces the empty collection with a root
        Workspace::init(dir.path(), Some("Nova"), Sex::Female).unwrap();
        let saved = workspace.snapshot_store().load().unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Nova");
    }

    #[test]
    fn reset_starts_over() {
        let dir = TempDir::new().unwrap();
        let workspace = Workspace::init(dir.path(), Some("Comet"), Sex::Male).unwrap();

        let mut pedigree = workspace.load().unwrap();
        pedigree
            .add_parent(&HorseId::root(), ParentRole::Dam, "")
            .unwrap();
        workspace.save(&pedigree).unwrap();

        let fresh = workspace.reset(Some("Nova"), Sex::Female).unwrap();
        assert_eq!(fresh.store().len(), 1);

        let reloaded = workspace.load().unwrap();
        assert_eq!(reloaded.horse(&HorseId::root()).unwrap().name, "Nova");
    }

    #[test]
    fn custom_storage_key() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".pedigree")).unwrap();
        fs::write(
            dir.path().join(".pedigree").join("config.toml"),
            "storage_key = \"stud_book\"\n",
        )
        .unwrap();

        let workspace = Workspace::init(dir.path(), None, Sex::Male).unwrap();
        assert!(workspace.root().join(".pedigree").join("stud_book.json").is_file());
    }
}
