//! # Storage Layer
//!
//! Persistence for the pedigree manager.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Horses | JSON array (full snapshot) | `.pedigree/{storage_key}.json` |
//! | Config | TOML | `.pedigree/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - [`SnapshotStore`] uses file locking (`fs2`) for concurrent access
//! - All writes are atomic (temp file + rename)
//!
//! ## Workspace Structure
//!
//! ```text
//! .pedigree/
//! ├── horse_app_data_v1.json   # Saved pedigree
//! └── config.toml              # Workspace configuration
//! ```
//!
//! ## Key Types
//!
//! - [`Workspace`] - Entry point for accessing a saved pedigree
//! - [`SnapshotStore`] - Load/save the horse collection
//! - [`codec`] - Import/export of JSON snapshots
//! - [`Config`] - Workspace and global configuration

pub mod codec;
pub mod config;
mod snapshot;
mod workspace;

pub use codec::CodecError;
pub use config::{Config, ConfigError, WorkspaceConfig, DEFAULT_STORAGE_KEY};
pub use snapshot::SnapshotStore;
pub use workspace::{Workspace, WorkspaceError};
