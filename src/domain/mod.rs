//! Domain models for the pedigree manager
//!
//! Contains the core business logic without any I/O concerns.

mod id;
mod horse;
mod store;
mod score;
mod lineage;
mod reach;
mod tree;
mod pedigree;

pub use id::{HorseId, IdError, IdGenerator, SequentialIds, ROOT_ID};
pub use horse::{Horse, ParentRole, Sex};
pub use store::{PedigreeStore, StoreError};
pub use score::{format_score, format_score_precise, score, ScoreEngine, MAX_SCORE};
pub use lineage::{ancestors, would_create_cycle};
pub use reach::{collect_reachable, prune_unreachable};
pub use tree::{build_tree, build_tree_with, HorseNode};
pub use pedigree::{Change, Pedigree, PedigreeError, DEFAULT_ROOT_NAME};
