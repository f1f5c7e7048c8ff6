//! Pedigree CLI - A local-first horse pedigree manager
//!
//! Keeps a sire/dam pedigree rooted at one horse, scores every horse from
//! its Hall of Fame ancestry, guards links against making a horse its own
//! ancestor and sweeps horses that are no longer connected to the root.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{Horse, HorseId, ParentRole, Pedigree, PedigreeError, Sex};
