//! Horse identifiers and id generation
//!
//! ID Format:
//! - Root horse: `h1` (reserved, created at bootstrap)
//! - Generated horses: `h{n}` with `n` counting up from the largest suffix in use
//!
//! Snapshots written by other tools may carry arbitrary non-empty ids, so
//! parsing only rejects blank values. Generation never hands out an id that
//! is already present in the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::store::PedigreeStore;

/// Identifier reserved for the root horse of a pedigree
pub const ROOT_ID: &str = "h1";

const PREFIX: &str = "h";

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Horse ID must not be empty")]
    Empty,
}

/// Opaque horse identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HorseId(String);

impl HorseId {
    /// Returns the reserved root identifier
    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Creates a generated-style id (`h{n}`)
    pub fn numbered(n: u64) -> Self {
        Self(format!("{}{}", PREFIX, n))
    }

    /// Returns true if this is the reserved root id
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    /// Returns the numeric suffix for ids of the form `h{n}`
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HorseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HorseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for HorseId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HorseId> for String {
    fn from(id: HorseId) -> Self {
        id.0
    }
}

/// Source of fresh horse ids
pub trait IdGenerator {
    /// Returns an id that is not present in `store`
    fn next_id(&mut self, store: &PedigreeStore) -> HorseId;
}

/// Monotonic `h{n}` generator
///
/// Starts one past the largest numeric suffix in the store, so ids loaded
/// from an older snapshot are never reused.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, store: &PedigreeStore) -> HorseId {
        let highest = store
            .ids()
            .filter_map(|id| id.sequence())
            .max()
            .unwrap_or(0);
        let mut n = self.last.max(highest) + 1;

        // Non-canonical suffixes such as `h007` parse but don't compare equal
        while store.contains(&HorseId::numbered(n)) {
            n += 1;
        }

        self.last = n;
        HorseId::numbered(n)
    }
}
