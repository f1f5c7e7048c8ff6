//! In-memory pedigree store
//!
//! Holds every horse of a pedigree, indexed by id. Records keep their
//! insertion order so snapshots come out stable, but order carries no meaning.
//!
//! Bulk replacement validates the structural invariants before committing:
//! unique ids, a present root, parents that exist and have the right sex, and
//! an acyclic parent graph (checked with petgraph).

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::horse::{Horse, ParentRole};
use super::id::HorseId;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Horse ID already in use: {0}")]
    DuplicateId(HorseId),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Collection of horse records
#[derive(Debug, Default, Clone)]
pub struct PedigreeStore {
    horses: Vec<Horse>,

    /// Map from HorseId to position in `horses`
    index: HashMap<HorseId, usize>,
}

impl PedigreeStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding a single parentless horse
    pub fn with_founder(horse: Horse) -> Self {
        let index = HashMap::from([(horse.id.clone(), 0)]);
        Self {
            horses: vec![horse],
            index,
        }
    }

    /// Builds a validated store from a snapshot
    pub fn from_horses(horses: Vec<Horse>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.replace_all(horses)?;
        Ok(store)
    }

    /// Looks up a horse by id
    pub fn find(&self, id: &HorseId) -> Option<&Horse> {
        self.index.get(id).map(|&pos| &self.horses[pos])
    }

    /// Looks up a horse by id for mutation
    pub fn find_mut(&mut self, id: &HorseId) -> Option<&mut Horse> {
        match self.index.get(id) {
            Some(&pos) => self.horses.get_mut(pos),
            None => None,
        }
    }

    /// Returns true if the store holds a horse with this id
    pub fn contains(&self, id: &HorseId) -> bool {
        self.index.contains_key(id)
    }

    /// Adds a new record
    pub fn insert(&mut self, horse: Horse) -> Result<(), StoreError> {
        if self.index.contains_key(&horse.id) {
            return Err(StoreError::DuplicateId(horse.id));
        }

        self.index.insert(horse.id.clone(), self.horses.len());
        self.horses.push(horse);
        Ok(())
    }

    /// Replaces every record after validating the snapshot
    ///
    /// On error the store keeps its previous contents.
    pub fn replace_all(&mut self, horses: Vec<Horse>) -> Result<(), StoreError> {
        let index = validate_snapshot(&horses)?;
        self.horses = horses;
        self.index = index;
        Ok(())
    }

    /// Removes every record whose id is in `ids`, returning how many were removed
    pub fn delete(&mut self, ids: &HashSet<HorseId>) -> usize {
        let before = self.horses.len();
        self.horses.retain(|h| !ids.contains(&h.id));
        let removed = before - self.horses.len();

        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Rebuilds the id index after removal
    fn rebuild_index(&mut self) {
        self.index = self
            .horses
            .iter()
            .enumerate()
            .map(|(pos, h)| (h.id.clone(), pos))
            .collect();
    }

    /// Returns the number of horses
    pub fn len(&self) -> usize {
        self.horses.len()
    }

    /// Returns true if the store is empty
    pub fn is_empty(&self) -> bool {
        self.horses.is_empty()
    }

    /// Iterates over horses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Horse> {
        self.horses.iter()
    }

    /// Iterates over all horse ids
    pub fn ids(&self) -> impl Iterator<Item = &HorseId> {
        self.horses.iter().map(|h| &h.id)
    }

    /// Copies the current records into a snapshot
    pub fn to_vec(&self) -> Vec<Horse> {
        self.horses.clone()
    }
}

/// Checks the structural invariants of a snapshot and returns its id index
fn validate_snapshot(horses: &[Horse]) -> Result<HashMap<HorseId, usize>, StoreError> {
    let mut index = HashMap::with_capacity(horses.len());
    for (pos, horse) in horses.iter().enumerate() {
        if index.insert(horse.id.clone(), pos).is_some() {
            return Err(StoreError::InvalidSnapshot(format!(
                "duplicate horse id '{}'",
                horse.id
            )));
        }
    }

    if !index.contains_key(&HorseId::root()) {
        return Err(StoreError::InvalidSnapshot(format!(
            "root horse '{}' is missing",
            HorseId::root()
        )));
    }

    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(horses.len(), horses.len() * 2);
    let nodes: Vec<NodeIndex> = horses.iter().map(|_| graph.add_node(())).collect();

    for (pos, horse) in horses.iter().enumerate() {
        for role in [ParentRole::Sire, ParentRole::Dam] {
            let Some(parent_id) = horse.parent(role) else {
                continue;
            };

            if parent_id == &horse.id {
                return Err(StoreError::InvalidSnapshot(format!(
                    "horse '{}' is its own {}",
                    horse.id, role
                )));
            }

            let parent_pos = *index.get(parent_id).ok_or_else(|| {
                StoreError::InvalidSnapshot(format!(
                    "{} '{}' of horse '{}' does not exist",
                    role, parent_id, horse.id
                ))
            })?;

            let parent = &horses[parent_pos];
            if parent.sex != role.required_sex() {
                return Err(StoreError::InvalidSnapshot(format!(
                    "{} '{}' of horse '{}' is {}",
                    role, parent_id, horse.id, parent.sex
                )));
            }

            // Edge: child -> parent
            graph.add_edge(nodes[pos], nodes[parent_pos], ());
        }
    }

    if is_cyclic_directed(&graph) {
        return Err(StoreError::InvalidSnapshot(
            "a horse is its own ancestor".to_string(),
        ));
    }

    Ok(index)
}
