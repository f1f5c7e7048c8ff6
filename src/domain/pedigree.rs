//! Pedigree service
//!
//! Owns the store and the id generator and exposes the user-level
//! operations. Every mutation validates first and only then writes, so a
//! rejected operation leaves the pedigree exactly as it was. Mutations
//! report what they touched through [`Change`]; callers decide what to
//! redisplay.

use thiserror::Error;

use super::horse::{Horse, ParentRole, Sex};
use super::id::{HorseId, IdGenerator, SequentialIds};
use super::lineage::{ancestors, would_create_cycle};
use super::reach::prune_unreachable;
use super::score::{self, ScoreEngine};
use super::store::{PedigreeStore, StoreError};
use super::tree::{build_tree_with, HorseNode};

/// Name given to a root horse created without one
pub const DEFAULT_ROOT_NAME: &str = "My Horse";

#[derive(Debug, Error, PartialEq)]
pub enum PedigreeError {
    #[error("Horse not found: {0}")]
    NotFound(HorseId),

    #[error("Linking {parent} as {role} of {child} would make {child} its own ancestor")]
    CycleRejected {
        child: HorseId,
        parent: HorseId,
        role: ParentRole,
    },

    #[error("{id} is {actual} and cannot be linked as {role}")]
    WrongSex {
        id: HorseId,
        actual: Sex,
        role: ParentRole,
    },

    #[error("{child} already has a {role}: {current}")]
    ParentSlotOccupied {
        child: HorseId,
        role: ParentRole,
        current: HorseId,
    },

    #[error("Name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Ids affected by a mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Change {
    /// The horse the operation was applied to
    pub subject: Option<HorseId>,
    /// A horse created by the operation
    pub created: Option<HorseId>,
    /// Horses swept because the root could no longer reach them
    pub pruned: Vec<HorseId>,
}

impl Change {
    fn on(subject: &HorseId) -> Self {
        Self {
            subject: Some(subject.clone()),
            ..Self::default()
        }
    }
}

/// A pedigree rooted at [`HorseId::root`]
pub struct Pedigree {
    store: PedigreeStore,
    ids: Box<dyn IdGenerator>,
}

impl Pedigree {
    /// Starts a new pedigree with only the root horse
    ///
    /// A blank name falls back to [`DEFAULT_ROOT_NAME`].
    pub fn bootstrap(name: &str, sex: Sex) -> Self {
        let name = match name.trim() {
            "" => DEFAULT_ROOT_NAME,
            trimmed => trimmed,
        };

        Self::with_store(PedigreeStore::with_founder(Horse::new(HorseId::root(), name, sex)))
    }

    /// Loads a pedigree from a snapshot, validating it first
    pub fn from_snapshot(horses: Vec<Horse>) -> Result<Self, PedigreeError> {
        Ok(Self::with_store(PedigreeStore::from_horses(horses)?))
    }

    fn with_store(store: PedigreeStore) -> Self {
        Self {
            store,
            ids: Box::new(SequentialIds::new()),
        }
    }

    /// Replaces the id generator
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &PedigreeStore {
        &self.store
    }

    /// Copies every horse into a snapshot
    pub fn snapshot(&self) -> Vec<Horse> {
        self.store.to_vec()
    }

    /// Root of the pedigree
    pub fn root(&self) -> HorseId {
        HorseId::root()
    }

    /// Looks up a horse
    pub fn horse(&self, id: &HorseId) -> Result<&Horse, PedigreeError> {
        self.store
            .find(id)
            .ok_or_else(|| PedigreeError::NotFound(id.clone()))
    }

    fn horse_mut(&mut self, id: &HorseId) -> Result<&mut Horse, PedigreeError> {
        self.store
            .find_mut(id)
            .ok_or_else(|| PedigreeError::NotFound(id.clone()))
    }

    /// Hereditary score of a horse, 0 if unknown
    pub fn score(&self, id: &HorseId) -> f64 {
        score::score(&self.store, id)
    }

    /// Display hierarchy rooted at `id`
    pub fn tree(&self, id: &HorseId) -> Result<HorseNode, PedigreeError> {
        let mut scores = ScoreEngine::new(&self.store);
        build_tree_with(&self.store, &mut scores, id)
            .ok_or_else(|| PedigreeError::NotFound(id.clone()))
    }

    /// Known ancestors of a horse, nearest first
    pub fn ancestors(&self, id: &HorseId) -> Result<Vec<HorseId>, PedigreeError> {
        self.horse(id)?;
        Ok(ancestors(&self.store, id))
    }

    /// Horses that could fill `role` for `child`, sorted by name
    ///
    /// Candidates have the right sex and are not the child itself. Horses
    /// that would close a cycle are still listed; linking them is rejected.
    pub fn candidates(&self, child: &HorseId, role: ParentRole) -> Result<Vec<&Horse>, PedigreeError> {
        self.horse(child)?;

        let mut candidates: Vec<&Horse> = self
            .store
            .iter()
            .filter(|h| &h.id != child && h.sex == role.required_sex())
            .collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(candidates)
    }

    /// Renames a horse; the name is trimmed and must not be empty
    pub fn rename(&mut self, id: &HorseId, name: &str) -> Result<Change, PedigreeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PedigreeError::EmptyName);
        }

        self.horse_mut(id)?.name = name.to_string();
        Ok(Change::on(id))
    }

    /// Flips the Hall of Fame flag, returning the new state
    pub fn toggle_hall_of_fame(&mut self, id: &HorseId) -> Result<(bool, Change), PedigreeError> {
        let horse = self.horse_mut(id)?;
        horse.is_hall_of_fame = !horse.is_hall_of_fame;
        Ok((horse.is_hall_of_fame, Change::on(id)))
    }

    /// Creates a new horse and links it into an empty parent slot
    ///
    /// A blank name becomes "Sire of {child}" / "Dam of {child}". A fresh id
    /// can't be anyone's ancestor, so no cycle check is needed.
    pub fn add_parent(
        &mut self,
        child: &HorseId,
        role: ParentRole,
        name: &str,
    ) -> Result<Change, PedigreeError> {
        let child_horse = self.horse(child)?;
        if let Some(current) = child_horse.parent(role) {
            return Err(PedigreeError::ParentSlotOccupied {
                child: child.clone(),
                role,
                current: current.clone(),
            });
        }

        let name = match name.trim() {
            "" => format!("{} of {}", role.label(), child_horse.name),
            trimmed => trimmed.to_string(),
        };

        let new_id = self.ids.next_id(&self.store);
        self.store
            .insert(Horse::new(new_id.clone(), name, role.required_sex()))?;
        self.horse_mut(child)?.set_parent(role, Some(new_id.clone()));

        Ok(Change {
            subject: Some(child.clone()),
            created: Some(new_id),
            pruned: Vec::new(),
        })
    }

    /// Links an existing horse as a parent
    ///
    /// The parent must exist, differ from the child, match the slot's sex
    /// and must not have the child among its ancestors. If the slot held a
    /// different horse, anything left unreachable is pruned.
    pub fn link_parent(
        &mut self,
        child: &HorseId,
        role: ParentRole,
        parent: &HorseId,
    ) -> Result<Change, PedigreeError> {
        let previous = self.horse(child)?.parent(role).cloned();
        let parent_horse = self.horse(parent)?;

        if would_create_cycle(&self.store, child, Some(parent)) {
            return Err(PedigreeError::CycleRejected {
                child: child.clone(),
                parent: parent.clone(),
                role,
            });
        }
        if parent_horse.sex != role.required_sex() {
            return Err(PedigreeError::WrongSex {
                id: parent.clone(),
                actual: parent_horse.sex,
                role,
            });
        }

        self.horse_mut(child)?.set_parent(role, Some(parent.clone()));

        let mut change = Change::on(child);
        if previous.is_some_and(|p| &p != parent) {
            change.pruned = self.prune();
        }
        Ok(change)
    }

    /// Clears a parent slot and prunes whatever the root can no longer reach
    pub fn remove_parent(&mut self, child: &HorseId, role: ParentRole) -> Result<Change, PedigreeError> {
        let previous = self.horse_mut(child)?.set_parent(role, None);

        let mut change = Change::on(child);
        if previous.is_some() {
            change.pruned = self.prune();
        }
        Ok(change)
    }

    /// Replaces the whole pedigree with a validated snapshot
    pub fn replace(&mut self, horses: Vec<Horse>) -> Result<(), PedigreeError> {
        self.store.replace_all(horses)?;
        Ok(())
    }

    /// Removes every horse the root can't reach
    pub fn prune(&mut self) -> Vec<HorseId> {
        prune_unreachable(&mut self.store, &HorseId::root())
    }
}
