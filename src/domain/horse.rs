//! Horse domain model
//!
//! A horse is the only entity of a pedigree. Each horse may reference one
//! sire (male parent) and one dam (female parent).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id::HorseId;

/// Sex of a horse, deciding which parent slot it can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// The parent slot a horse of this sex fills
    pub fn parent_role(&self) -> ParentRole {
        match self {
            Sex::Male => ParentRole::Sire,
            Sex::Female => ParentRole::Dam,
        }
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "stallion" => Ok(Sex::Male),
            "female" | "f" | "mare" => Ok(Sex::Female),
            other => Err(format!("unknown sex '{}', expected 'male' or 'female'", other)),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent slot on a horse record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRole {
    Sire,
    Dam,
}

impl ParentRole {
    /// Sex a horse must have to fill this slot
    pub fn required_sex(&self) -> Sex {
        match self {
            ParentRole::Sire => Sex::Male,
            ParentRole::Dam => Sex::Female,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParentRole::Sire => "Sire",
            ParentRole::Dam => "Dam",
        }
    }
}

impl FromStr for ParentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sire" => Ok(ParentRole::Sire),
            "dam" => Ok(ParentRole::Dam),
            other => Err(format!("unknown parent slot '{}', expected 'sire' or 'dam'", other)),
        }
    }
}

impl fmt::Display for ParentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRole::Sire => f.write_str("sire"),
            ParentRole::Dam => f.write_str("dam"),
        }
    }
}

/// A horse record
///
/// Field names follow the snapshot format: `{"id", "name", "isHoF",
/// "sireId", "damId", "sex"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Horse {
    pub id: HorseId,

    pub name: String,

    /// Hall of Fame horses score 100 regardless of their ancestry
    #[serde(rename = "isHoF", alias = "isHallOfFame", default)]
    pub is_hall_of_fame: bool,

    #[serde(default)]
    pub sire_id: Option<HorseId>,

    #[serde(default)]
    pub dam_id: Option<HorseId>,

    pub sex: Sex,
}

impl Horse {
    /// Creates a horse with unknown parents
    pub fn new(id: HorseId, name: impl Into<String>, sex: Sex) -> Self {
        Self {
            id,
            name: name.into(),
            is_hall_of_fame: false,
            sire_id: None,
            dam_id: None,
            sex,
        }
    }

    /// Builder-style Hall of Fame flag
    pub fn hall_of_fame(mut self, flag: bool) -> Self {
        self.is_hall_of_fame = flag;
        self
    }

    /// Builder-style sire assignment
    pub fn with_sire(mut self, sire: HorseId) -> Self {
        self.sire_id = Some(sire);
        self
    }

    /// Builder-style dam assignment
    pub fn with_dam(mut self, dam: HorseId) -> Self {
        self.dam_id = Some(dam);
        self
    }

    /// Returns the parent in the given slot
    pub fn parent(&self, role: ParentRole) -> Option<&HorseId> {
        match role {
            ParentRole::Sire => self.sire_id.as_ref(),
            ParentRole::Dam => self.dam_id.as_ref(),
        }
    }

    /// Sets or clears the parent in the given slot, returning the previous value
    pub fn set_parent(&mut self, role: ParentRole, parent: Option<HorseId>) -> Option<HorseId> {
        let slot = match role {
            ParentRole::Sire => &mut self.sire_id,
            ParentRole::Dam => &mut self.dam_id,
        };
        std::mem::replace(slot, parent)
    }

    /// Iterates over known parents, sire first
    pub fn parents(&self) -> impl Iterator<Item = &HorseId> {
        self.sire_id.iter().chain(self.dam_id.iter())
    }
}
