//! Entity records
//!
//! Every non-player object on the grid. The kind is a closed set so the
//! turn resolver can match it exhaustively.

use serde::{Deserialize, Serialize};

use crate::world::Position;

/// Stable per-level identifier, assigned in encounter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Player attribute a potion or buff can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Health,
    Strength,
    Force,
}

impl Attribute {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "health" => Some(Attribute::Health),
            "strength" => Some(Attribute::Strength),
            "force" => Some(Attribute::Force),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Health => "health",
            Attribute::Strength => "strength",
            Attribute::Force => "force",
        }
    }
}

/// Zombie combat stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZombieStats {
    pub health: i32,
    pub strength: i32,
}

impl ZombieStats {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// A drinkable potion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potion {
    pub name: String,
    /// None for an attribute the player does not have. Drinking it does nothing.
    pub attribute: Option<Attribute>,
    pub effect: i32,
}

/// A weapon lying on the floor, or held by the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub attack_bonus: i32,
    pub force_bonus: i32,
    /// Sprite the renderer should use while equipped
    pub sprite: Option<String>,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Key,
    Door,
    Zombie(ZombieStats),
    Potion(Potion),
    Weapon(Weapon),
    Teleport { pair: String },
    Trap,
    Healer,
    Thief,
    Generic,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Key => "key",
            EntityKind::Door => "door",
            EntityKind::Zombie(_) => "zombie",
            EntityKind::Potion(_) => "potion",
            EntityKind::Weapon(_) => "weapon",
            EntityKind::Teleport { .. } => "teleport",
            EntityKind::Trap => "trap",
            EntityKind::Healer => "healer",
            EntityKind::Thief => "thief",
            EntityKind::Generic => "obstacle",
        }
    }
}

/// A live entity in the current level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub symbol: char,
    pub kind: EntityKind,
}

impl Entity {
    pub fn is_zombie(&self) -> bool {
        matches!(self.kind, EntityKind::Zombie(_))
    }

    pub fn is_door(&self) -> bool {
        matches!(self.kind, EntityKind::Door)
    }

    /// Pair id if this is a teleport
    pub fn teleport_pair(&self) -> Option<&str> {
        match &self.kind {
            EntityKind::Teleport { pair } => Some(pair),
            _ => None,
        }
    }
}
