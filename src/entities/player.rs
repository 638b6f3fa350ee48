//! Player record
//!
//! The single player of a play session. Stats and inventory survive level
//! changes; only a fresh start recreates the record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PlayerStart;
use crate::world::Position;
use super::entity::{Attribute, Weapon};

/// Lowest health the player can have. Reaching it ends the game.
pub const MIN_HEALTH: i32 = 0;
/// Highest health the player can have
pub const MAX_HEALTH: i32 = 10;

/// Inventory item name for keys
pub const KEY_ITEM: &str = "Key";

/// Force pool, which soaks up zombie hits before health does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Force {
    pub current: i32,
    pub max: i32,
}

impl Force {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    /// Soak up to `amount` points, returns how much was absorbed
    pub fn absorb(&mut self, amount: i32) -> i32 {
        let absorbed = amount.clamp(0, self.current.max(0));
        self.current -= absorbed;
        absorbed
    }

    /// Shift both the pool size and its current value.
    /// Returns the change actually made to `current`.
    pub fn shift(&mut self, delta: i32) -> i32 {
        let before = self.current;
        self.max += delta;
        self.current = (self.current + delta).clamp(0, self.max.max(0));
        self.current - before
    }

    /// Undo a `shift(delta)` that moved `current` by `applied`
    pub fn unshift(&mut self, delta: i32, applied: i32) {
        self.max -= delta;
        self.current = (self.current - applied).clamp(0, self.max.max(0));
    }
}

/// Item counts keyed by name. Absence means zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str) {
        *self.items.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Remove one of an item, returns false if none was held
    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.get_mut(name) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.items.remove(name);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, name: &str) -> u32 {
        self.items.get(name).copied().unwrap_or(0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.count(name) > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    health: i32,
    pub strength: i32,
    pub force: Force,
    /// Currently equipped weapon, its bonuses are folded into the stats
    pub weapon: Option<Weapon>,
    /// What the weapon's force bonus actually added to `force.current`
    #[serde(default)]
    weapon_force: i32,
    pub inventory: Inventory,
}

impl Player {
    /// Create a fresh player at a spawn point
    pub fn new(position: Position, start: &PlayerStart) -> Self {
        Self {
            position,
            health: start.health.clamp(MIN_HEALTH, MAX_HEALTH),
            strength: start.strength,
            force: Force::new(start.force),
            weapon: None,
            weapon_force: 0,
            inventory: Inventory::new(),
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= MIN_HEALTH
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= MAX_HEALTH
    }

    /// Shift health by `delta`, clamped to the health bounds.
    /// Returns the change actually applied.
    pub fn adjust_health(&mut self, delta: i32) -> i32 {
        let before = self.health;
        self.health = (self.health + delta).clamp(MIN_HEALTH, MAX_HEALTH);
        self.health - before
    }

    /// Take damage, returns the health actually lost
    pub fn damage(&mut self, amount: i32) -> i32 {
        -self.adjust_health(-amount.max(0))
    }

    /// Heal, returns the health actually gained
    pub fn heal(&mut self, amount: i32) -> i32 {
        self.adjust_health(amount.max(0))
    }

    /// Apply a raw delta to an attribute.
    /// Returns the change actually made to its current value.
    pub fn modify(&mut self, attribute: Attribute, delta: i32) -> i32 {
        match attribute {
            Attribute::Health => self.adjust_health(delta),
            Attribute::Strength => {
                self.strength += delta;
                delta
            }
            Attribute::Force => self.force.shift(delta),
        }
    }

    /// Undo a `modify(attribute, delta)` that returned `applied`
    pub fn revert(&mut self, attribute: Attribute, delta: i32, applied: i32) {
        match attribute {
            Attribute::Health => {
                self.adjust_health(-applied);
            }
            Attribute::Strength => self.strength -= delta,
            Attribute::Force => self.force.unshift(delta, applied),
        }
    }

    /// Equip a weapon, stripping the bonuses of the previous one first.
    /// Returns the weapon that was replaced.
    pub fn equip(&mut self, weapon: Weapon) -> Option<Weapon> {
        let previous = self.unequip();
        self.strength += weapon.attack_bonus;
        self.weapon_force = self.force.shift(weapon.force_bonus);
        self.inventory.add(&weapon.name);
        self.weapon = Some(weapon);
        previous
    }

    /// Remove the equipped weapon's bonuses
    pub fn unequip(&mut self) -> Option<Weapon> {
        let weapon = self.weapon.take()?;
        self.strength -= weapon.attack_bonus;
        self.force.unshift(weapon.force_bonus, self.weapon_force);
        self.weapon_force = 0;
        Some(weapon)
    }
}
