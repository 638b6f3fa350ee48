//! Entity factory
//!
//! Turns raw level records into typed entities. A record that cannot be
//! classified becomes a `Generic` obstacle and logs a warning instead of
//! failing the level.

use crate::data::RawComponent;
use super::entity::{Attribute, Entity, EntityId, EntityKind, Potion, Weapon, ZombieStats};

pub const PLAYER_SYMBOL: char = 'H';
pub const KEY_SYMBOL: char = 'K';
pub const DOOR_SYMBOL: char = 'D';
pub const ZOMBIE_SYMBOL: char = 'Z';
pub const POTION_SYMBOL: char = 'P';
pub const WEAPON_SYMBOL: char = 'W';
pub const TELEPORT_SYMBOL: char = 'T';
pub const TRAP_SYMBOL: char = 'X';
pub const HEALER_SYMBOL: char = 'F';
pub const THIEF_SYMBOL: char = 'G';

const DEFAULT_ZOMBIE_HEALTH: i32 = 3;
const DEFAULT_ZOMBIE_STRENGTH: i32 = 1;

/// Whether a raw record is the player spawn
pub fn is_player_record(raw: &RawComponent) -> bool {
    raw.symbol_char() == Some(PLAYER_SYMBOL)
}

/// Build an entity from a raw record
pub fn create_entity(id: EntityId, raw: &RawComponent) -> Entity {
    let symbol = raw.symbol_char().unwrap_or('?');
    let kind = match classify(symbol, raw) {
        Ok(kind) => kind,
        Err(reason) => {
            log::warn!(
                "Component {:?} at {} could not be classified ({}), treating as obstacle",
                raw.symbol,
                raw.position(),
                reason
            );
            EntityKind::Generic
        }
    };

    Entity {
        id,
        position: raw.position(),
        symbol,
        kind,
    }
}

fn classify(symbol: char, raw: &RawComponent) -> Result<EntityKind, String> {
    let kind = match symbol {
        KEY_SYMBOL => EntityKind::Key,
        DOOR_SYMBOL => EntityKind::Door,
        ZOMBIE_SYMBOL => EntityKind::Zombie(ZombieStats {
            health: raw.int("health").unwrap_or(DEFAULT_ZOMBIE_HEALTH),
            strength: raw.int("strength").unwrap_or(DEFAULT_ZOMBIE_STRENGTH),
        }),
        POTION_SYMBOL => {
            let attribute_name = raw.text("attribute").ok_or("potion without attribute")?;
            let attribute = Attribute::from_name(&attribute_name);
            if attribute.is_none() {
                log::warn!(
                    "Potion at ({}, {}) boosts unknown attribute {:?}, it will have no effect",
                    raw.row,
                    raw.col,
                    attribute_name
                );
            }
            let effect = raw.int("effect").ok_or("potion without effect")?;
            EntityKind::Potion(Potion {
                name: raw.text("name").unwrap_or_else(|| "Potion".to_string()),
                attribute,
                effect,
            })
        }
        WEAPON_SYMBOL => EntityKind::Weapon(Weapon {
            name: raw.text("name").ok_or("weapon without name")?,
            attack_bonus: raw.int("attack").unwrap_or(0),
            force_bonus: raw.int("force").unwrap_or(0),
            sprite: raw.text("sprite"),
        }),
        TELEPORT_SYMBOL => EntityKind::Teleport {
            pair: raw.text("pair").ok_or("teleport without pair id")?,
        },
        TRAP_SYMBOL => EntityKind::Trap,
        HEALER_SYMBOL => EntityKind::Healer,
        THIEF_SYMBOL => EntityKind::Thief,
        '?' => return Err("empty symbol".to_string()),
        other => {
            log::debug!("Symbol {:?} has no interaction, using obstacle", other);
            EntityKind::Generic
        }
    };
    Ok(kind)
}
