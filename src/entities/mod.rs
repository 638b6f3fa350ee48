//! Entity creation and behaviour

pub mod entity;
pub mod factory;
pub mod player;
pub mod zombie;

pub use entity::{Attribute, Entity, EntityId, EntityKind, Potion, Weapon, ZombieStats};
pub use factory::{create_entity, is_player_record};
pub use player::{Force, Inventory, Player, KEY_ITEM, MAX_HEALTH, MIN_HEALTH};
