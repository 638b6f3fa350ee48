//! Narrative events
//!
//! Everything that happens during a turn is reported as a `GameEvent`, in
//! order. The notification log displays them through `Display`.

use std::fmt;

use crate::combat::EffectKind;
use crate::entities::Attribute;
use crate::world::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    KeyFound,
    DoorUnlocked,
    DoorLocked,
    ZombieHit { dealt: i32, taken: i32, absorbed: i32 },
    ZombieDefeated,
    PotionDrunk { name: String, effect: i32 },
    TrapTriggered { damage: i32 },
    Healed { amount: i32 },
    AlreadyHealthy,
    KeyStolen,
    ThiefStruck { damage: i32 },
    ThiefIgnored,
    WeaponEquipped { name: String },
    WeaponDropped { name: String },
    Teleported { to: Position },
    Blocked,
    EffectExpired { kind: EffectKind, attribute: Attribute },
    LevelComplete,
    Escaped,
    PlayerDied,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::KeyFound => write!(f, "Found a shiny new key"),
            GameEvent::DoorUnlocked => write!(f, "The key turns and the door swings open"),
            GameEvent::DoorLocked => write!(f, "The door is locked"),
            GameEvent::ZombieHit { dealt, taken, absorbed } => {
                if *absorbed > 0 {
                    write!(
                        f,
                        "You hit the zombie for {}, it hits back for {} ({} absorbed)",
                        dealt, taken, absorbed
                    )
                } else {
                    write!(f, "You hit the zombie for {}, it hits back for {}", dealt, taken)
                }
            }
            GameEvent::ZombieDefeated => write!(f, "The zombie collapses"),
            GameEvent::PotionDrunk { name, effect } => {
                write!(f, "You drank {} effect is {}", name, effect)
            }
            GameEvent::TrapTriggered { damage } => write!(f, "A trap springs! You lose {} health", damage),
            GameEvent::Healed { amount } => write!(f, "The healer restores {} health", amount),
            GameEvent::AlreadyHealthy => write!(f, "You are already in perfect health"),
            GameEvent::KeyStolen => write!(f, "A thief snatched one of your keys"),
            GameEvent::ThiefStruck { damage } => write!(f, "The thief stabs you for {}", damage),
            GameEvent::ThiefIgnored => write!(f, "The thief finds nothing worth taking"),
            GameEvent::WeaponEquipped { name } => write!(f, "You wield the {}", name),
            GameEvent::WeaponDropped { name } => write!(f, "You set aside the {}", name),
            GameEvent::Teleported { to } => write!(f, "You are pulled through the portal to {}", to),
            GameEvent::Blocked => write!(f, "Something is in the way"),
            GameEvent::EffectExpired { kind, attribute } => {
                write!(f, "The {} on your {} wears off", kind.name(), attribute.name())
            }
            GameEvent::LevelComplete => write!(f, "You descend deeper"),
            GameEvent::Escaped => write!(f, "You escaped the crypt!"),
            GameEvent::PlayerDied => write!(f, "You have died"),
        }
    }
}
