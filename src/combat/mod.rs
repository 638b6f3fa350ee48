//! Combat system

pub mod fight;
pub mod status;

pub use fight::{fight, CombatReport};
pub use status::{EffectKind, StatusEffect, StatusLedger};
