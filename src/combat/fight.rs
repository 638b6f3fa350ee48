//! Zombie combat
//!
//! One deterministic exchange per turn: the player strikes, and a zombie
//! still standing strikes back. Force soaks the zombie's hit before health.

use crate::entities::{Player, ZombieStats};

/// Outcome of one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CombatReport {
    /// Damage the player dealt
    pub dealt: i32,
    /// Health the player lost
    pub taken: i32,
    /// Damage soaked by force
    pub absorbed: i32,
    pub zombie_defeated: bool,
}

/// Resolve one round between the player and a zombie, mutating both
pub fn fight(zombie: &mut ZombieStats, player: &mut Player) -> CombatReport {
    let dealt = player.strength.max(0);
    zombie.health -= dealt;

    if zombie.is_dead() {
        return CombatReport {
            dealt,
            zombie_defeated: true,
            ..Default::default()
        };
    }

    let blow = zombie.strength.max(0);
    let absorbed = player.force.absorb(blow);
    let taken = player.damage(blow - absorbed);

    CombatReport {
        dealt,
        taken,
        absorbed,
        zombie_defeated: false,
    }
}
