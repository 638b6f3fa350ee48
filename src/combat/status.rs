//! Status effects system
//!
//! Timed heals, poisons and buffs on the player. Effects tick once per
//! resolved turn and are dropped when their counter runs out.

use serde::{Deserialize, Serialize};

use crate::entities::{Attribute, Player};
use crate::game::GameEvent;

/// How an effect behaves while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Adds health every turn
    Heal,
    /// Removes health every turn
    Poison,
    /// Applied once up front, taken back on expiry
    Buff,
}

impl EffectKind {
    /// Get display name for this effect
    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Heal => "healing",
            EffectKind::Poison => "poison",
            EffectKind::Buff => "boost",
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub attribute: Attribute,
    /// Per-turn delta for heal/poison, the one-shot amount for buffs
    pub amount: i32,
    /// Change a buff actually made to the current value, taken back on expiry
    #[serde(default)]
    pub applied: i32,
    pub remaining: u32,
}

impl StatusEffect {
    /// Heal or poison depending on the sign of `per_turn`
    pub fn over_time(per_turn: i32, turns: u32) -> Self {
        let kind = if per_turn < 0 { EffectKind::Poison } else { EffectKind::Heal };
        Self {
            kind,
            attribute: Attribute::Health,
            amount: per_turn,
            applied: 0,
            remaining: turns,
        }
    }

    /// A buff whose `amount` was already added to `attribute`, with
    /// `applied` being what `Player::modify` reported for it
    pub fn buff(attribute: Attribute, amount: i32, applied: i32, turns: u32) -> Self {
        Self {
            kind: EffectKind::Buff,
            attribute,
            amount,
            applied,
            remaining: turns,
        }
    }
}

/// Active effects on the player, in the order they were installed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect. Repeat applications are independent entries.
    pub fn install(&mut self, effect: StatusEffect) {
        log::debug!("Installing {:?}", effect);
        if effect.remaining == 0 {
            log::warn!("Ignoring status effect with no duration: {:?}", effect);
            return;
        }
        self.effects.push(effect);
    }

    /// Tick every effect once against the player
    pub fn advance(&mut self, player: &mut Player) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for effect in &mut self.effects {
            match effect.kind {
                EffectKind::Heal | EffectKind::Poison => {
                    // Applies on the final tick too
                    player.modify(effect.attribute, effect.amount);
                }
                EffectKind::Buff => {}
            }

            effect.remaining = effect.remaining.saturating_sub(1);

            if effect.remaining == 0 {
                if effect.kind == EffectKind::Buff {
                    player.revert(effect.attribute, effect.amount, effect.applied);
                }
                events.push(GameEvent::EffectExpired {
                    kind: effect.kind,
                    attribute: effect.attribute,
                });
            }
        }

        self.effects.retain(|e| e.remaining > 0);
        events
    }

    /// Drop every effect. Outstanding buffs are taken back first so their
    /// bonus does not outlive the ledger; heal and poison simply stop.
    pub fn dispel(&mut self, player: &mut Player) {
        for effect in self.effects.drain(..) {
            if effect.kind == EffectKind::Buff {
                player.revert(effect.attribute, effect.amount, effect.applied);
            }
        }
    }

    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
