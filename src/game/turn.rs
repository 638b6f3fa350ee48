//! Turn resolution
//!
//! One player input becomes one turn: pick the target cell, run a single
//! interaction pass over every entity, commit the move, then tick status
//! effects and the camera.

use std::collections::HashSet;

use crate::combat::{fight, StatusEffect, StatusLedger};
use crate::config::Rules;
use crate::entities::zombie::{idle_step, Surroundings};
use crate::entities::{Attribute, Entity, EntityId, EntityKind, Player, Potion, KEY_ITEM, MIN_HEALTH};
use crate::input::Direction;
use crate::world::Position;
use super::camera::Camera;
use super::events::GameEvent;
use super::progression::LevelTransition;
use super::session::{PlayStatus, Session};

/// The action a turn resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Move(Direction),
    /// Stay in place for a turn
    Wait,
}

/// Result of resolving one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Narrative events, in the order they happened
    pub events: Vec<GameEvent>,
    pub game_over: bool,
    pub transition: LevelTransition,
}

impl TurnOutcome {
    fn halted() -> Self {
        Self {
            events: Vec::new(),
            game_over: true,
            transition: LevelTransition::Continue,
        }
    }
}

/// Whether an entity survives the interaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retain {
    Keep,
    Remove,
}

/// Mutable view of the session while entities are dispatched
struct Dispatch<'a> {
    player: &'a mut Player,
    effects: &'a mut StatusLedger,
    rules: &'a Rules,
    exit_door: Option<EntityId>,
    /// (position, pair id) of every teleport at the start of the turn
    teleports: &'a [(Position, String)],
    origin: Position,
    destination: Position,
    teleported: bool,
    exit_reached: bool,
    events: Vec<GameEvent>,
}

impl Dispatch<'_> {
    /// Cancel the move for this turn
    fn block(&mut self) {
        self.destination = self.origin;
    }

    /// Apply the rule for an entity the player stepped into
    fn interact(&mut self, entity: &mut Entity) -> Retain {
        match &mut entity.kind {
            EntityKind::Key => {
                self.player.inventory.add(KEY_ITEM);
                self.events.push(GameEvent::KeyFound);
                Retain::Remove
            }
            EntityKind::Door => {
                if self.player.inventory.remove(KEY_ITEM) {
                    self.events.push(GameEvent::DoorUnlocked);
                    if self.exit_door == Some(entity.id) {
                        self.exit_reached = true;
                    }
                    Retain::Remove
                } else {
                    self.block();
                    self.events.push(GameEvent::DoorLocked);
                    Retain::Keep
                }
            }
            EntityKind::Zombie(stats) => {
                self.block();
                let report = fight(stats, self.player);
                if report.zombie_defeated {
                    self.events.push(GameEvent::ZombieDefeated);
                    Retain::Remove
                } else {
                    self.events.push(GameEvent::ZombieHit {
                        dealt: report.dealt,
                        taken: report.taken,
                        absorbed: report.absorbed,
                    });
                    Retain::Keep
                }
            }
            EntityKind::Potion(potion) => {
                self.drink(potion);
                Retain::Remove
            }
            EntityKind::Trap => {
                let lost = self.player.damage(self.rules.trap_damage);
                self.events.push(GameEvent::TrapTriggered { damage: lost });
                Retain::Keep
            }
            EntityKind::Healer => {
                self.block();
                if self.player.is_full_health() {
                    self.events.push(GameEvent::AlreadyHealthy);
                } else {
                    let amount = self.player.heal(self.rules.healer_amount);
                    self.events.push(GameEvent::Healed { amount });
                }
                Retain::Keep
            }
            EntityKind::Thief => {
                self.block();
                if self.player.inventory.remove(KEY_ITEM) {
                    self.events.push(GameEvent::KeyStolen);
                } else if self.player.health() > MIN_HEALTH {
                    let damage = self.player.damage(self.rules.thief_damage);
                    self.events.push(GameEvent::ThiefStruck { damage });
                } else {
                    self.events.push(GameEvent::ThiefIgnored);
                }
                Retain::Keep
            }
            EntityKind::Weapon(weapon) => {
                let name = weapon.name.clone();
                if let Some(old) = self.player.equip(weapon.clone()) {
                    self.events.push(GameEvent::WeaponDropped { name: old.name });
                }
                self.events.push(GameEvent::WeaponEquipped { name });
                Retain::Remove
            }
            EntityKind::Teleport { pair } => {
                if !self.teleported {
                    let here = entity.position;
                    let exit = self
                        .teleports
                        .iter()
                        .find(|(pos, id)| id == pair && *pos != here)
                        .map(|(pos, _)| *pos);
                    match exit {
                        Some(to) => {
                            self.destination = to;
                            self.teleported = true;
                            self.events.push(GameEvent::Teleported { to });
                        }
                        None => log::warn!("Teleport {:?} at {} has no partner", pair, here),
                    }
                }
                Retain::Keep
            }
            EntityKind::Generic => {
                self.block();
                self.events.push(GameEvent::Blocked);
                Retain::Keep
            }
        }
    }

    /// Health potions tick over time; strength and force potions apply now
    /// and are taken back when their buff expires.
    fn drink(&mut self, potion: &Potion) {
        self.events.push(GameEvent::PotionDrunk {
            name: potion.name.clone(),
            effect: potion.effect,
        });
        let Some(attribute) = potion.attribute else {
            return;
        };
        if potion.effect == 0 {
            return;
        }

        match attribute {
            Attribute::Health => {
                self.effects
                    .install(StatusEffect::over_time(potion.effect, self.rules.potion_duration));
            }
            attribute => {
                let applied = self.player.modify(attribute, potion.effect);
                self.effects.install(StatusEffect::buff(
                    attribute,
                    potion.effect,
                    applied,
                    self.rules.buff_duration,
                ));
            }
        }
    }
}

impl Session {
    /// Resolve one turn. Does nothing once the run has ended.
    pub fn resolve_turn(&mut self, step: Step) -> TurnOutcome {
        if self.status.is_terminal() {
            return TurnOutcome::halted();
        }
        self.turn += 1;

        let origin = self.player.position;
        let mut target = match step {
            Step::Move(direction) => {
                let (dr, dc) = direction.delta();
                origin.offset(dr, dc)
            }
            Step::Wait => origin,
        };

        // Walls, void and off-map cells turn the move into a bump
        if !self.world.grid.is_walkable(target) {
            target = origin;
        }

        let entities = std::mem::take(&mut self.world.entities);
        let teleports: Vec<(Position, String)> = entities
            .iter()
            .filter_map(|e| e.teleport_pair().map(|pair| (e.position, pair.to_string())))
            .collect();
        let mut occupied: HashSet<Position> = entities.iter().map(|e| e.position).collect();

        let mut dispatch = Dispatch {
            player: &mut self.player,
            effects: &mut self.effects,
            rules: &self.rules,
            exit_door: self.world.exit_door,
            teleports: &teleports,
            origin,
            destination: target,
            teleported: false,
            exit_reached: false,
            events: Vec::new(),
        };

        let mut kept = Vec::with_capacity(entities.len());
        for mut entity in entities {
            // A level change is pending: leave everything else untouched
            if dispatch.exit_reached {
                kept.push(entity);
                continue;
            }

            if entity.position == target {
                match dispatch.interact(&mut entity) {
                    Retain::Keep => kept.push(entity),
                    Retain::Remove => {
                        occupied.remove(&entity.position);
                    }
                }
                continue;
            }

            if entity.is_zombie() {
                occupied.remove(&entity.position);
                let around = Surroundings {
                    grid: &self.world.grid,
                    player: origin,
                    target,
                    occupied: &occupied,
                };
                if let Some(next) = idle_step(entity.position, &around, self.rules.chase_radius, &mut self.rng) {
                    entity.position = next;
                }
                occupied.insert(entity.position);
            }
            kept.push(entity);
        }

        let destination = dispatch.destination;
        let exit_reached = dispatch.exit_reached;
        let mut events = dispatch.events;

        // Commit
        self.world.entities = kept;
        self.player.position = destination;

        let mut transition = LevelTransition::Continue;
        if self.player.is_dead() {
            self.status = PlayStatus::Dead;
            events.push(GameEvent::PlayerDied);
        } else if exit_reached {
            transition = self.progression.on_exit_reached();
            match transition {
                LevelTransition::Finished => {
                    self.status = PlayStatus::Won;
                    events.push(GameEvent::Escaped);
                }
                LevelTransition::Advance { .. } => events.push(GameEvent::LevelComplete),
                LevelTransition::Continue => {}
            }
        }

        // The ledger is replaced on a level change, so only tick it when staying
        if transition == LevelTransition::Continue && !self.status.is_terminal() {
            events.extend(self.effects.advance(&mut self.player));
            if self.player.is_dead() {
                self.status = PlayStatus::Dead;
                events.push(GameEvent::PlayerDied);
            }
            self.camera = Camera::recompute(self.player.position, &self.world.grid, &self.viewport);
        }

        log::debug!(
            "Turn {}: {:?} {} -> {}, {} events, {:?}",
            self.turn,
            step,
            origin,
            self.player.position,
            events.len(),
            transition
        );

        TurnOutcome {
            events,
            game_over: self.status.is_terminal(),
            transition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::data::{LevelData, RawComponent};
    use crate::entities::{Weapon, MAX_HEALTH};
    use crate::world::WorldModel;

    const ROOM: [&str; 7] = [
        "#########",
        "#.......#",
        "#.......#",
        "#.......#",
        "#.......#",
        "#.......#",
        "#########",
    ];

    fn config() -> GameConfig {
        GameConfig {
            levels: vec!["one".into(), "two".into()],
            seed: Some(7),
            ..GameConfig::default()
        }
    }

    fn session_in(structure: &[&str], player: (i32, i32), components: Vec<RawComponent>) -> Session {
        let mut all = vec![RawComponent::new("H", player.0, player.1)];
        all.extend(components);
        let data = LevelData {
            id: "one".into(),
            structure: structure.iter().map(|r| r.to_string()).collect(),
            components: all,
        };
        Session::start(WorldModel::load_level(&data).unwrap(), &config())
    }

    fn session_with(player: (i32, i32), components: Vec<RawComponent>) -> Session {
        session_in(&ROOM, player, components)
    }

    fn right(session: &mut Session) -> TurnOutcome {
        session.resolve_turn(Step::Move(Direction::Right))
    }

    #[test]
    fn test_key_pickup() {
        let mut s = session_with((2, 2), vec![RawComponent::new("K", 2, 3)]);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(2, 3));
        assert_eq!(s.player().inventory.count(KEY_ITEM), 1);
        assert!(s.world().entities().is_empty());
        assert_eq!(outcome.events, vec![GameEvent::KeyFound]);
    }

    #[test]
    fn test_locked_door_blocks() {
        let mut s = session_with((2, 2), vec![RawComponent::new("D", 2, 3)]);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(2, 2));
        assert_eq!(s.world().entities().len(), 1);
        assert!(outcome.events.contains(&GameEvent::DoorLocked));
        assert_eq!(outcome.transition, LevelTransition::Continue);
    }

    #[test]
    fn test_wall_bump_still_ticks_effects() {
        let mut s = session_with((1, 1), vec![]);
        s.effects.install(StatusEffect::over_time(-1, 3));
        let outcome = s.resolve_turn(Step::Move(Direction::Up));
        assert_eq!(s.player().position, Position::new(1, 1));
        assert_eq!(s.player().health(), MAX_HEALTH - 1);
        assert_eq!(s.effects().effects()[0].remaining, 2);
        assert!(!outcome.game_over);
    }

    #[test]
    fn test_inner_door_unlocks_without_progressing() {
        let mut s = session_with(
            (2, 1),
            vec![
                RawComponent::new("K", 2, 2),
                RawComponent::new("D", 2, 3),
                RawComponent::new("D", 5, 7),
            ],
        );
        right(&mut s);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(2, 3));
        assert_eq!(s.player().inventory.count(KEY_ITEM), 0);
        assert_eq!(outcome.transition, LevelTransition::Continue);
        assert_eq!(s.world().entities().len(), 1);
    }

    #[test]
    fn test_exit_door_requests_next_level() {
        let mut s = session_with((2, 1), vec![RawComponent::new("K", 2, 2), RawComponent::new("D", 2, 3)]);
        right(&mut s);
        s.effects.install(StatusEffect::over_time(-1, 5));
        let health = s.player().health();
        let outcome = right(&mut s);
        assert_eq!(outcome.transition, LevelTransition::Advance { index: 1 });
        assert!(outcome.events.contains(&GameEvent::LevelComplete));
        assert!(!outcome.game_over);
        // Ledger is not ticked on the way out
        assert_eq!(s.player().health(), health);
    }

    #[test]
    fn test_exit_door_on_last_level_wins() {
        let mut s = session_with((2, 1), vec![RawComponent::new("K", 2, 2), RawComponent::new("D", 2, 3)]);
        s.progression.set_current(1);
        right(&mut s);
        let outcome = right(&mut s);
        assert_eq!(outcome.transition, LevelTransition::Finished);
        assert!(outcome.game_over);
        assert_eq!(s.status(), PlayStatus::Won);

        // Nothing resolves after the run ends
        let after = s.resolve_turn(Step::Move(Direction::Left));
        assert!(after.events.is_empty());
        assert_eq!(s.player().position, Position::new(2, 3));
    }

    #[test]
    fn test_zombie_fight_cancels_move() {
        let mut s = session_with((2, 2), vec![RawComponent::new("Z", 2, 3).with_int("health", 5)]);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(2, 2));
        assert_eq!(s.world().entities().len(), 1);
        match &s.world().entities()[0].kind {
            EntityKind::Zombie(z) => assert_eq!(z.health, 4),
            other => panic!("expected zombie, got {:?}", other),
        }
        assert!(matches!(outcome.events[0], GameEvent::ZombieHit { dealt: 1, .. }));
    }

    #[test]
    fn test_zombie_defeated_is_removed() {
        let mut s = session_with((2, 2), vec![RawComponent::new("Z", 2, 3).with_int("health", 1)]);
        let outcome = right(&mut s);
        assert!(s.world().entities().is_empty());
        assert_eq!(s.player().position, Position::new(2, 2));
        assert_eq!(outcome.events, vec![GameEvent::ZombieDefeated]);
    }

    #[test]
    fn test_zombie_kills_player() {
        let mut s = session_with(
            (2, 2),
            vec![RawComponent::new("Z", 2, 3).with_int("health", 50).with_int("strength", 20)],
        );
        let outcome = right(&mut s);
        assert!(outcome.game_over);
        assert_eq!(s.status(), PlayStatus::Dead);
        assert_eq!(outcome.events.last(), Some(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_strength_potion_applies_now_and_expires() {
        let mut s = session_with(
            (2, 2),
            vec![RawComponent::new("P", 2, 3)
                .with_text("attribute", "strength")
                .with_int("effect", 3)],
        );
        let base = s.player().strength;
        right(&mut s);
        assert_eq!(s.player().strength, base + 3);
        assert_eq!(s.effects().effects().len(), 1);

        // buff_duration is 5 and the drinking turn already ticked once
        for _ in 0..3 {
            s.resolve_turn(Step::Wait);
            assert_eq!(s.player().strength, base + 3);
        }
        let outcome = s.resolve_turn(Step::Wait);
        assert_eq!(s.player().strength, base);
        assert!(matches!(outcome.events[0], GameEvent::EffectExpired { .. }));
    }

    #[test]
    fn test_unknown_potion_attribute_does_nothing() {
        let mut s = session_with(
            (2, 2),
            vec![RawComponent::new("P", 2, 3).with_text("attribute", "luck").with_int("effect", 4)],
        );
        let before = s.player().clone();
        let outcome = right(&mut s);

        assert_eq!(s.player().position, Position::new(2, 3));
        assert!(s.world().entities().is_empty());
        assert!(s.effects().is_empty());
        assert_eq!(s.player().health(), before.health());
        assert_eq!(s.player().strength, before.strength);
        assert_eq!(s.player().force, before.force);
        assert_eq!(
            outcome.events,
            vec![GameEvent::PotionDrunk { name: "Potion".into(), effect: 4 }]
        );
    }

    #[test]
    fn test_force_drain_potion_expires_cleanly() {
        let mut s = session_with(
            (2, 2),
            vec![RawComponent::new("P", 2, 3).with_text("attribute", "force").with_int("effect", -3)],
        );
        s.player.force.absorb(1);
        let before = s.player().force;
        right(&mut s);
        assert_eq!(s.player().force.current, 0);

        for _ in 0..4 {
            s.resolve_turn(Step::Wait);
        }
        assert!(s.effects().is_empty());
        assert_eq!(s.player().force, before);
    }

    #[test]
    fn test_health_potion_is_delayed() {
        let mut s = session_with(
            (2, 2),
            vec![RawComponent::new("P", 2, 3).with_text("attribute", "health").with_int("effect", 1)],
        );
        s.player.damage(5);
        right(&mut s);
        // One tick lands at the end of the drinking turn
        assert_eq!(s.player().health(), 6);
        s.resolve_turn(Step::Wait);
        s.resolve_turn(Step::Wait);
        assert_eq!(s.player().health(), 8);
        assert!(s.effects().is_empty());
    }

    #[test]
    fn test_trap_clamps_and_kills() {
        let mut s = session_with((2, 2), vec![RawComponent::new("X", 2, 3)]);
        s.player.damage(MAX_HEALTH - 1);
        let outcome = right(&mut s);
        assert_eq!(s.player().health(), MIN_HEALTH);
        assert_eq!(s.player().position, Position::new(2, 3));
        assert!(outcome.events.contains(&GameEvent::TrapTriggered { damage: 1 }));
        assert!(outcome.game_over);
    }

    #[test]
    fn test_healer_at_full_health() {
        let mut s = session_with((2, 2), vec![RawComponent::new("F", 2, 3)]);
        let outcome = right(&mut s);
        assert_eq!(outcome.events, vec![GameEvent::AlreadyHealthy]);
        assert!(outcome.events[0].to_string().contains("already in perfect health"));
        assert_eq!(s.player().health(), MAX_HEALTH);
        assert_eq!(s.player().position, Position::new(2, 2));
    }

    #[test]
    fn test_healer_caps_at_max() {
        let mut s = session_with((2, 2), vec![RawComponent::new("F", 2, 3)]);
        s.player.damage(1);
        let outcome = right(&mut s);
        assert_eq!(outcome.events, vec![GameEvent::Healed { amount: 1 }]);
        assert_eq!(s.player().health(), MAX_HEALTH);
    }

    #[test]
    fn test_thief_steals_key_first() {
        let mut s = session_with((2, 1), vec![RawComponent::new("K", 2, 2), RawComponent::new("G", 2, 3)]);
        right(&mut s);
        let outcome = right(&mut s);
        assert_eq!(outcome.events, vec![GameEvent::KeyStolen]);
        assert_eq!(s.player().inventory.count(KEY_ITEM), 0);
        assert_eq!(s.player().health(), MAX_HEALTH);

        let outcome = right(&mut s);
        assert_eq!(outcome.events, vec![GameEvent::ThiefStruck { damage: 1 }]);
        assert_eq!(s.player().position, Position::new(2, 2));
    }

    #[test]
    fn test_weapon_swap() {
        let mut s = session_with(
            (2, 1),
            vec![
                RawComponent::new("W", 2, 2).with_text("name", "Club").with_int("attack", 2),
                RawComponent::new("W", 2, 3).with_text("name", "Axe").with_int("attack", 4).with_int("force", 1),
            ],
        );
        let base = s.player().strength;
        right(&mut s);
        assert_eq!(s.player().strength, base + 2);
        let outcome = right(&mut s);
        assert_eq!(s.player().strength, base + 4);
        assert_eq!(s.player().position, Position::new(2, 3));
        assert_eq!(
            s.player().weapon,
            Some(Weapon { name: "Axe".into(), attack_bonus: 4, force_bonus: 1, sprite: None })
        );
        assert_eq!(
            outcome.events,
            vec![
                GameEvent::WeaponDropped { name: "Club".into() },
                GameEvent::WeaponEquipped { name: "Axe".into() },
            ]
        );
        assert!(s.world().entities().is_empty());
    }

    #[test]
    fn test_teleport_once_per_turn() {
        let mut s = session_with(
            (1, 1),
            vec![
                RawComponent::new("T", 1, 2).with_text("pair", "a"),
                RawComponent::new("T", 5, 7).with_text("pair", "a"),
            ],
        );
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(5, 7));
        assert_eq!(outcome.events, vec![GameEvent::Teleported { to: Position::new(5, 7) }]);
        assert_eq!(s.world().entities().len(), 2);

        // Stepping off lands on plain floor
        s.resolve_turn(Step::Move(Direction::Left));
        assert_eq!(s.player().position, Position::new(5, 6));
    }

    #[test]
    fn test_unpaired_teleport_is_plain_floor() {
        let mut s = session_with((1, 1), vec![RawComponent::new("T", 1, 2).with_text("pair", "solo")]);
        right(&mut s);
        assert_eq!(s.player().position, Position::new(1, 2));
    }

    #[test]
    fn test_generic_blocks() {
        let mut s = session_with((2, 2), vec![RawComponent::new("B", 2, 3)]);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(2, 2));
        assert_eq!(outcome.events, vec![GameEvent::Blocked]);
    }

    #[test]
    fn test_idle_zombie_never_overlaps() {
        let mut s = session_with(
            (3, 4),
            vec![RawComponent::new("Z", 1, 1), RawComponent::new("Z", 5, 7), RawComponent::new("K", 1, 7)],
        );
        for step in [Direction::Left, Direction::Right, Direction::Up, Direction::Down].iter().cycle().take(20) {
            s.resolve_turn(Step::Move(*step));
            let mut seen = HashSet::new();
            for e in s.world().entities() {
                assert!(seen.insert(e.position), "two entities share {}", e.position);
                if e.is_zombie() {
                    assert_ne!(e.position, s.player().position);
                    assert!(s.world().grid().is_walkable(e.position));
                }
            }
        }
    }

    #[test]
    fn test_ragged_rows_and_edges_block() {
        let structure = ["....", "..", "...."];

        // Past the end of a short row
        let mut s = session_in(&structure, (1, 1), vec![]);
        let outcome = right(&mut s);
        assert_eq!(s.player().position, Position::new(1, 1));
        assert!(!outcome.game_over);
        assert_eq!(s.turn(), 1);

        // Off the top and left edges of the map
        let mut s = session_in(&structure, (0, 0), vec![]);
        s.resolve_turn(Step::Move(Direction::Up));
        assert_eq!(s.player().position, Position::new(0, 0));
        s.resolve_turn(Step::Move(Direction::Left));
        assert_eq!(s.player().position, Position::new(0, 0));
        assert_eq!(s.turn(), 2);

        // Down from the long top row onto the short one's missing cell
        let mut s = session_in(&structure, (0, 3), vec![]);
        s.resolve_turn(Step::Move(Direction::Down));
        assert_eq!(s.player().position, Position::new(0, 3));
    }

    #[test]
    fn test_camera_follows_player() {
        let mut s = session_with((1, 1), vec![]);
        for _ in 0..6 {
            right(&mut s);
        }
        assert_eq!(
            s.camera(),
            Camera::recompute(s.player().position, s.world().grid(), &s.viewport)
        );
    }
}
