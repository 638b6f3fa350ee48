//! Play session
//!
//! Everything a single run owns: the current level, the player, their
//! status effects and the camera. Created on "Start Game" and dropped when
//! the player returns to the menu.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::combat::StatusLedger;
use crate::config::{GameConfig, Rules, ViewportConfig};
use crate::entities::Player;
use crate::world::WorldModel;
use super::camera::Camera;
use super::progression::LevelProgression;

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStatus {
    Active,
    /// Health reached the floor
    Dead,
    /// The exit door of the last level was opened
    Won,
}

impl PlayStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlayStatus::Active)
    }
}

pub struct Session {
    pub(crate) world: WorldModel,
    pub(crate) player: Player,
    pub(crate) effects: StatusLedger,
    pub(crate) camera: Camera,
    pub(crate) progression: LevelProgression,
    pub(crate) rules: Rules,
    pub(crate) viewport: ViewportConfig,
    pub(crate) rng: StdRng,
    pub(crate) status: PlayStatus,
    /// Turns resolved so far
    pub(crate) turn: u64,
}

impl Session {
    /// Start a run on the first level with a fresh player
    pub fn start(world: WorldModel, config: &GameConfig) -> Self {
        let player = Player::new(world.spawn(), &config.rules.player);
        let camera = Camera::recompute(player.position, world.grid(), &config.viewport);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            world,
            player,
            effects: StatusLedger::new(),
            camera,
            progression: LevelProgression::new(config.levels.clone()),
            rules: config.rules.clone(),
            viewport: config.viewport,
            rng,
            status: PlayStatus::Active,
            turn: 0,
        }
    }

    /// Swap in a newly loaded level. The player keeps stats and inventory;
    /// status effects end with the old level.
    pub fn enter_level(&mut self, index: usize, world: WorldModel) {
        self.effects.dispel(&mut self.player);
        self.player.position = world.spawn();
        self.world = world;
        self.progression.set_current(index);
        self.camera = Camera::recompute(self.player.position, self.world.grid(), &self.viewport);
        log::info!("Entered level {} ({})", index, self.world.level_id());
    }

    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn effects(&self) -> &StatusLedger {
        &self.effects
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn status(&self) -> PlayStatus {
        self.status
    }

    pub fn level_index(&self) -> usize {
        self.progression.current_index()
    }

    pub fn progression(&self) -> &LevelProgression {
        &self.progression
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }
}
