//! Game state machine
//!
//! Manages the top-level mode (splash, menu, instructions, play) and the
//! transitions between them.

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, GameConfig};
use crate::data::{LevelError, LevelSource};
use crate::input::InputState;
use crate::world::WorldModel;
use super::events::GameEvent;
use super::progression::LevelTransition;
use super::session::Session;
use super::time::SplashTimer;
use super::turn::Step;

/// Errors surfaced by `Game::tick`
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// All possible game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Splash screen
    Init,
    /// Main menu
    Menu,
    /// Instructions screen
    Pause,
    /// Quit was chosen, nothing happens any more
    Idle,
    /// A session is running
    Play,
}

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    StartGame,
    Instructions,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::StartGame, MenuItem::Instructions, MenuItem::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::StartGame => "Start Game",
            MenuItem::Instructions => "Instructions",
            MenuItem::Quit => "Quit",
        }
    }

    fn index(&self) -> usize {
        match self {
            MenuItem::StartGame => 0,
            MenuItem::Instructions => 1,
            MenuItem::Quit => 2,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The engine: current mode, the running session and where levels come from
pub struct Game {
    mode: GameMode,
    menu_selected: MenuItem,
    splash: SplashTimer,
    /// Present while playing, and while the end screen is up
    session: Option<Session>,
    config: GameConfig,
    levels: Box<dyn LevelSource>,
}

impl Game {
    pub fn new(config: GameConfig, levels: impl LevelSource + 'static) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            mode: GameMode::Init,
            menu_selected: MenuItem::StartGame,
            splash: SplashTimer::new(config.splash_duration()),
            session: None,
            config,
            levels: Box::new(levels),
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn menu_selected(&self) -> MenuItem {
        self.menu_selected
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn set_mode(&mut self, mode: GameMode) {
        log::debug!("Mode transition: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Advance the machine by one frame
    pub fn tick(&mut self, input: &InputState, delta: Duration) -> Result<Vec<GameEvent>, GameError> {
        match self.mode {
            GameMode::Init => {
                let timed_out = self.splash.update(delta);
                if input.any() || timed_out {
                    self.set_mode(GameMode::Menu);
                }
                Ok(Vec::new())
            }
            GameMode::Menu => {
                self.tick_menu(input)?;
                Ok(Vec::new())
            }
            GameMode::Pause => {
                if input.confirm || input.cancel {
                    self.set_mode(GameMode::Menu);
                }
                Ok(Vec::new())
            }
            GameMode::Idle => Ok(Vec::new()),
            GameMode::Play => self.tick_play(input),
        }
    }

    fn tick_menu(&mut self, input: &InputState) -> Result<(), GameError> {
        if input.confirm {
            match self.menu_selected {
                MenuItem::StartGame => self.start_session()?,
                MenuItem::Instructions => self.set_mode(GameMode::Pause),
                MenuItem::Quit => self.set_mode(GameMode::Idle),
            }
        } else if input.up {
            self.menu_selected = self.menu_selected.prev();
        } else if input.down {
            self.menu_selected = self.menu_selected.next();
        }
        Ok(())
    }

    /// Load the first level with a fresh player. On failure the mode stays
    /// at Menu.
    fn start_session(&mut self) -> Result<(), GameError> {
        let world = self.load_world(0).map_err(|e| {
            log::error!("Failed to start game: {}", e);
            e
        })?;
        self.session = Some(Session::start(world, &self.config));
        self.set_mode(GameMode::Play);
        Ok(())
    }

    fn tick_play(&mut self, input: &InputState) -> Result<Vec<GameEvent>, GameError> {
        let Some(session) = self.session.as_mut() else {
            log::warn!("Play mode without a session, back to menu");
            self.set_mode(GameMode::Menu);
            return Ok(Vec::new());
        };

        if session.status().is_terminal() {
            if input.confirm {
                self.session = None;
                self.set_mode(GameMode::Menu);
            }
            return Ok(Vec::new());
        }

        let step = match (input.direction(), input.confirm) {
            (Some(direction), _) => Step::Move(direction),
            (None, true) => Step::Wait,
            (None, false) => return Ok(Vec::new()),
        };

        let outcome = session.resolve_turn(step);
        if let LevelTransition::Advance { index } = outcome.transition {
            match self.load_world(index) {
                Ok(world) => {
                    if let Some(session) = self.session.as_mut() {
                        session.enter_level(index, world);
                    }
                }
                Err(e) => {
                    // The old level has no exit left, so the run cannot go on
                    log::error!("Failed to load level #{}: {}, abandoning run", index, e);
                    self.session = None;
                    self.set_mode(GameMode::Menu);
                    return Err(e);
                }
            }
        }
        Ok(outcome.events)
    }

    fn load_world(&self, index: usize) -> Result<WorldModel, GameError> {
        let id = self
            .config
            .levels
            .get(index)
            .ok_or_else(|| LevelError::NotFound { id: format!("#{}", index) })?;
        let data = self.levels.load(id)?;
        Ok(WorldModel::load_level(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{LevelData, MemoryLevelSource, RawComponent};
    use crate::entities::KEY_ITEM;
    use crate::game::PlayStatus;
    use crate::input::Direction;
    use crate::world::Position;

    fn level(structure: &[&str], components: Vec<RawComponent>) -> LevelData {
        LevelData {
            id: String::new(),
            structure: structure.iter().map(|r| r.to_string()).collect(),
            components,
        }
    }

    fn levels() -> MemoryLevelSource {
        let one = level(
            &["#######", "#.....#", "#######"],
            vec![
                RawComponent::new("H", 1, 1),
                RawComponent::new("W", 1, 2).with_text("name", "Club").with_int("attack", 1),
                RawComponent::new("K", 1, 3),
                RawComponent::new("P", 1, 4).with_text("attribute", "health").with_int("effect", -1),
                RawComponent::new("D", 1, 5),
            ],
        );
        let two = level(
            &["#####", "#...#", "#####"],
            vec![
                RawComponent::new("H", 1, 1),
                RawComponent::new("K", 1, 2),
                RawComponent::new("D", 1, 3),
            ],
        );
        MemoryLevelSource::new().with_level("one", one).with_level("two", two)
    }

    fn config() -> GameConfig {
        GameConfig {
            levels: vec!["one".into(), "two".into()],
            seed: Some(1),
            ..GameConfig::default()
        }
    }

    fn idle() -> InputState {
        InputState::default()
    }

    fn tick(game: &mut Game, input: InputState) -> Vec<GameEvent> {
        game.tick(&input, Duration::from_millis(16)).unwrap()
    }

    fn at_menu() -> Game {
        let mut game = Game::new(config(), levels()).unwrap();
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Menu);
        game
    }

    fn playing() -> Game {
        let mut game = at_menu();
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Play);
        game
    }

    #[test]
    fn test_splash_times_out() {
        let mut game = Game::new(config(), levels()).unwrap();
        assert_eq!(game.mode(), GameMode::Init);
        game.tick(&idle(), Duration::from_secs(1)).unwrap();
        game.tick(&idle(), Duration::from_secs(1)).unwrap();
        assert_eq!(game.mode(), GameMode::Init);
        game.tick(&idle(), Duration::from_secs(1)).unwrap();
        assert_eq!(game.mode(), GameMode::Menu);
    }

    #[test]
    fn test_menu_selection_wraps() {
        let mut game = at_menu();
        assert_eq!(game.menu_selected(), MenuItem::StartGame);
        tick(&mut game, InputState::pressed(Direction::Up));
        assert_eq!(game.menu_selected(), MenuItem::Quit);
        tick(&mut game, InputState::pressed(Direction::Down));
        assert_eq!(game.menu_selected(), MenuItem::StartGame);
    }

    #[test]
    fn test_instructions_and_back() {
        let mut game = at_menu();
        tick(&mut game, InputState::pressed(Direction::Down));
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Pause);
        tick(&mut game, InputState::pressed(Direction::Left));
        assert_eq!(game.mode(), GameMode::Pause);
        tick(&mut game, InputState::cancel());
        assert_eq!(game.mode(), GameMode::Menu);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut game = at_menu();
        tick(&mut game, InputState::pressed(Direction::Up));
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Idle);
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Idle);
    }

    #[test]
    fn test_start_failure_stays_in_menu() {
        let broken = MemoryLevelSource::new().with_level("one", level(&["..."], vec![]));
        let mut game = Game::new(config(), broken).unwrap();
        tick(&mut game, InputState::confirm());

        let err = game.tick(&InputState::confirm(), Duration::ZERO).unwrap_err();
        assert!(matches!(err, GameError::Level(LevelError::MissingPlayer { .. })));
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.session().is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig { levels: Vec::new(), ..GameConfig::default() };
        assert!(matches!(Game::new(config, levels()), Err(GameError::Config(_))));
    }

    #[test]
    fn test_no_input_no_turn() {
        let mut game = playing();
        assert!(tick(&mut game, idle()).is_empty());
        assert_eq!(game.session().unwrap().turn(), 0);
    }

    #[test]
    fn test_progression_keeps_player() {
        let mut game = playing();
        let base = game.session().unwrap().player().strength;

        for _ in 0..3 {
            tick(&mut game, InputState::pressed(Direction::Right));
        }
        let session = game.session().unwrap();
        assert_eq!(session.level_index(), 0);
        assert_eq!(session.effects().effects().len(), 1);
        assert_eq!(session.player().health(), 9);

        let events = tick(&mut game, InputState::pressed(Direction::Right));
        assert!(events.contains(&GameEvent::LevelComplete));

        let session = game.session().unwrap();
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.world().level_id(), "two");
        assert_eq!(session.player().position, Position::new(1, 1));
        assert_eq!(session.player().strength, base + 1);
        assert_eq!(session.player().health(), 9);
        assert_eq!(session.player().inventory.count(KEY_ITEM), 0);
        assert!(session.player().inventory.has("Club"));
        assert!(session.effects().is_empty());
        assert_eq!(game.mode(), GameMode::Play);
    }

    #[test]
    fn test_last_level_wins_then_menu() {
        let mut game = playing();
        for _ in 0..4 {
            tick(&mut game, InputState::pressed(Direction::Right));
        }
        assert_eq!(game.session().unwrap().level_index(), 1);
        tick(&mut game, InputState::pressed(Direction::Right));
        let events = tick(&mut game, InputState::pressed(Direction::Right));
        assert!(events.contains(&GameEvent::Escaped));
        assert_eq!(game.session().unwrap().status(), PlayStatus::Won);

        // Movement is ignored on the end screen
        let turn = game.session().unwrap().turn();
        assert!(tick(&mut game, InputState::pressed(Direction::Left)).is_empty());
        assert_eq!(game.session().unwrap().turn(), turn);

        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.session().is_none());
    }

    #[test]
    fn test_missing_next_level_ends_run() {
        let config = GameConfig {
            levels: vec!["one".into(), "three".into()],
            ..config()
        };
        let mut game = Game::new(config, levels()).unwrap();
        tick(&mut game, InputState::confirm());
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Play);

        for _ in 0..3 {
            tick(&mut game, InputState::pressed(Direction::Right));
        }
        let err = game
            .tick(&InputState::pressed(Direction::Right), Duration::ZERO)
            .unwrap_err();
        assert!(matches!(err, GameError::Level(LevelError::NotFound { .. })));
        assert_eq!(game.mode(), GameMode::Menu);
        assert!(game.session().is_none());

        // A fresh run starts from the first level again
        tick(&mut game, InputState::confirm());
        assert_eq!(game.mode(), GameMode::Play);
        assert_eq!(game.session().unwrap().level_index(), 0);
        assert_eq!(game.session().unwrap().player().position, Position::new(1, 1));
    }
}
