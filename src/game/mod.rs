//! Game module - turn engine and mode state machine

pub mod camera;
pub mod events;
pub mod progression;
mod session;
mod state;
mod time;
mod turn;

pub use camera::Camera;
pub use events::GameEvent;
pub use progression::{LevelProgression, LevelTransition};
pub use session::{PlayStatus, Session};
pub use state::{Game, GameError, GameMode, MenuItem};
pub use time::SplashTimer;
pub use turn::{Step, TurnOutcome};
