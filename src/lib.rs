//! Cryptward - a turn-based crypt crawler
//!
//! Walk the grid one cell per turn, fight zombies, gather keys and
//! potions, and unlock the last door of every level to escape.

pub mod config;
pub mod input;
pub mod data;
pub mod world;
pub mod entities;
pub mod combat;
pub mod game;
pub mod ui;

// Re-export commonly used types
pub use config::GameConfig;
pub use game::{Game, GameError, GameMode, Session};
pub use input::{Direction, InputState};
pub use world::WorldModel;
