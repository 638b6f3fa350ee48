//! World module
//!
//! Contains the tile grid, coordinates and the per-level world model.

pub mod map;
pub mod tile;
pub mod position;
pub mod level;

pub use map::Grid;
pub use tile::TileType;
pub use position::Position;
pub use level::WorldModel;
