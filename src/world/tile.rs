//! Tile definitions
//!
//! The fixed set of cell types a level structure can contain.

use serde::{Deserialize, Serialize};

/// Types of tiles in a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Floor,
    Wall,
    Rubble,
    Water,
    Void,
}

impl TileType {
    /// Classify a structure symbol. Unknown symbols degrade to walls.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '.' => TileType::Floor,
            '#' => TileType::Wall,
            '%' => TileType::Rubble,
            '~' => TileType::Water,
            ' ' => TileType::Void,
            other => {
                log::warn!("Tile type is not defined: {:?}, treating as wall", other);
                TileType::Wall
            }
        }
    }

    /// Only plain floor can be walked on
    pub fn is_walkable(&self) -> bool {
        matches!(self, TileType::Floor)
    }

    pub fn glyph(&self) -> char {
        match self {
            TileType::Floor => '.',
            TileType::Wall => '#',
            TileType::Rubble => '%',
            TileType::Water => '~',
            TileType::Void => ' ',
        }
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            TileType::Floor => (80, 80, 80),
            TileType::Wall => (130, 110, 90),
            TileType::Rubble => (100, 90, 80),
            TileType::Water => (60, 90, 160),
            TileType::Void => (0, 0, 0),
        }
    }
}
