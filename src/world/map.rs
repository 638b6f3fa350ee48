//! Level grid
//!
//! The 2D tile grid of a level. Rows may be ragged: a cell past the end of
//! its row is absent, which blocks movement but is not an error.

use super::position::Position;
use super::tile::TileType;

/// Tile grid for one level
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<TileType>>,
    width: i32,
}

impl Grid {
    /// Build a grid from structure rows, one string per row
    pub fn from_rows<S: AsRef<str>>(structure: &[S]) -> Self {
        let rows: Vec<Vec<TileType>> = structure
            .iter()
            .map(|row| row.as_ref().chars().map(TileType::from_symbol).collect())
            .collect();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        Self { rows, width }
    }

    /// Number of columns in the longest row
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// Tile at a position, `None` when out of range or past a short row
    pub fn tile(&self, pos: Position) -> Option<TileType> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        self.rows
            .get(pos.row as usize)
            .and_then(|row| row.get(pos.col as usize))
            .copied()
    }

    /// Check if a position is walkable floor
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.is_walkable())
    }
}
