//! Viewport camera
//!
//! Pixel offset that keeps the player centred without showing anything
//! past the map edge.

use crate::config::ViewportConfig;
use crate::world::{Grid, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
}

impl Camera {
    /// Centre on the player, then clamp each axis to the map extent
    pub fn recompute(player: Position, grid: &Grid, viewport: &ViewportConfig) -> Self {
        let td = viewport.tile_size;
        Self {
            x: clamp_axis(player.col * td + td / 2, viewport.columns * td, grid.width() * td),
            y: clamp_axis(player.row * td + td / 2, viewport.rows * td, grid.height() * td),
        }
    }
}

fn clamp_axis(centre: i32, view_extent: i32, map_extent: i32) -> i32 {
    let max = (map_extent - view_extent).max(0);
    (centre - view_extent / 2).clamp(0, max)
}
