//! Zombie idle behaviour
//!
//! Zombies the player did not engage this turn shamble one cell: toward
//! the player when close enough, otherwise in a random direction.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::input::Direction;
use crate::world::{Grid, Position};

/// What a zombie can see of the world while deciding its step
pub struct Surroundings<'a> {
    pub grid: &'a Grid,
    /// Where the player stands before this turn commits
    pub player: Position,
    /// The cell the player is stepping into
    pub target: Position,
    /// Cells held by other entities
    pub occupied: &'a HashSet<Position>,
}

impl Surroundings<'_> {
    fn is_free(&self, pos: Position) -> bool {
        self.grid.is_walkable(pos)
            && pos != self.player
            && pos != self.target
            && !self.occupied.contains(&pos)
    }
}

/// Pick the next cell for an idle zombie, `None` to stay put
pub fn idle_step(
    from: Position,
    around: &Surroundings,
    chase_radius: i32,
    rng: &mut impl Rng,
) -> Option<Position> {
    if from.distance(&around.player) <= chase_radius {
        chase_step(from, around)
    } else {
        patrol_step(from, around, rng)
    }
}

/// Calculate the best cardinal move toward the player
fn chase_step(from: Position, around: &Surroundings) -> Option<Position> {
    let dr = (around.player.row - from.row).signum();
    let dc = (around.player.col - from.col).signum();
    let row_first = (around.player.row - from.row).abs() >= (around.player.col - from.col).abs();

    // Close the larger gap first, then try the other axis
    let mut candidates = Vec::with_capacity(2);
    if row_first {
        if dr != 0 {
            candidates.push(from.offset(dr, 0));
        }
        if dc != 0 {
            candidates.push(from.offset(0, dc));
        }
    } else {
        if dc != 0 {
            candidates.push(from.offset(0, dc));
        }
        if dr != 0 {
            candidates.push(from.offset(dr, 0));
        }
    }

    candidates.into_iter().find(|pos| around.is_free(*pos))
}

fn patrol_step(from: Position, around: &Surroundings, rng: &mut impl Rng) -> Option<Position> {
    // One chance in five to stand still
    if rng.gen_ratio(1, 5) {
        return None;
    }
    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    directions
        .iter()
        .map(|d| {
            let (dr, dc) = d.delta();
            from.offset(dr, dc)
        })
        .find(|pos| around.is_free(*pos))
}
