//! World model
//!
//! The grid and the live entity set of the current level. Built once per
//! level load; afterward only the turn resolver changes it.

use crate::data::{LevelData, LevelError};
use crate::entities::{create_entity, is_player_record, Entity, EntityId};
use super::map::Grid;
use super::position::Position;

/// The current level
#[derive(Debug, Clone, PartialEq)]
pub struct WorldModel {
    pub(crate) level_id: String,
    pub(crate) grid: Grid,
    pub(crate) entities: Vec<Entity>,
    /// Last door encountered during load
    pub(crate) exit_door: Option<EntityId>,
    /// Where the player record placed the player
    pub(crate) spawn: Position,
}

impl WorldModel {
    /// Build the world for a level. Fails when no player record exists.
    pub fn load_level(data: &LevelData) -> Result<Self, LevelError> {
        let grid = Grid::from_rows(&data.structure);
        let mut entities = Vec::with_capacity(data.components.len());
        let mut spawn = None;
        let mut exit_door = None;

        for raw in &data.components {
            if is_player_record(raw) {
                if spawn.is_some() {
                    log::warn!("Level {} has more than one player record, ignoring {}", data.id, raw.position());
                } else {
                    spawn = Some(raw.position());
                }
                continue;
            }

            let entity = create_entity(EntityId(entities.len() as u32), raw);
            if entity.is_door() {
                exit_door = Some(entity.id);
            }
            entities.push(entity);
        }

        let spawn = spawn.ok_or_else(|| LevelError::MissingPlayer { id: data.id.clone() })?;

        if exit_door.is_none() {
            log::warn!("Level {} has no door, it cannot be completed", data.id);
        }
        log::info!(
            "Built level {}: {}x{} grid, {} entities",
            data.id,
            grid.height(),
            grid.width(),
            entities.len()
        );

        Ok(Self {
            level_id: data.id.clone(),
            grid,
            entities,
            exit_door,
            spawn,
        })
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn exit_door(&self) -> Option<EntityId> {
        self.exit_door
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }
}
