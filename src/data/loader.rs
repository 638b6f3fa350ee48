//! Level loader
//!
//! Fetches level content from RON or JSON files, or from memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::level::{LevelData, LevelError};

/// Anything that can hand the engine a level by id
pub trait LevelSource {
    fn load(&self, id: &str) -> Result<LevelData, LevelError>;
}

/// Loads `<root>/<id>.ron`, falling back to `<root>/<id>.json`
#[derive(Debug, Clone)]
pub struct FileLevelSource {
    root: PathBuf,
}

impl FileLevelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, id: &str, path: &Path) -> Result<String, LevelError> {
        fs::read_to_string(path).map_err(|source| LevelError::Io {
            id: id.to_string(),
            source,
        })
    }
}

impl LevelSource for FileLevelSource {
    fn load(&self, id: &str) -> Result<LevelData, LevelError> {
        let ron_path = self.root.join(format!("{}.ron", id));
        let json_path = self.root.join(format!("{}.json", id));

        let mut level: LevelData = if ron_path.exists() {
            let content = self.read(id, &ron_path)?;
            ron::from_str(&content).map_err(|e| LevelError::Parse {
                id: id.to_string(),
                message: e.to_string(),
            })?
        } else if json_path.exists() {
            let content = self.read(id, &json_path)?;
            serde_json::from_str(&content).map_err(|e| LevelError::Parse {
                id: id.to_string(),
                message: e.to_string(),
            })?
        } else {
            return Err(LevelError::NotFound { id: id.to_string() });
        };

        level.id = id.to_string();
        log::info!(
            "Loaded level {} ({} rows, {} components)",
            id,
            level.structure.len(),
            level.components.len()
        );
        Ok(level)
    }
}

/// Levels held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelSource {
    levels: HashMap<String, LevelData>,
}

impl MemoryLevelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, id: &str, mut level: LevelData) -> Self {
        level.id = id.to_string();
        self.levels.insert(id.to_string(), level);
        self
    }
}

impl LevelSource for MemoryLevelSource {
    fn load(&self, id: &str) -> Result<LevelData, LevelError> {
        self.levels
            .get(id)
            .cloned()
            .ok_or_else(|| LevelError::NotFound { id: id.to_string() })
    }
}
