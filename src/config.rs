//! Game configuration
//!
//! Tuning values and the level list, loaded from RON with a fallback to
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Level ids in play order
    pub levels: Vec<String>,
    /// Directory level files are read from
    pub level_dir: PathBuf,
    pub rules: Rules,
    pub viewport: ViewportConfig,
    /// How long the splash screen shows before the menu appears
    pub splash_secs: f32,
    /// Fixed seed for zombie wandering, random if unset
    pub seed: Option<u64>,
}

/// Interaction tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub trap_damage: i32,
    pub healer_amount: i32,
    pub thief_damage: i32,
    /// Turns a health potion keeps ticking
    pub potion_duration: u32,
    /// Turns a strength or force potion lasts
    pub buff_duration: u32,
    /// Zombies within this many cells chase the player
    pub chase_radius: i32,
    pub player: PlayerStart,
}

/// Stats a new player starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStart {
    pub health: i32,
    pub strength: i32,
    pub force: i32,
}

/// Viewport size, used by the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Tile edge in pixels
    pub tile_size: i32,
    /// Visible columns
    pub columns: i32,
    /// Visible rows
    pub rows: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels: vec!["level1".to_string(), "level2".to_string()],
            level_dir: PathBuf::from("assets/levels"),
            rules: Rules::default(),
            viewport: ViewportConfig::default(),
            splash_secs: 3.0,
            seed: None,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            trap_damage: 2,
            healer_amount: 3,
            thief_damage: 1,
            potion_duration: 3,
            buff_duration: 5,
            chase_radius: 5,
            player: PlayerStart::default(),
        }
    }
}

impl Default for PlayerStart {
    fn default() -> Self {
        Self {
            health: 10,
            strength: 1,
            force: 2,
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            columns: 16,
            rows: 12,
        }
    }
}

impl GameConfig {
    /// Load from `assets/config.ron` or the user config dir, falling back
    /// to defaults when neither exists or parses.
    pub fn load() -> Self {
        for path in Self::search_paths() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path.display(), e),
            }
        }
        log::info!("No config file found, using defaults");
        Self::default()
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("no levels configured".to_string()));
        }
        if self.rules.potion_duration == 0 || self.rules.buff_duration == 0 {
            return Err(ConfigError::Invalid("effect durations must be at least one turn".to_string()));
        }
        let vp = &self.viewport;
        if vp.tile_size <= 0 || vp.columns <= 0 || vp.rows <= 0 {
            return Err(ConfigError::Invalid(format!(
                "viewport dimensions must be positive, got {:?}",
                vp
            )));
        }
        Ok(())
    }

    pub fn splash_duration(&self) -> Duration {
        Duration::from_secs_f32(self.splash_secs.max(0.0))
    }

    fn search_paths() -> Vec<PathBuf> {
        use directories::ProjectDirs;

        let mut paths = vec![PathBuf::from("assets/config.ron")];
        if let Some(proj_dirs) = ProjectDirs::from("com", "cryptward", "Cryptward") {
            paths.push(proj_dirs.config_dir().join("config.ron"));
        }
        paths
    }
}
