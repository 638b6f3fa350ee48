//! Level data
//!
//! Raw level content and the sources that supply it.

pub mod level;
pub mod loader;

pub use level::{AttrValue, LevelData, LevelError, RawComponent};
pub use loader::{FileLevelSource, LevelSource, MemoryLevelSource};
