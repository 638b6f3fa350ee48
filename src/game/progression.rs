//! Level progression
//!
//! Tracks where the session is in the level list and decides what
//! reaching the exit door means.

/// What the caller must do after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    /// Keep playing the current level
    Continue,
    /// Load the level at this index
    Advance { index: usize },
    /// The last level was cleared
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelProgression {
    levels: Vec<String>,
    current: usize,
}

impl LevelProgression {
    pub fn new(levels: Vec<String>) -> Self {
        Self { levels, current: 0 }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// The exit door was opened: advance if another level exists
    pub fn on_exit_reached(&self) -> LevelTransition {
        let next = self.current + 1;
        if next < self.levels.len() {
            LevelTransition::Advance { index: next }
        } else {
            LevelTransition::Finished
        }
    }

    /// Record that the level at `index` is now loaded
    pub fn set_current(&mut self, index: usize) {
        self.current = index;
    }
}
