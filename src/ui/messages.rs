//! Message log shown under the map

use std::collections::VecDeque;

/// Entries kept before the oldest are dropped
pub const MESSAGE_CAPACITY: usize = 50;

/// Bounded log of recent notifications, oldest first
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: VecDeque<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>) {
        if self.entries.len() == MESSAGE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(text.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .skip(self.entries.len().saturating_sub(n))
            .map(String::as_str)
    }
}
