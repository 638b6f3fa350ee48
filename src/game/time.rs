//! Splash timer
//!
//! Counts frame time while the title screen is up.

use std::time::Duration;

/// Accumulates frame deltas until a fixed duration has passed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplashTimer {
    /// Time shown so far, in seconds
    elapsed: f32,
    duration: f32,
}

impl SplashTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.as_secs_f32(),
        }
    }

    /// Add a frame delta and return true once the duration is reached
    pub fn update(&mut self, delta: Duration) -> bool {
        self.elapsed += delta.as_secs_f32();
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}
