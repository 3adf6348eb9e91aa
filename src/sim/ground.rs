//! Scrolling two-tile ground strip

use serde::{Deserialize, Serialize};

/// Two ground tiles that leapfrog each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub y: f32,
    pub width: f32,
    pub x1: f32,
    pub x2: f32,
}

impl Ground {
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            width,
            x1: 0.0,
            x2: width,
        }
    }

    /// Scroll by `velocity` for `ticks` ticks, wrapping tiles that leave the screen
    pub fn advance(&mut self, ticks: u32, velocity: f32) {
        for _ in 0..ticks {
            self.x1 -= velocity;
            self.x2 -= velocity;

            if self.x1 + self.width < 0.0 {
                self.x1 = self.x2 + self.width;
            }
            if self.x2 + self.width < 0.0 {
                self.x2 = self.x1 + self.width;
            }
        }
    }

    /// Tile positions, leftmost first
    pub fn tiles(&self) -> [f32; 2] {
        if self.x1 <= self.x2 {
            [self.x1, self.x2]
        } else {
            [self.x2, self.x1]
        }
    }
}
