//! Bird kinematics
//!
//! Vertical-only motion: the world scrolls past a bird whose x never changes.
//! Displacement per tick follows discrete kinematic accumulation since the
//! last jump, clamped to a terminal band.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::BirdConfig;

/// One bird's physics state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top-left of the sprite; x is fixed for the episode
    pub pos: Vec2,
    /// Vertical velocity set by the last jump
    pub vel_y: f32,
    /// Ticks since the last jump
    pub tick_count: u32,
    /// Tilt in degrees (positive = nose up)
    pub tilt: f32,
    /// y at the last jump, used to decide tilt direction
    pub height: f32,
    /// Wing animation counter
    pub anim_count: u32,
}

impl Bird {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel_y: 0.0,
            tick_count: 0,
            tilt: 0.0,
            height: y,
            anim_count: 0,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    /// Flap: the only externally triggered state change
    pub fn jump(&mut self, cfg: &BirdConfig) {
        self.vel_y = cfg.jump_velocity;
        self.tick_count = 0;
        self.height = self.pos.y;
    }

    /// Displacement for the current tick count, clamped to ±terminal velocity
    pub fn displacement(&self, cfg: &BirdConfig) -> f32 {
        let t = self.tick_count as f32;
        let raw = self.vel_y * t + 0.5 * cfg.gravity * t * t;
        let mut d = raw.clamp(-cfg.terminal_velocity, cfg.terminal_velocity);
        if d < 0.0 {
            // Snappier ascent, still bounded by the terminal band
            d = (d - cfg.ascent_bias).max(-cfg.terminal_velocity);
        }
        d
    }

    /// Integrate one tick and update tilt. Returns the applied displacement.
    pub fn advance(&mut self, cfg: &BirdConfig) -> f32 {
        self.tick_count += 1;
        let d = self.displacement(cfg);
        self.pos.y += d;

        if d < 0.0 || self.pos.y < self.height + cfg.tilt_margin {
            self.tilt = (self.tilt + cfg.tilt_up_step).min(cfg.max_tilt);
        } else {
            self.tilt = (self.tilt - cfg.tilt_down_step).max(cfg.min_tilt);
        }
        d
    }

    /// Step the wing animation and return the frame to show (0..3)
    pub fn advance_animation(&mut self, cfg: &BirdConfig) -> u8 {
        let period = cfg.animation_time * 4;
        self.anim_count = (self.anim_count + 1) % period;
        self.frame(cfg)
    }

    /// Current animation frame; a nose-diving bird holds its wings level
    pub fn frame(&self, cfg: &BirdConfig) -> u8 {
        if self.tilt <= cfg.nose_dive_tilt {
            1
        } else {
            ((self.anim_count / cfg.animation_time) % 3) as u8
        }
    }

    /// Bottom edge of the sprite
    #[inline]
    pub fn bottom(&self, cfg: &BirdConfig) -> f32 {
        self.pos.y + cfg.height as f32
    }
}
