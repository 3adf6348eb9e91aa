//! Simulation configuration
//!
//! Fixed at process start and immutable for the lifetime of an episode.
//! Loaded from JSON; every field falls back to the defaults in `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be negative (got {value})")]
    NotNegative { field: &'static str, value: f64 },
    #[error("{field} range is empty: [{min}, {max})")]
    EmptyRange { field: &'static str, min: f64, max: f64 },
    #[error("{field} = {value} lies outside the playfield (0..{limit})")]
    OutsidePlayfield {
        field: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("bird starts out of bounds: top {top} must be below ceiling {ceiling} and bottom {bottom} above floor {floor}")]
    StartOutOfBounds {
        top: f64,
        bottom: f64,
        ceiling: f64,
        floor: f64,
    },
    #[error("ground tiles ({width} wide) must together exceed one scroll step ({step})")]
    GroundTooNarrow { width: f64, step: f64 },
    #[error("tilt limits inverted: min {min} > max {max}")]
    InvertedTilt { min: f64, max: f64 },
    #[error("pipe lip must fit inside the sprite")]
    InvalidPipeSprite,
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Playfield geometry and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Ground line (y grows downward)
    pub floor_y: f32,
    /// Upper out-of-bounds line
    pub ceiling_y: f32,
    /// Ticks per second when paced in real time
    pub tick_rate: u32,
    /// Ground tile width
    pub ground_width: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            floor_y: FLOOR_Y,
            ceiling_y: CEILING_Y,
            tick_rate: TICK_RATE,
            ground_width: GROUND_WIDTH,
        }
    }
}

/// Bird kinematics and animation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BirdConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub width: u32,
    pub height: u32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub terminal_velocity: f32,
    pub ascent_bias: f32,
    pub max_tilt: f32,
    pub min_tilt: f32,
    pub tilt_up_step: f32,
    pub tilt_down_step: f32,
    pub tilt_margin: f32,
    pub nose_dive_tilt: f32,
    pub animation_time: u32,
}

impl Default for BirdConfig {
    fn default() -> Self {
        Self {
            start_x: BIRD_START_X,
            start_y: BIRD_START_Y,
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            terminal_velocity: TERMINAL_VELOCITY,
            ascent_bias: ASCENT_BIAS,
            max_tilt: MAX_TILT,
            min_tilt: MIN_TILT,
            tilt_up_step: TILT_UP_STEP,
            tilt_down_step: TILT_DOWN_STEP,
            tilt_margin: TILT_MARGIN,
            nose_dive_tilt: NOSE_DIVE_TILT,
            animation_time: ANIMATION_TIME,
        }
    }
}

/// Pipe geometry and scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    pub gap: f32,
    pub width: u32,
    pub height: u32,
    pub lip_height: u32,
    pub body_inset: u32,
    /// Gap-center range, `[gap_min, gap_max)`
    pub gap_min: i32,
    pub gap_max: i32,
    pub scroll_velocity: f32,
    pub first_x: f32,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
            height: PIPE_HEIGHT,
            lip_height: PIPE_LIP_HEIGHT,
            body_inset: PIPE_BODY_INSET,
            gap_min: PIPE_GAP_MIN,
            gap_max: PIPE_GAP_MAX,
            scroll_velocity: SCROLL_VELOCITY,
            first_x: FIRST_PIPE_X,
        }
    }
}

/// Fitness deltas reported back to the policy owners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    pub survival_reward: f64,
    pub pass_bonus: f64,
    pub collision_penalty: f64,
    pub decision_threshold: f32,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            survival_reward: SURVIVAL_REWARD,
            pass_bonus: PASS_BONUS,
            collision_penalty: COLLISION_PENALTY,
            decision_threshold: DECISION_THRESHOLD,
        }
    }
}

/// Episode termination and seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub score_cap: u32,
    /// Run seed, mixed with the generation index for each episode
    pub seed: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            score_cap: SCORE_CAP,
            seed: 0,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub playfield: PlayfieldConfig,
    pub bird: BirdConfig,
    pub pipes: PipeConfig,
    pub fitness: FitnessConfig,
    pub episode: EpisodeConfig,
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl SimConfig {
    /// Parse a config from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Pretty JSON, e.g. for writing a starter config
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pf = &self.playfield;
        let bird = &self.bird;
        let pipes = &self.pipes;

        positive("playfield.width", pf.width as f64)?;
        positive("playfield.height", pf.height as f64)?;
        positive("playfield.tick_rate", pf.tick_rate as f64)?;
        positive("playfield.ground_width", pf.ground_width as f64)?;
        if pf.floor_y <= 0.0 || pf.floor_y > pf.height {
            return Err(ConfigError::OutsidePlayfield {
                field: "playfield.floor_y",
                value: pf.floor_y as f64,
                limit: pf.height as f64,
            });
        }

        positive("bird.width", bird.width as f64)?;
        positive("bird.height", bird.height as f64)?;
        positive("bird.gravity", bird.gravity as f64)?;
        positive("bird.terminal_velocity", bird.terminal_velocity as f64)?;
        positive("bird.animation_time", bird.animation_time as f64)?;
        if bird.jump_velocity >= 0.0 {
            return Err(ConfigError::NotNegative {
                field: "bird.jump_velocity",
                value: bird.jump_velocity as f64,
            });
        }
        if bird.min_tilt > bird.max_tilt {
            return Err(ConfigError::InvertedTilt {
                min: bird.min_tilt as f64,
                max: bird.max_tilt as f64,
            });
        }
        let bird_bottom = bird.start_y + bird.height as f32;
        if bird.start_y < pf.ceiling_y || bird_bottom >= pf.floor_y {
            return Err(ConfigError::StartOutOfBounds {
                top: bird.start_y as f64,
                bottom: bird_bottom as f64,
                ceiling: pf.ceiling_y as f64,
                floor: pf.floor_y as f64,
            });
        }

        positive("pipes.gap", pipes.gap as f64)?;
        positive("pipes.width", pipes.width as f64)?;
        positive("pipes.height", pipes.height as f64)?;
        positive("pipes.scroll_velocity", pipes.scroll_velocity as f64)?;
        if pipes.lip_height > pipes.height || pipes.body_inset.saturating_mul(2) >= pipes.width {
            return Err(ConfigError::InvalidPipeSprite);
        }
        if pipes.gap_min >= pipes.gap_max {
            return Err(ConfigError::EmptyRange {
                field: "pipes.gap",
                min: pipes.gap_min as f64,
                max: pipes.gap_max as f64,
            });
        }
        if pipes.first_x < bird.start_x {
            return Err(ConfigError::OutsidePlayfield {
                field: "pipes.first_x",
                value: pipes.first_x as f64,
                limit: bird.start_x as f64,
            });
        }
        if pf.ground_width * 2.0 <= pipes.scroll_velocity {
            return Err(ConfigError::GroundTooNarrow {
                width: pf.ground_width as f64,
                step: pipes.scroll_velocity as f64,
            });
        }

        positive("episode.score_cap", self.episode.score_cap as f64)?;
        Ok(())
    }
}
