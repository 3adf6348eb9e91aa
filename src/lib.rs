//! Flappy Evo - multi-agent Flappy Bird simulation for neuroevolution
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pipes, collisions, episode tick)
//! - `episode`: Episode entry point and host seam (frame pacing, quit, observation)
//! - `settings`: Data-driven configuration with validation
//! - `history`: Per-generation records across a run

pub mod episode;
pub mod history;
pub mod settings;
pub mod sim;

pub use episode::{Episode, EpisodeHost, EpisodeReport, Headless, RealTime, run_episode};
pub use history::{GenerationHistory, GenerationRecord};
pub use settings::{ConfigError, SimConfig};

/// Default tuning constants (overridable through `SimConfig`)
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;
    /// Ground line; a bird whose bottom edge reaches it is out
    pub const FLOOR_Y: f32 = 730.0;
    /// Birds flying above this are out
    pub const CEILING_Y: f32 = -50.0;
    /// Target ticks per second for real-time pacing
    pub const TICK_RATE: u32 = 30;

    /// Bird spawn position
    pub const BIRD_START_X: f32 = 230.0;
    pub const BIRD_START_Y: f32 = 350.0;
    /// Bird sprite extent (2x scaled 34x24)
    pub const BIRD_WIDTH: u32 = 68;
    pub const BIRD_HEIGHT: u32 = 48;
    pub const GRAVITY: f32 = 3.0;
    pub const JUMP_VELOCITY: f32 = -10.5;
    /// Per-tick displacement is clamped to ±this
    pub const TERMINAL_VELOCITY: f32 = 16.0;
    /// Extra lift applied while ascending
    pub const ASCENT_BIAS: f32 = 2.0;
    /// Tilt limits (degrees)
    pub const MAX_TILT: f32 = 25.0;
    pub const MIN_TILT: f32 = -90.0;
    pub const TILT_UP_STEP: f32 = 2.0;
    pub const TILT_DOWN_STEP: f32 = 20.0;
    /// Bird keeps tilting up until it drops this far below its jump height
    pub const TILT_MARGIN: f32 = 50.0;
    /// At or below this tilt the wings stop flapping
    pub const NOSE_DIVE_TILT: f32 = -80.0;
    /// Ticks per animation frame
    pub const ANIMATION_TIME: u32 = 5;

    /// Pipe defaults
    pub const PIPE_GAP: f32 = 200.0;
    /// Pipe sprite extent (2x scaled 52x320)
    pub const PIPE_WIDTH: u32 = 104;
    pub const PIPE_HEIGHT: u32 = 640;
    /// Height of the wider lip at the pipe mouth
    pub const PIPE_LIP_HEIGHT: u32 = 52;
    /// Horizontal inset of the pipe body relative to the lip
    pub const PIPE_BODY_INSET: u32 = 4;
    /// Gap-center range, min inclusive / max exclusive
    pub const PIPE_GAP_MIN: i32 = 50;
    pub const PIPE_GAP_MAX: i32 = 450;
    /// Horizontal scroll speed shared by pipes and ground
    pub const SCROLL_VELOCITY: f32 = 5.0;
    /// Where the first pipe of an episode spawns
    pub const FIRST_PIPE_X: f32 = 700.0;

    /// Ground tile width (2x scaled 336)
    pub const GROUND_WIDTH: f32 = 672.0;

    /// Fitness shaping
    pub const SURVIVAL_REWARD: f64 = 0.1;
    pub const PASS_BONUS: f64 = 5.0;
    pub const COLLISION_PENALTY: f64 = 1.0;
    /// Policy output above this triggers a jump
    pub const DECISION_THRESHOLD: f32 = 0.5;

    /// Episode ends once this many pipes are passed
    pub const SCORE_CAP: u32 = 200;
}

/// Mix a run seed with a generation index into a per-generation seed
#[inline]
pub fn generation_seed(seed: u64, generation: u32) -> u64 {
    (generation as u64).wrapping_mul(2654435761).wrapping_add(seed)
}
