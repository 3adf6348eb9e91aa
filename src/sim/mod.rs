//! Deterministic simulation module
//!
//! All episode logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (by cohort index)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod ground;
pub mod mask;
pub mod pipe;
pub mod policy;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use bird::Bird;
pub use collision::{CollisionShapes, bird_hits_pipe};
pub use ground::Ground;
pub use mask::Mask;
pub use pipe::Pipe;
pub use policy::{ConstantPolicy, LinearPolicy, Policy, ScriptedPolicy, SensorInputs};
pub use snapshot::{AgentSnapshot, ObstacleSnapshot, Observation};
pub use state::{Agent, EpisodePhase, EpisodeState, Removal};
pub use tick::{SimEvent, TickInput, TickReport, tick};
