//! Per-tick observation for presentation and telemetry
//!
//! Output only: the simulation never reads anything back from an observer.

use serde::{Deserialize, Serialize};

/// A live bird as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Cohort index of the bird's policy
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub tilt: f32,
    /// Wing animation frame (0..3)
    pub frame: u8,
}

/// A live pipe pair as a renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub x: f32,
    pub height: f32,
    pub top: f32,
    pub bottom: f32,
    pub passed: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub generation: u32,
    pub tick: u64,
    pub score: u32,
    pub alive: usize,
    /// Index into `obstacles` of the pipe birds are sensing
    pub targeted: usize,
    pub agents: Vec<AgentSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
    /// Ground tile x positions, leftmost first
    pub ground: [f32; 2],
}
