//! Decision policies
//!
//! The simulation treats a policy as a black box from three sensor readings to
//! one decision value. Anything can stand behind it: an evolved network, a
//! script, a closure.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of sensor inputs fed to a policy each tick
pub const SENSOR_COUNT: usize = 3;

/// What a bird senses about the targeted pipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorInputs {
    /// Bird y
    pub y: f32,
    /// |bird y - gap center|
    pub gap_distance: f32,
    /// |bird y - bottom pipe mouth|
    pub bottom_distance: f32,
}

impl SensorInputs {
    pub fn new(bird_y: f32, gap_center: f32, bottom: f32) -> Self {
        Self {
            y: bird_y,
            gap_distance: (bird_y - gap_center).abs(),
            bottom_distance: (bird_y - bottom).abs(),
        }
    }

    #[inline]
    pub fn as_array(&self) -> [f32; SENSOR_COUNT] {
        [self.y, self.gap_distance, self.bottom_distance]
    }
}

/// A decision source paired with one bird
pub trait Policy {
    /// Decision value for this tick; above the jump threshold means flap
    fn decide(&mut self, inputs: &SensorInputs) -> f32;
}

impl<F> Policy for F
where
    F: FnMut(&SensorInputs) -> f32,
{
    fn decide(&mut self, inputs: &SensorInputs) -> f32 {
        self(inputs)
    }
}

/// Always answers the same value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantPolicy(pub f32);

impl Policy for ConstantPolicy {
    fn decide(&mut self, _inputs: &SensorInputs) -> f32 {
        self.0
    }
}

/// Plays back a fixed sequence of outputs, then repeats a fallback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPolicy {
    outputs: Vec<f32>,
    fallback: f32,
    cursor: usize,
}

impl ScriptedPolicy {
    pub fn new(outputs: Vec<f32>, fallback: f32) -> Self {
        Self {
            outputs,
            fallback,
            cursor: 0,
        }
    }

    /// Number of decisions made so far
    pub fn calls(&self) -> usize {
        self.cursor
    }
}

impl Policy for ScriptedPolicy {
    fn decide(&mut self, _inputs: &SensorInputs) -> f32 {
        let out = self.outputs.get(self.cursor).copied().unwrap_or(self.fallback);
        self.cursor += 1;
        out
    }
}

/// Single sigmoid neuron over the sensor inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [f32; SENSOR_COUNT],
    pub bias: f32,
}

impl LinearPolicy {
    pub fn new(weights: [f32; SENSOR_COUNT], bias: f32) -> Self {
        Self { weights, bias }
    }

    /// Random weights in [-scale, scale)
    pub fn random<R: Rng + ?Sized>(rng: &mut R, scale: f32) -> Self {
        let mut weights = [0.0; SENSOR_COUNT];
        for w in &mut weights {
            *w = rng.random_range(-scale..scale);
        }
        Self {
            weights,
            bias: rng.random_range(-scale..scale),
        }
    }
}

impl Policy for LinearPolicy {
    fn decide(&mut self, inputs: &SensorInputs) -> f32 {
        let z = self
            .weights
            .iter()
            .zip(inputs.as_array())
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        1.0 / (1.0 + (-z).exp())
    }
}
