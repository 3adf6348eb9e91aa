//! Episode state and core simulation types
//!
//! One `EpisodeState` covers one generation. Nothing in it outlives the
//! episode or is shared with another one.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::collision::CollisionShapes;
use super::ground::Ground;
use super::pipe::Pipe;
use super::snapshot::{AgentSnapshot, ObstacleSnapshot, Observation};
use crate::generation_seed;
use crate::settings::{ConfigError, SimConfig};

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    /// Ticking
    Running,
    /// Every bird is gone
    AllDead,
    /// Score reached the configured cap
    ScoreCap,
    /// Aborted by the host
    ExternalQuit,
}

impl EpisodePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EpisodePhase::Running)
    }
}

/// Why a bird left the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Removal {
    Collision,
    OutOfBounds,
}

/// Arena slot for one participant.
///
/// Slots are never removed or reordered during an episode; a dead bird keeps
/// its slot with `alive == false`, so indices stay valid for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub bird: Bird,
    /// Index of the paired policy in the cohort
    pub policy: usize,
    /// Accumulated fitness for the paired policy
    pub fitness: f64,
    pub alive: bool,
    /// Tick on which the bird was removed
    pub died_at: Option<u64>,
    pub removal: Option<Removal>,
}

impl Agent {
    pub fn new(policy: usize, bird: Bird) -> Self {
        Self {
            bird,
            policy,
            fitness: 0.0,
            alive: true,
            died_at: None,
            removal: None,
        }
    }

    /// Tombstone the slot
    pub fn kill(&mut self, tick: u64, cause: Removal) {
        self.alive = false;
        self.died_at = Some(tick);
        self.removal = Some(cause);
    }
}

/// Complete episode state (deterministic for a given config and generation)
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub config: SimConfig,
    /// Generation index, owned by the caller
    pub generation: u32,
    /// One slot per cohort member, in cohort order
    pub agents: Vec<Agent>,
    /// Live pipes, oldest first
    pub pipes: Vec<Pipe>,
    pub ground: Ground,
    /// Pipes passed this episode
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: EpisodePhase,
    /// Index of the pipe birds sense this tick
    pub targeted: usize,
    pub shapes: CollisionShapes,
    rng: Pcg32,
}

impl EpisodeState {
    /// INIT: validate the config and lay out a fresh episode
    pub fn new(config: SimConfig, cohort_size: usize, generation: u32) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(generation_seed(config.episode.seed, generation));
        let agents = (0..cohort_size)
            .map(|i| Agent::new(i, Bird::new(config.bird.start_x, config.bird.start_y)))
            .collect();
        let pipes = vec![Pipe::new(config.pipes.first_x, &mut rng, &config.pipes)];
        let ground = Ground::new(config.playfield.floor_y, config.playfield.ground_width);
        let shapes = CollisionShapes::new(&config);
        let phase = if cohort_size == 0 {
            EpisodePhase::AllDead
        } else {
            EpisodePhase::Running
        };

        Ok(Self {
            config,
            generation,
            agents,
            pipes,
            ground,
            score: 0,
            time_ticks: 0,
            phase,
            targeted: 0,
            shapes,
            rng,
        })
    }

    /// Spawn a pipe with a random gap at `x`
    pub fn spawn_pipe(&mut self, x: f32) {
        let pipe = Pipe::new(x, &mut self.rng, &self.config.pipes);
        self.pipes.push(pipe);
    }

    /// Live agents in stable cohort order
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| a.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.live_agents().count()
    }

    /// First live agent; all birds share x, so this is the one pipes are judged against
    pub fn leading_agent(&self) -> Option<&Agent> {
        self.live_agents().next()
    }

    /// Fitness per policy, in cohort order
    pub fn fitness(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.agents.len()];
        for agent in &self.agents {
            out[agent.policy] = agent.fitness;
        }
        out
    }

    /// Render/telemetry snapshot of the current state
    pub fn observation(&self) -> Observation {
        let bird_cfg = &self.config.bird;
        Observation {
            generation: self.generation,
            tick: self.time_ticks,
            score: self.score,
            alive: self.alive_count(),
            targeted: self.targeted,
            agents: self
                .live_agents()
                .map(|a| AgentSnapshot {
                    index: a.policy,
                    x: a.bird.x(),
                    y: a.bird.y(),
                    tilt: a.bird.tilt,
                    frame: a.bird.frame(bird_cfg),
                })
                .collect(),
            obstacles: self
                .pipes
                .iter()
                .map(|p| ObstacleSnapshot {
                    x: p.x,
                    height: p.height,
                    top: p.top,
                    bottom: p.bottom,
                    passed: p.passed,
                })
                .collect(),
            ground: self.ground.tiles(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_layout() {
        let state = EpisodeState::new(SimConfig::default(), 4, 0).unwrap();
        assert_eq!(state.phase, EpisodePhase::Running);
        assert_eq!(state.agents.len(), 4);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.pipes[0].x, 700.0);
        assert_eq!(state.score, 0);
        for (i, agent) in state.agents.iter().enumerate() {
            assert_eq!(agent.policy, i);
            assert_eq!(agent.bird.pos.x, 230.0);
            assert_eq!(agent.bird.pos.y, 350.0);
            assert_eq!(agent.bird.vel_y, 0.0);
        }
        assert_eq!(state.ground.x1, 0.0);
        assert_eq!(state.ground.x2, 672.0);
    }

    #[test]
    fn test_same_seed_same_course() {
        let a = EpisodeState::new(SimConfig::default(), 1, 3).unwrap();
        let b = EpisodeState::new(SimConfig::default(), 1, 3).unwrap();
        assert_eq!(a.pipes, b.pipes);
    }

    #[test]
    fn test_invalid_config_rejected_before_running() {
        let mut config = SimConfig::default();
        config.pipes.gap = -5.0;
        assert!(EpisodeState::new(config, 1, 0).is_err());
    }

    #[test]
    fn test_empty_cohort_is_already_over() {
        let state = EpisodeState::new(SimConfig::default(), 0, 0).unwrap();
        assert_eq!(state.phase, EpisodePhase::AllDead);
    }

    #[test]
    fn test_leading_agent_skips_dead_slots() {
        let mut state = EpisodeState::new(SimConfig::default(), 3, 0).unwrap();
        state.agents[0].kill(1, Removal::Collision);
        assert_eq!(state.leading_agent().map(|a| a.policy), Some(1));
        assert_eq!(state.alive_count(), 2);
        assert_eq!(state.observation().agents.len(), 2);
    }
}
