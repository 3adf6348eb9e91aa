//! Episode entry point
//!
//! Runs one generation from INIT to a terminal phase. The host supplies the
//! three outside-world hooks: frame pacing (the only place the loop may
//! block), the quit poll, and a fire-and-forget observation sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::settings::{ConfigError, SimConfig};
use crate::sim::{EpisodePhase, EpisodeState, Observation, Policy, TickInput, tick};

/// Outside-world hooks around the episode loop
pub trait EpisodeHost {
    /// Block until the next frame is due
    fn wait_frame(&mut self) {}

    /// Checked once per tick, before anything else happens
    fn poll_quit(&mut self) -> bool {
        false
    }

    /// Per-tick observation for presentation or telemetry
    fn observe(&mut self, _observation: &Observation) {}
}

/// Unpaced host that never quits and discards observations
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl EpisodeHost for Headless {}

/// Host paced to a fixed tick rate, stoppable through a shared flag
#[derive(Debug)]
pub struct RealTime {
    period: Duration,
    last_frame: Option<Instant>,
    quit: Arc<AtomicBool>,
}

impl RealTime {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            period: Duration::from_secs_f64(1.0 / tick_rate.max(1) as f64),
            last_frame: None,
            quit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the episode at the start of the next tick
    pub fn quit_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.quit)
    }
}

impl EpisodeHost for RealTime {
    fn wait_frame(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.period {
                std::thread::sleep(self.period - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }

    fn poll_quit(&mut self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }

    fn observe(&mut self, observation: &Observation) {
        log::trace!(
            "gen {} tick {}: score {}, alive {}",
            observation.generation,
            observation.tick,
            observation.score,
            observation.alive
        );
    }
}

/// What an episode hands back to the optimizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub generation: u32,
    pub termination: EpisodePhase,
    pub score: u32,
    pub ticks: u64,
    /// Final fitness per policy, in cohort order
    pub fitness: Vec<f64>,
}

impl EpisodeReport {
    /// The optimizer run should stop entirely
    pub fn aborted(&self) -> bool {
        self.termination == EpisodePhase::ExternalQuit
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.fitness.iter().copied().reduce(f64::max)
    }

    /// Cohort index of the fittest policy
    pub fn best_index(&self) -> Option<usize> {
        self.fitness
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.fitness.is_empty() {
            0.0
        } else {
            self.fitness.iter().sum::<f64>() / self.fitness.len() as f64
        }
    }
}

/// One generation of birds on one obstacle course
#[derive(Debug, Clone)]
pub struct Episode {
    state: EpisodeState,
}

impl Episode {
    pub fn new(config: SimConfig, cohort_size: usize, generation: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            state: EpisodeState::new(config, cohort_size, generation)?,
        })
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Direct access, e.g. to lay out a specific course before running
    pub fn state_mut(&mut self) -> &mut EpisodeState {
        &mut self.state
    }

    /// Tick until a terminal phase. `policies[i]` drives bird `i`.
    pub fn run<P, H>(&mut self, policies: &mut [P], host: &mut H) -> EpisodeReport
    where
        P: Policy,
        H: EpisodeHost + ?Sized,
    {
        if policies.len() != self.state.agents.len() {
            log::warn!(
                "Cohort has {} policies for {} birds; unpaired birds never flap",
                policies.len(),
                self.state.agents.len()
            );
        }
        log::info!(
            "Generation {} starting with {} birds",
            self.state.generation,
            self.state.agents.len()
        );

        while !self.state.phase.is_terminal() {
            host.wait_frame();
            let input = TickInput {
                quit: host.poll_quit(),
            };
            let report = tick(&mut self.state, policies, &input);
            if let Some(observation) = &report.observation {
                host.observe(observation);
            }
        }

        let report = self.report();
        log::info!(
            "Generation {} ended ({:?}) after {} ticks: score {}, best fitness {:.1}",
            report.generation,
            report.termination,
            report.ticks,
            report.score,
            report.best_fitness().unwrap_or(0.0)
        );
        report
    }

    /// Report for the current state
    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            generation: self.state.generation,
            termination: self.state.phase,
            score: self.state.score,
            ticks: self.state.time_ticks,
            fitness: self.state.fitness(),
        }
    }
}

/// Run one generation with a fresh episode for `policies`
pub fn run_episode<P, H>(
    config: SimConfig,
    policies: &mut [P],
    generation: u32,
    host: &mut H,
) -> Result<EpisodeReport, ConfigError>
where
    P: Policy,
    H: EpisodeHost + ?Sized,
{
    let mut episode = Episode::new(config, policies.len(), generation)?;
    Ok(episode.run(policies, host))
}
