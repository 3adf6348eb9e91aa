//! Fixed timestep episode tick
//!
//! One call is one frame of the environment loop. The order of the steps is
//! part of the fitness contract and must not change:
//! quit poll, target selection, birds (reward, move, decide), ground, pipes
//! (move, collide, retire, pass), pass bonus and spawn, pipe removal,
//! bounds check, observation, termination.

use serde::{Deserialize, Serialize};

use super::collision::bird_hits_pipe;
use super::policy::{Policy, SensorInputs};
use super::snapshot::Observation;
use super::state::{EpisodePhase, EpisodeState, Removal};

/// Host input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// External quit request (e.g. window closed)
    pub quit: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Bird hit a pipe and was removed
    Collided { agent: usize, pipe_x: f32 },
    /// Bird hit the floor or flew off the top and was removed
    OutOfBounds { agent: usize, y: f32 },
    /// Leading bird passed a pipe
    ObstaclePassed { score: u32 },
    /// New pipe appended at the right edge
    ObstacleSpawned { x: f32, height: f32 },
    /// Pipe scrolled off the left edge
    ObstacleRetired { x: f32 },
}

/// Outcome of one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub phase: EpisodePhase,
    pub events: Vec<SimEvent>,
    /// `None` when the tick did not run (quit or already terminal)
    pub observation: Option<Observation>,
}

impl TickReport {
    fn idle(phase: EpisodePhase) -> Self {
        Self {
            phase,
            events: Vec::new(),
            observation: None,
        }
    }
}

/// Pipe the birds should sense: the first one, unless the leading bird is
/// already past its right edge and another pipe exists.
pub fn targeted_index(state: &EpisodeState) -> usize {
    let pipe_cfg = &state.config.pipes;
    match (state.leading_agent(), state.pipes.first()) {
        (Some(lead), Some(first))
            if state.pipes.len() > 1 && lead.bird.x() > first.right_edge(pipe_cfg) =>
        {
            1
        }
        _ => 0,
    }
}

/// Advance the episode by one tick.
///
/// `policies` is the cohort; agent `i` is paired with `policies[i]`.
pub fn tick<P: Policy>(state: &mut EpisodeState, policies: &mut [P], input: &TickInput) -> TickReport {
    if state.phase.is_terminal() {
        return TickReport::idle(state.phase);
    }

    if input.quit {
        log::info!(
            "Generation {} aborted by host at tick {}",
            state.generation,
            state.time_ticks
        );
        state.phase = EpisodePhase::ExternalQuit;
        return TickReport::idle(state.phase);
    }

    state.time_ticks += 1;
    let now = state.time_ticks;
    let mut events = Vec::new();

    state.targeted = targeted_index(state);

    // Birds: survival reward, integrate, decide
    let target = state.pipes.get(state.targeted).map(|p| (p.height, p.bottom));
    if target.is_none() {
        log::warn!("Tick {}: no pipe to sense, skipping decisions", now);
    }
    let fitness_cfg = &state.config.fitness;
    let bird_cfg = &state.config.bird;
    for agent in state.agents.iter_mut().filter(|a| a.alive) {
        agent.fitness += fitness_cfg.survival_reward;
        agent.bird.advance(bird_cfg);

        let (Some((gap_center, bottom)), Some(policy)) = (target, policies.get_mut(agent.policy))
        else {
            continue;
        };
        let inputs = SensorInputs::new(agent.bird.y(), gap_center, bottom);
        if policy.decide(&inputs) > fitness_cfg.decision_threshold {
            agent.bird.jump(bird_cfg);
        }
    }

    state
        .ground
        .advance(1, state.config.pipes.scroll_velocity);

    // Pipes: scroll, collide, retire, pass
    let pipe_cfg = &state.config.pipes;
    let mut add_pipe = false;
    for pipe in state.pipes.iter_mut() {
        pipe.advance(pipe_cfg);

        for agent in state.agents.iter_mut().filter(|a| a.alive) {
            if bird_hits_pipe(&state.shapes, &agent.bird, pipe) {
                agent.fitness -= fitness_cfg.collision_penalty;
                agent.kill(now, Removal::Collision);
                log::debug!("Tick {}: bird {} hit pipe at x={}", now, agent.policy, pipe.x);
                events.push(SimEvent::Collided {
                    agent: agent.policy,
                    pipe_x: pipe.x,
                });
            }
        }

        if pipe.is_off_screen(pipe_cfg) {
            events.push(SimEvent::ObstacleRetired { x: pipe.x });
        }

        let lead_x = state.agents.iter().find(|a| a.alive).map(|a| a.bird.x());
        if !pipe.passed && lead_x.is_some_and(|x| pipe.x < x) {
            pipe.passed = true;
            add_pipe = true;
        }
    }

    if add_pipe {
        state.score += 1;
        for agent in state.agents.iter_mut().filter(|a| a.alive) {
            agent.fitness += fitness_cfg.pass_bonus;
        }
        log::debug!("Tick {}: pipe passed, score {}", now, state.score);
        events.push(SimEvent::ObstaclePassed { score: state.score });

        let spawn_x = state.config.playfield.width;
        state.spawn_pipe(spawn_x);
        if let Some(pipe) = state.pipes.last() {
            events.push(SimEvent::ObstacleSpawned {
                x: pipe.x,
                height: pipe.height,
            });
        }
    }

    // Keep `targeted` pointing at the same pipe once retired ones are gone
    let pipe_cfg = &state.config.pipes;
    let retired_before = state.pipes[..state.targeted.min(state.pipes.len())]
        .iter()
        .filter(|p| p.is_off_screen(pipe_cfg))
        .count();
    state.pipes.retain(|p| !p.is_off_screen(pipe_cfg));
    state.targeted -= retired_before;
    if state.targeted >= state.pipes.len() {
        state.targeted = 0;
    }

    // Floor and ceiling
    let bird_cfg = &state.config.bird;
    let floor = state.config.playfield.floor_y;
    let ceiling = state.config.playfield.ceiling_y;
    for agent in state.agents.iter_mut().filter(|a| a.alive) {
        if agent.bird.bottom(bird_cfg) >= floor || agent.bird.y() < ceiling {
            agent.kill(now, Removal::OutOfBounds);
            log::debug!("Tick {}: bird {} out of bounds at y={}", now, agent.policy, agent.bird.y());
            events.push(SimEvent::OutOfBounds {
                agent: agent.policy,
                y: agent.bird.y(),
            });
        }
    }

    for agent in state.agents.iter_mut().filter(|a| a.alive) {
        agent.bird.advance_animation(bird_cfg);
    }
    let observation = state.observation();

    if observation.alive == 0 {
        state.phase = EpisodePhase::AllDead;
    } else if state.score >= state.config.episode.score_cap {
        state.phase = EpisodePhase::ScoreCap;
    }

    TickReport {
        phase: state.phase,
        events,
        observation: Some(observation),
    }
}
