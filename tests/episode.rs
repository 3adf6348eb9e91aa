//! Episode scenarios and cross-module invariants

use flappy_evo::sim::{
    ConstantPolicy, EpisodePhase, LinearPolicy, Observation, Pipe, Removal, ScriptedPolicy, SensorInputs,
    SimEvent, TickInput, tick,
};
use flappy_evo::{Episode, EpisodeHost, Headless, SimConfig, run_episode};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Collects every observation
#[derive(Default)]
struct Recorder {
    seen: Vec<Observation>,
}

impl EpisodeHost for Recorder {
    fn observe(&mut self, observation: &Observation) {
        self.seen.push(observation.clone());
    }
}

/// Episode whose first pipe has its gap around the birds' opening path
fn episode_with_close_pipe(config: SimConfig) -> Episode {
    let mut episode = Episode::new(config, 1, 0).unwrap();
    let state = episode.state_mut();
    let pipe_cfg = state.config.pipes.clone();
    state.pipes = vec![Pipe::with_gap(250.0, 250.0, &pipe_cfg)];
    episode
}

#[test]
fn never_jumping_bird_falls_to_the_floor() {
    let mut policies = [ConstantPolicy(0.0)];
    let report = run_episode(SimConfig::default(), &mut policies, 0, &mut Headless).unwrap();

    assert_eq!(report.termination, EpisodePhase::AllDead);
    assert_eq!(report.score, 0);
    // 1.5, 6, 13.5, then terminal 16 per tick until the sprite touches y=730
    assert_eq!(report.ticks, 23);
    assert!(approx(report.fitness[0], 23.0 * 0.1));
}

#[test]
fn single_flap_clears_a_close_pipe() {
    let mut episode = episode_with_close_pipe(SimConfig::default());
    let mut policies = [ScriptedPolicy::new(vec![1.0], 0.0)];

    for t in 1..=4 {
        let report = tick(episode.state_mut(), &mut policies, &TickInput::default());
        assert_eq!(report.phase, EpisodePhase::Running, "tick {t}");
        assert_eq!(episode.state().score, 0, "tick {t}");
    }

    // Pipe x reaches 225 < bird x 230
    let report = tick(episode.state_mut(), &mut policies, &TickInput::default());
    let state = episode.state();
    assert_eq!(state.score, 1);
    assert!(state.agents[0].alive);
    assert!(state.pipes[0].passed);
    assert!(approx(state.agents[0].fitness, 5.0 * 0.1 + 5.0));
    assert!(report.events.contains(&SimEvent::ObstaclePassed { score: 1 }));
    assert_eq!(state.pipes.len(), 2);
    assert_eq!(state.pipes[1].x, 600.0);
    assert!(!state.pipes[1].passed);

    // Passing is counted once
    tick(episode.state_mut(), &mut policies, &TickInput::default());
    assert_eq!(episode.state().score, 1);
}

#[test]
fn climber_and_faller_both_die_without_passing() {
    let mut policies = [ConstantPolicy(1.0), ConstantPolicy(0.0)];
    let mut episode = Episode::new(SimConfig::default(), 2, 0).unwrap();
    let report = episode.run(&mut policies, &mut Headless);

    assert_eq!(report.termination, EpisodePhase::AllDead);
    assert_eq!(report.score, 0);
    assert_eq!(report.fitness.len(), 2);

    // Climber rises 11 per tick after the first and leaves through the top on tick 38
    assert_eq!(report.ticks, 38);
    assert!(approx(report.fitness[0], 38.0 * 0.1));
    // Faller is frozen after hitting the floor on tick 23
    assert!(approx(report.fitness[1], 23.0 * 0.1));

    let agents = &episode.state().agents;
    assert_eq!(agents[0].died_at, Some(38));
    assert_eq!(agents[1].died_at, Some(23));
    assert!(agents.iter().all(|a| a.removal == Some(Removal::OutOfBounds)));
}

#[test]
fn score_cap_ends_episode_on_the_pass_tick() {
    let mut config = SimConfig::default();
    config.episode.score_cap = 1;
    let mut episode = episode_with_close_pipe(config);
    let mut policies = [ScriptedPolicy::new(vec![1.0], 0.0)];

    let report = episode.run(&mut policies, &mut Headless);
    assert_eq!(report.termination, EpisodePhase::ScoreCap);
    assert_eq!(report.ticks, 5);
    assert_eq!(report.score, 1);
    assert!(approx(report.fitness[0], 5.5));
}

#[test]
fn pass_bonus_goes_to_every_live_bird() {
    let mut episode = Episode::new(SimConfig::default(), 3, 0).unwrap();
    {
        let state = episode.state_mut();
        let pipe_cfg = state.config.pipes.clone();
        state.pipes = vec![Pipe::with_gap(250.0, 250.0, &pipe_cfg)];
    }
    let mut policies = [
        ScriptedPolicy::new(vec![1.0], 0.0),
        ScriptedPolicy::new(vec![1.0], 0.0),
        ScriptedPolicy::new(vec![1.0], 0.0),
    ];
    for _ in 0..5 {
        tick(episode.state_mut(), &mut policies, &TickInput::default());
    }
    let state = episode.state();
    assert_eq!(state.score, 1);
    for agent in &state.agents {
        assert!(approx(agent.fitness, 5.5));
    }
}

#[test]
fn random_cohort_keeps_invariants() {
    let mut rng = Pcg32::seed_from_u64(11);
    let mut policies: Vec<LinearPolicy> = (0..30).map(|_| LinearPolicy::random(&mut rng, 1.0)).collect();
    let mut recorder = Recorder::default();
    let report = run_episode(SimConfig::default(), &mut policies, 2, &mut recorder).unwrap();

    assert!(!report.aborted());
    assert_eq!(recorder.seen.len() as u64, report.ticks);

    let mut last_score = 0;
    let mut last_alive = 30;
    for obs in &recorder.seen {
        assert!(obs.score == last_score || obs.score == last_score + 1);
        assert!(obs.alive <= last_alive);
        assert_eq!(obs.alive, obs.agents.len());
        assert!(obs.targeted < obs.obstacles.len());
        assert_eq!(obs.ground[1] - obs.ground[0], 672.0);
        for agent in &obs.agents {
            assert_eq!(agent.x, 230.0);
        }
        last_score = obs.score;
        last_alive = obs.alive;
    }
    assert_eq!(last_score, report.score);
}

#[test]
fn steering_bird_runs_several_pipe_lifecycles() {
    let mut config = SimConfig::default();
    config.episode.score_cap = 4;
    // Flap while below the middle of the gap
    let mut policies = [|s: &SensorInputs| {
        if s.gap_distance > s.bottom_distance { 1.0_f32 } else { 0.0 }
    }];
    let mut recorder = Recorder::default();
    let report = run_episode(config, &mut policies, 3, &mut recorder).unwrap();

    assert_eq!(report.termination, EpisodePhase::ScoreCap);
    assert_eq!(report.score, 4);
    assert_eq!(recorder.seen.len() as u64, report.ticks);

    let mut last_score = 0;
    let mut last_front_x = f32::INFINITY;
    let mut last_len = 1;
    let mut retirements = 0;
    let mut ticks_sensing_second = 0;
    for obs in &recorder.seen {
        assert_eq!(obs.alive, 1);
        assert!(obs.score == last_score || obs.score == last_score + 1);

        assert!(obs.targeted < obs.obstacles.len());
        if obs.targeted == 1 {
            // Only a pipe the bird has already cleared is skipped
            assert!(obs.obstacles[0].passed);
            assert!(obs.obstacles[0].x + 104.0 < 230.0);
            ticks_sensing_second += 1;
        }

        let front_x = obs.obstacles[0].x;
        if front_x > last_front_x {
            assert_eq!(obs.obstacles.len(), last_len - 1);
            assert_eq!(obs.targeted, 0);
            retirements += 1;
        }
        if obs.score > last_score {
            // A fresh pipe enters at the right edge on every pass
            let spawned = obs.obstacles.last().unwrap();
            assert_eq!(spawned.x, 600.0);
            assert!(!spawned.passed);
        }

        last_score = obs.score;
        last_front_x = front_x;
        last_len = obs.obstacles.len();
    }
    assert!(retirements >= 2);
    assert!(ticks_sensing_second > 0);
}

#[test]
fn same_generation_replays_identically() {
    let run = || {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut policies: Vec<LinearPolicy> =
            (0..10).map(|_| LinearPolicy::random(&mut rng, 1.0)).collect();
        run_episode(SimConfig::default(), &mut policies, 7, &mut Headless).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.ticks, b.ticks);
    assert_eq!(a.score, b.score);
    assert_eq!(a.fitness, b.fitness);
}
