//! Flappy Evo entry point
//!
//! Runs consecutive generations of randomly initialised linear policies and
//! reports per-generation statistics. Evolving the cohort between generations
//! is the optimizer's job and happens outside this crate.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use flappy_evo::sim::{EpisodePhase, LinearPolicy};
use flappy_evo::{
    EpisodeHost, GenerationHistory, GenerationRecord, RealTime, SimConfig, generation_seed, run_episode,
};

#[derive(Parser)]
#[command(name = "flappy-evo")]
#[command(version)]
#[command(about = "Multi-agent Flappy Bird simulation for neuroevolution")]
struct Cli {
    /// JSON config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of generations to run
    #[arg(short, long, default_value_t = 20)]
    generations: u32,

    /// Birds per generation
    #[arg(short, long, default_value_t = 50)]
    population: usize,

    /// Run seed (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pace ticks to the configured tick rate
    #[arg(long)]
    realtime: bool,

    /// Generation leaderboard JSON file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    print_config: bool,
}

/// Unpaced host stopped by a shared flag
struct Interruptible {
    quit: Arc<AtomicBool>,
}

impl EpisodeHost for Interruptible {
    fn poll_quit(&mut self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.episode.seed = seed;
    }
    config.validate()?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let mut history = match &cli.history {
        Some(path) => GenerationHistory::load(path)?,
        None => GenerationHistory::new(),
    };

    let (mut host, quit): (Box<dyn EpisodeHost>, _) = if cli.realtime {
        let host = RealTime::new(config.playfield.tick_rate);
        let quit = host.quit_handle();
        (Box::new(host) as Box<dyn EpisodeHost>, quit)
    } else {
        let quit = Arc::new(AtomicBool::new(false));
        let host = Interruptible {
            quit: Arc::clone(&quit),
        };
        (Box::new(host) as Box<dyn EpisodeHost>, quit)
    };
    ctrlc::set_handler(move || quit.store(true, Ordering::Relaxed))?;

    for generation in 1..=cli.generations {
        // Cohort seed is kept apart from the course seed
        let mut rng = Pcg32::seed_from_u64(generation_seed(!config.episode.seed, generation));
        let mut cohort: Vec<LinearPolicy> = (0..cli.population)
            .map(|_| LinearPolicy::random(&mut rng, 1.0))
            .collect();

        let report = run_episode(config.clone(), &mut cohort, generation, host.as_mut())?;
        if report.aborted() {
            log::info!("Quit requested, stopping run");
            break;
        }

        let record = GenerationRecord::from_report(&report);
        println!(
            "gen {:>3}  score {:>3}  best {:>8.1}  mean {:>8.1}  ticks {:>6}",
            record.generation, record.score, record.best_fitness, record.mean_fitness, record.ticks
        );
        if let Some(index) = report.best_index() {
            log::debug!("Generation {} fittest bird: #{}", generation, index);
        }
        if let Some(rank) = history.add_record(record) {
            log::info!("Generation {} entered the history at #{}", generation, rank);
        }

        if report.termination == EpisodePhase::ScoreCap {
            log::info!("Score cap {} reached in generation {}", config.episode.score_cap, generation);
            break;
        }
    }

    if let Some(best) = history.best() {
        println!(
            "best generation: {} (score {}, fitness {:.1})",
            best.generation, best.score, best.best_fitness
        );
    }
    if let Some(path) = &cli.history {
        history.save(path)?;
    }

    Ok(())
}
