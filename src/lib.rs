mod run;

use anyhow::Context;
use clap::Parser;
use physics::{scenario, Simulation, SimulationConfig};
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;

/// Gravity, starlight and photometers in a box.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// TOML file with physical constants and engine switches
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 2500)]
    ticks: u64,

    /// Simulate a random cluster of this many bodies instead of the transit demo
    #[arg(long)]
    cluster: Option<usize>,

    /// Seed for the random cluster
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

pub fn start() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    log::info!("Setting up");
    let mut sim = Simulation::new(config)?;
    match cli.cluster {
        Some(n) => {
            let mut rng = StdRng::seed_from_u64(cli.seed);
            scenario::random_cluster(&mut sim, &mut rng, n, 1e6)?;
            log::info!("Random cluster of {} bodies, seed {}", n, cli.seed);
        }
        None => {
            scenario::transit_demo(&mut sim)?;
            log::info!("Transit demo");
        }
    }

    log::info!("Running {} ticks", cli.ticks);
    run::run(&mut sim, cli.ticks);
    Ok(())
}
