use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::path::PathBuf;

use dispatch_sim::simulation::{
    default_region, dispatch_round, RankingKey, RegionConfig, SimConfig, Simulation,
    DEFAULT_MAX_ACTIVE_CALLS, DEFAULT_MAX_ARRIVAL_GAP, DEFAULT_MAX_UNITS_PER_EMERGENCY,
    DEFAULT_SEED, DEFAULT_TARGET_DISPATCHES,
};

#[derive(Parser)]
#[command(name = "dispatch_sim")]
#[command(about = "Emergency-response dispatch simulation")]
struct Cli {
    /// Seed for the random stream; identical seeds give identical runs
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Resolved emergencies after which the simulation is complete
    #[arg(long, default_value_t = DEFAULT_TARGET_DISPATCHES)]
    target_dispatches: u32,

    /// Maximum number of emergencies open at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_ACTIVE_CALLS)]
    max_active_calls: usize,

    /// Maximum units a single emergency can require
    #[arg(long, default_value_t = DEFAULT_MAX_UNITS_PER_EMERGENCY)]
    max_units: u32,

    /// Maximum logical time between two emergency arrivals
    #[arg(long, default_value_t = DEFAULT_MAX_ARRIVAL_GAP)]
    max_arrival_gap: u64,

    /// JSON region file (cities, fleets, adjacency); built-in region if omitted
    #[arg(long)]
    region: Option<PathBuf>,

    /// Order in which the automatic operator works the active set
    #[arg(long, value_enum, default_value = "type")]
    rank_by: RankingKey,

    /// Upper bound on simulation ticks
    #[arg(long, default_value = "10000")]
    max_ticks: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = SimConfig {
        seed: cli.seed,
        target_dispatches: cli.target_dispatches,
        max_active_calls: cli.max_active_calls,
        max_units_per_emergency: cli.max_units,
        max_arrival_gap: cli.max_arrival_gap,
    };

    let region = match &cli.region {
        Some(path) => RegionConfig::from_json_file(path)?,
        None => default_region(),
    };

    let simulation =
        Simulation::new(config, region).context("Refusing to start simulation")?;

    run_headless(simulation, cli.rank_by, cli.max_ticks);
    Ok(())
}

/// Run the simulation in headless mode with the automatic operator
fn run_headless(mut simulation: Simulation, rank_by: RankingKey, max_ticks: u64) {
    info!("Running dispatch simulation in headless mode...");
    info!("Ranking: {:?}, max ticks: {}", rank_by, max_ticks);

    for tick in 0..max_ticks {
        if simulation.is_finished() {
            break;
        }

        let admitted = simulation.tick();
        let resolved = dispatch_round(&mut simulation, rank_by);

        if !admitted.is_empty() || resolved > 0 {
            debug!(
                "Tick {}: {} admitted, {} resolved | {}",
                tick + 1,
                admitted.len(),
                resolved,
                simulation.state().summary()
            );
        }

        // Nothing can change any more: no room for new calls and no call can be served
        if resolved == 0 && simulation.is_active_set_full() {
            warn!(
                "No emergency can be served with {} open calls, stopping early",
                simulation.active_count()
            );
            break;
        }
    }

    let report = simulation.stop();
    report.log_summary();
}
