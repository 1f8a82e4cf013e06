//! Engine binary for the housing market simulation.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration from `housing-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing)
//! 4. Build the market (tables, houses, households, initial ownership)
//! 5. Run the simulation loop, writing one JSON line per tick
//! 6. Log the result

mod error;
mod output;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use housing_core::config::MarketConfig;
use housing_core::market::Market;
use housing_core::runner;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::output::JsonLinesCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "housing-config.yaml";

/// Agent-based housing market simulation
#[derive(Parser, Debug)]
#[command(name = "housing-engine")]
#[command(about = "Run the housing market simulation and emit per-tick summaries as JSON lines")]
#[command(version)]
struct Args {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Number of ticks (months) to run; overrides `simulation.max_ticks`
    #[arg(long)]
    ticks: Option<u64>,

    /// Random seed; overrides `world.seed`
    #[arg(long)]
    seed: Option<u64>,

    /// Write summaries to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), EngineError> {
    let args = Args::parse();

    let found = args.config.exists();
    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    let max_ticks = args.ticks.unwrap_or(config.simulation.max_ticks);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    info!("housing-engine starting");
    if !found {
        info!(path = %args.config.display(), "Config file not found, using defaults");
    }
    info!(
        name = config.world.name,
        seed = config.world.seed,
        houses = config.population.initial_houses,
        households = config.population.initial_households,
        max_ticks,
        "Configuration loaded"
    );

    let mut market = Market::new(&config)?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut callback = JsonLinesCallback::new(writer);

    let result = runner::run_simulation(&mut market, max_ticks, &mut callback)?;
    let lines = callback.lines();
    callback.finish()?;

    runner::log_simulation_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        sales = market.ledger.len(),
        lines,
        output = ?args.output,
        "housing-engine shutdown complete"
    );
    Ok(())
}

/// Load the configuration file, falling back to defaults when it is
/// missing.
fn load_config(path: &Path) -> Result<MarketConfig, EngineError> {
    if path.exists() {
        Ok(MarketConfig::from_file(path)?)
    } else {
        Ok(MarketConfig::default())
    }
}
