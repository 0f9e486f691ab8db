//! Offline spin batch simulator
//!
//! Runs the same batch the `/api/bet/many-spins` endpoint runs and prints the
//! statistics as JSON. `--seed` makes a run reproducible.

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use reelbet::api::server::init_tracing;
use reelbet::config::ConfigLoader;
use reelbet::{BetOptions, BetResolver};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "reelbet-simulate")]
#[command(about = "Run a batch of slot spins and report RTP", long_about = None)]
struct Args {
    /// Stake per spin (must be an allowed amount)
    #[arg(long, default_value = "5")]
    amount: f64,

    /// Number of spins
    #[arg(long)]
    spins: Option<f64>,

    /// Force every spin to three of a kind
    #[arg(long)]
    autowin: bool,

    /// Force every spin to lose
    #[arg(long)]
    autolose: bool,

    /// Outcome weights as JSON, e.g. '{"threeOfAKind":2,"twoOfAKind":1,"noWin":1}'
    #[arg(long)]
    outcome_weights: Option<String>,

    /// Symbol weights as JSON keyed by index, e.g. '{"0":1,"1":1,...}'
    #[arg(long)]
    symbol_weights: Option<String>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,
}

fn parse_weights(raw: Option<&str>) -> Result<Option<BTreeMap<String, f64>>, serde_json::Error> {
    raw.map(|s| serde_json::from_str(s)).transpose()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing("reelbet=info");

    let loader = match &args.config {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    let limits = config.betting.limits();

    let amount = limits.check_amount(Some(args.amount))?;
    let spins = limits.check_spins(args.spins)?;
    let options = BetOptions {
        autowin: Some(args.autowin),
        autolose: Some(args.autolose),
        outcome_weights: parse_weights(args.outcome_weights.as_deref())?,
        symbol_weights: parse_weights(args.symbol_weights.as_deref())?,
    };

    let resolver = BetResolver::new(Arc::new(config.betting.catalog()?));
    let stats = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            resolver.run_many_spins_with_rng(&mut rng, amount, &options, spins)?
        }
        None => resolver.run_many_spins(amount, &options, spins)?,
    };

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
