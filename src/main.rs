//! Agent Economy - command line entry point
//!
//! Loads a configuration (defaults, an optional TOML file, then flags),
//! runs the batch and prints either a text summary or the full JSON output.

use std::path::PathBuf;

use clap::Parser;

use agent_economy::core::error::Result;
use agent_economy::core::types::GovernmentType;
use agent_economy::{simulate, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "agent-economy")]
#[command(about = "Agent-based economy with tax-voting governments")]
struct Args {
    /// TOML file overriding the default parameters
    #[arg(long)]
    config: Option<PathBuf>,

    /// Months per run
    #[arg(long)]
    months: Option<u32>,

    /// Number of independent runs
    #[arg(long)]
    runs: Option<u32>,

    /// Government regime: none, direct or representative
    #[arg(long)]
    government: Option<GovernmentType>,

    /// Number of firms
    #[arg(long)]
    firms: Option<u32>,

    /// Number of households
    #[arg(long)]
    households: Option<u32>,

    /// Months between tax votes
    #[arg(long)]
    tax_frequency: Option<u32>,

    /// Preference exponent of the poorest voter
    #[arg(long)]
    tax_gamma: Option<f64>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Execute runs in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Print the full output as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Args {
    fn into_config(self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(months) = self.months {
            config.months = months;
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if let Some(government) = self.government {
            config.government.government_type = government;
        }
        if let Some(firms) = self.firms {
            config.firms.num_firms = firms;
        }
        if let Some(households) = self.households {
            config.households.num_households = households;
        }
        if let Some(frequency) = self.tax_frequency {
            config.government.tax_adjustment_frequency = frequency;
        }
        if let Some(gamma) = self.tax_gamma {
            config.government.tax_gamma = gamma;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config.parallel |= self.parallel;

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_economy=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let json = args.json;
    let config = args.into_config()?;

    let output = simulate(config)?;

    if json {
        println!("{}", output.to_json()?);
    } else {
        println!("{}", output.summary());
    }
    Ok(())
}
