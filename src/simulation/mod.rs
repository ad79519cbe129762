//! Simulation orchestrator
//!
//! A `Simulation` owns one run: its world, its government and its record.
//! `simulate` executes every run of a configuration, optionally in
//! parallel, and merges the finished records into a `Statistician` in run
//! order.

pub mod output;
pub mod tick;

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::info;

use crate::core::config::SimulationConfig;
use crate::core::error::{EconError, Result};
use crate::core::types::Month;
use crate::economy::systems::populate_world;
use crate::economy::world::EconomyWorld;
use crate::government::Government;
use crate::stats::record::{Metric, RunRecord};
use crate::stats::statistician::Statistician;

pub use output::SimulationOutput;
pub use tick::{run_month_tick, MonthSummary};

/// Seed of run `run` derived from the base seed
pub fn run_seed(seed: u64, run: u32) -> u64 {
    seed.wrapping_add(run as u64)
}

pub struct Simulation<'a> {
    config: &'a SimulationConfig,
    pub run: u32,
    pub world: EconomyWorld,
    pub government: Government,
    pub record: RunRecord,
}

impl<'a> Simulation<'a> {
    /// Set up run `run` with its own seeded population
    pub fn new(config: &'a SimulationConfig, run: u32) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(run_seed(config.seed, run));
        let world = populate_world(config, rng)?;
        let government = Government::new(&config.government);
        let record = RunRecord::new(run, government.kind());
        Ok(Self {
            config,
            run,
            world,
            government,
            record,
        })
    }

    pub fn month(&self) -> Month {
        self.world.month
    }

    pub fn is_complete(&self) -> bool {
        self.world.month >= self.config.months
    }

    /// Advance one month; only the orchestrator moves the month counter
    pub fn step(&mut self) -> Result<MonthSummary> {
        let summary = run_month_tick(
            &mut self.world,
            &mut self.government,
            &mut self.record,
            self.config,
        )?;
        self.world.month += 1;
        Ok(summary)
    }

    /// Run every remaining month and hand back the finished record
    pub fn run(mut self) -> Result<RunRecord> {
        while !self.is_complete() {
            self.step()?;
        }
        self.record.record_distributions(&self.world);

        info!(
            "Run {} complete: employment {:.3}, income gini {:.4}, tax rate {:.4}",
            self.run,
            self.world.employment_rate(),
            self.record.latest(Metric::GiniIncome).unwrap_or(0.0),
            self.government.tax_rate(),
        );
        Ok(self.record)
    }
}

fn execute_run(config: &SimulationConfig, run: u32) -> Result<RunRecord> {
    Simulation::new(config, run)
        .and_then(Simulation::run)
        .map_err(|e| EconError::RunFailed {
            run,
            source: Box::new(e),
        })
}

/// Run every configured run and aggregate the results
///
/// The configuration is validated before the first run starts. A failed
/// run aborts the whole batch.
pub fn simulate(config: SimulationConfig) -> Result<SimulationOutput> {
    config.validate()?;
    let start = Instant::now();

    info!(
        "Simulating {} run(s) of {} months: {} government, {} households, {} firms",
        config.runs,
        config.months,
        config.government.government_type,
        config.households.num_households,
        config.firms.num_firms,
    );

    let records: Vec<Result<RunRecord>> = if config.parallel {
        (0..config.runs)
            .into_par_iter()
            .map(|run| execute_run(&config, run))
            .collect()
    } else {
        (0..config.runs).map(|run| execute_run(&config, run)).collect()
    };

    let mut statistician = Statistician::new(&config);
    for record in records {
        statistician.add_run(&record?)?;
    }

    let elapsed = start.elapsed();
    info!("Finished in {:.2}s", elapsed.as_secs_f64());

    Ok(SimulationOutput::new(config, statistician, elapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GovernmentType;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.months = 6;
        config.firms.num_firms = 5;
        config.households.num_households = 50;
        config
    }

    #[test]
    fn test_run_seeds_differ() {
        assert_eq!(run_seed(10, 0), 10);
        assert_eq!(run_seed(u64::MAX, 1), 0);
    }

    #[test]
    fn test_simulation_steps_months_in_order() {
        let config = small_config();
        let mut sim = Simulation::new(&config, 0).unwrap();
        assert_eq!(sim.month(), 0);
        sim.step().unwrap();
        sim.step().unwrap();
        assert_eq!(sim.month(), 2);
        assert_eq!(sim.record.months_recorded(), 2);
        assert!(!sim.is_complete());
    }

    #[test]
    fn test_run_produces_full_record() {
        let config = small_config();
        let record = Simulation::new(&config, 3).unwrap().run().unwrap();
        assert_eq!(record.run, 3);
        assert_eq!(record.months_recorded(), 6);
        assert_eq!(record.distributions.len(), 4);
    }

    #[test]
    fn test_invalid_config_never_starts() {
        let mut config = small_config();
        config.runs = 0;
        assert!(matches!(simulate(config), Err(EconError::InvalidConfig(_))));
    }

    #[test]
    fn test_representative_run_records_parties() {
        let mut config = small_config();
        config.government.government_type = GovernmentType::Representative;
        config.government.tax_adjustment_frequency = 3;
        let output = simulate(config).unwrap();
        let parties = output.statistician.parties.as_ref().unwrap();
        assert_eq!(parties.dim(), (1, 6 * 5));
    }
}
