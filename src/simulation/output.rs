//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::stats::record::Metric;
use crate::stats::statistician::Statistician;

/// Headline series shown in the text summary
const SUMMARY_METRICS: [Metric; 7] = [
    Metric::HouseholdEmployment,
    Metric::FirmItemPrice,
    Metric::FirmWage,
    Metric::GiniIncome,
    Metric::GiniMoney,
    Metric::TaxRate,
    Metric::Ubi,
];

/// Complete output of a batch of runs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub config: SimulationConfig,
    pub statistician: Statistician,
    pub elapsed_ms: u64,
}

impl SimulationOutput {
    pub fn new(config: SimulationConfig, statistician: Statistician, elapsed: Duration) -> Self {
        Self {
            config,
            statistician,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// Final-month cross-run means (± standard error) of the headline series
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "Simulated {} run(s) of {} months in {}ms ({} government)",
            self.statistician.num_runs(),
            self.config.months,
            self.elapsed_ms,
            self.config.government.government_type,
        )];

        for metric in SUMMARY_METRICS {
            if let Some(stats) = self.statistician.cross_run_stats(metric) {
                let mean = stats.mean.last().copied().unwrap_or(0.0);
                let sem = stats.sem.last().copied().unwrap_or(0.0);
                lines.push(format!("  {:<22} {:>12.4} ± {:.4}", metric.name(), mean, sem));
            }
        }

        if let Some(parties) = self.statistician.party_stats() {
            let last = parties.mean.len().saturating_sub(crate::government::NUM_PARTIES);
            let seats: Vec<String> = parties.mean[last..]
                .iter()
                .map(|s| format!("{:.1}", s))
                .collect();
            lines.push(format!("  {:<22} [{}]", "party_seats", seats.join(", ")));
        }

        lines.join("\n")
    }
}
