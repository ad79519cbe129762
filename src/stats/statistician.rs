//! Statistician - stacks finished runs and summarizes across them
//!
//! Buffers are append-only 2-D arrays with one row per run:
//!
//! | Buffer | Shape |
//! |---|---|
//! | every `Metric` | [runs, months] |
//! | firm `Distribution`s | [runs, num_firms] |
//! | household `Distribution`s | [runs, num_households] |
//! | party seats | [runs, months × 5] |

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{EconError, Result};
use crate::core::types::GovernmentType;
use crate::government::NUM_PARTIES;
use crate::stats::record::{Distribution, Metric, RunRecord};

/// Per-month mean across runs and its standard error
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossRunStats {
    pub mean: Vec<f64>,
    pub sem: Vec<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Statistician {
    pub months: usize,
    pub num_firms: usize,
    pub num_households: usize,
    pub series: BTreeMap<Metric, Array2<f64>>,
    pub distributions: BTreeMap<Distribution, Array2<f64>>,
    pub parties: Option<Array2<f64>>,
}

impl Statistician {
    pub fn new(config: &SimulationConfig) -> Self {
        let months = config.months as usize;
        let num_firms = config.num_firms();
        let num_households = config.num_households();
        let representative =
            config.government.government_type == GovernmentType::Representative;

        Self {
            months,
            num_firms,
            num_households,
            series: Metric::ALL
                .iter()
                .map(|m| (*m, Array2::zeros((0, months))))
                .collect(),
            distributions: Distribution::ALL
                .iter()
                .map(|d| {
                    let width = if d.is_firm() { num_firms } else { num_households };
                    (*d, Array2::zeros((0, width)))
                })
                .collect(),
            parties: representative.then(|| Array2::zeros((0, months * NUM_PARTIES))),
        }
    }

    pub fn num_runs(&self) -> usize {
        self.series.get(&Metric::GiniIncome).map_or(0, |a| a.nrows())
    }

    /// Append a finished run as one new row of every buffer
    ///
    /// The whole record is checked before anything is written, so a
    /// malformed record leaves the statistician unchanged.
    pub fn add_run(&mut self, record: &RunRecord) -> Result<()> {
        for metric in Metric::ALL {
            check_width(metric.name(), self.months, record.series(metric).len())?;
        }
        for dist in Distribution::ALL {
            let width = if dist.is_firm() { self.num_firms } else { self.num_households };
            let actual = record.distributions.get(&dist).map_or(0, |v| v.len());
            check_width(&format!("{:?} distribution", dist), width, actual)?;
        }
        match (&self.parties, &record.parties) {
            (Some(buffer), Some(row)) => check_width("party seats", buffer.ncols(), row.len())?,
            (None, None) => {}
            (Some(buffer), None) => check_width("party seats", buffer.ncols(), 0)?,
            (None, Some(row)) => check_width("party seats", 0, row.len())?,
        }

        for (metric, buffer) in self.series.iter_mut() {
            push(buffer, record.series(*metric))?;
        }
        for (dist, buffer) in self.distributions.iter_mut() {
            let row = record.distributions.get(dist).map(|v| v.as_slice()).unwrap_or(&[]);
            push(buffer, row)?;
        }
        if let (Some(buffer), Some(row)) = (&mut self.parties, &record.parties) {
            push(buffer, row)?;
        }
        Ok(())
    }

    pub fn series(&self, metric: Metric) -> Option<&Array2<f64>> {
        self.series.get(&metric)
    }

    pub fn distribution(&self, dist: Distribution) -> Option<&Array2<f64>> {
        self.distributions.get(&dist)
    }

    /// Mean and standard error per month; `None` before the first run
    pub fn cross_run_stats(&self, metric: Metric) -> Option<CrossRunStats> {
        self.series.get(&metric).and_then(cross_run)
    }

    /// Mean and standard error of the seat counts, `NUM_PARTIES` per month
    pub fn party_stats(&self) -> Option<CrossRunStats> {
        self.parties.as_ref().and_then(cross_run)
    }

    /// Cross-run mean of a metric in the last month
    pub fn final_mean(&self, metric: Metric) -> Option<f64> {
        self.cross_run_stats(metric)
            .and_then(|stats| stats.mean.last().copied())
    }
}

/// Column means with the standard error of the mean (ddof = 1). A single
/// run has zero standard error.
pub fn cross_run(buffer: &Array2<f64>) -> Option<CrossRunStats> {
    let runs = buffer.nrows();
    let mean = buffer.mean_axis(Axis(0))?;
    let sem = if runs > 1 {
        buffer.std_axis(Axis(0), 1.0) / (runs as f64).sqrt()
    } else {
        ndarray::Array1::zeros(buffer.ncols())
    };
    Some(CrossRunStats {
        mean: mean.to_vec(),
        sem: sem.to_vec(),
    })
}

fn check_width(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EconError::ShapeMismatch {
            what: what.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn push(buffer: &mut Array2<f64>, row: &[f64]) -> Result<()> {
    let expected = buffer.ncols();
    buffer
        .push_row(ArrayView1::from(row))
        .map_err(|_| EconError::ShapeMismatch {
            what: "buffer row".to_string(),
            expected,
            actual: row.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(months: u32, government: GovernmentType) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.months = months;
        config.firms.num_firms = 2;
        config.households.num_households = 3;
        config.government.government_type = government;
        config
    }

    fn record(run: u32, months: usize, value: f64, government: GovernmentType) -> RunRecord {
        let mut record = RunRecord::new(run, government);
        for metric in Metric::ALL {
            record.series.insert(metric, vec![value; months]);
        }
        for dist in Distribution::ALL {
            let width = if dist.is_firm() { 2 } else { 3 };
            record.distributions.insert(dist, vec![value; width]);
        }
        if let Some(parties) = &mut record.parties {
            *parties = vec![value; months * NUM_PARTIES];
        }
        record
    }

    #[test]
    fn test_single_run_has_zero_sem() {
        let mut stats = Statistician::new(&config(4, GovernmentType::None));
        assert!(stats.cross_run_stats(Metric::Ubi).is_none());

        stats.add_run(&record(0, 4, 2.5, GovernmentType::None)).unwrap();

        let ubi = stats.cross_run_stats(Metric::Ubi).unwrap();
        assert_eq!(ubi.mean, vec![2.5; 4]);
        assert_eq!(ubi.sem, vec![0.0; 4]);
        assert_eq!(stats.num_runs(), 1);
    }

    #[test]
    fn test_identical_runs_have_zero_sem() {
        let mut stats = Statistician::new(&config(3, GovernmentType::None));
        for run in 0..5 {
            stats.add_run(&record(run, 3, 7.0, GovernmentType::None)).unwrap();
        }
        let s = stats.cross_run_stats(Metric::GiniMoney).unwrap();
        assert!(s.mean.iter().all(|m| (m - 7.0).abs() < 1e-12));
        assert!(s.sem.iter().all(|e| e.abs() < 1e-12));
        assert_eq!(stats.series(Metric::GiniMoney).unwrap().dim(), (5, 3));
    }

    #[test]
    fn test_sem_uses_sample_deviation() {
        let mut stats = Statistician::new(&config(1, GovernmentType::None));
        stats.add_run(&record(0, 1, 1.0, GovernmentType::None)).unwrap();
        stats.add_run(&record(1, 1, 3.0, GovernmentType::None)).unwrap();
        let s = stats.cross_run_stats(Metric::TaxRate).unwrap();
        // Sample sd of [1, 3] is sqrt(2), over sqrt(2) runs
        assert!((s.mean[0] - 2.0).abs() < 1e-12);
        assert!((s.sem[0] - 1.0).abs() < 1e-12);
        assert_eq!(stats.final_mean(Metric::TaxRate), Some(2.0));
    }

    #[test]
    fn test_wrong_length_leaves_buffers_untouched() {
        let mut stats = Statistician::new(&config(4, GovernmentType::None));
        let mut bad = record(0, 4, 1.0, GovernmentType::None);
        bad.series.insert(Metric::Ubi, vec![1.0; 3]);

        assert!(matches!(
            stats.add_run(&bad),
            Err(EconError::ShapeMismatch { expected: 4, actual: 3, .. })
        ));
        assert_eq!(stats.num_runs(), 0);
        assert!(stats.series.values().all(|a| a.nrows() == 0));
    }

    #[test]
    fn test_party_buffer_shape() {
        let mut stats = Statistician::new(&config(6, GovernmentType::Representative));
        stats
            .add_run(&record(0, 6, 10.0, GovernmentType::Representative))
            .unwrap();
        assert_eq!(stats.parties.as_ref().map(|p| p.dim()), Some((1, 30)));
        assert_eq!(stats.party_stats().unwrap().mean.len(), 30);

        let mut plain = Statistician::new(&config(6, GovernmentType::None));
        assert!(plain
            .add_run(&record(0, 6, 10.0, GovernmentType::Representative))
            .is_err());
        assert!(plain.party_stats().is_none());
    }

    #[test]
    fn test_distribution_rows() {
        let mut stats = Statistician::new(&config(2, GovernmentType::None));
        stats.add_run(&record(0, 2, 4.0, GovernmentType::None)).unwrap();
        assert_eq!(stats.distribution(Distribution::FirmWage).unwrap().dim(), (1, 2));
        assert_eq!(stats.distribution(Distribution::HouseholdMoney).unwrap().dim(), (1, 3));
    }
}
