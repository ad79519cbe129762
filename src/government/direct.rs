//! Direct democracy: every household votes on the tax rate

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::government::{recent_mean, PolicyInputs, Treasury};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectGovernment {
    pub treasury: Treasury,
    /// Months between votes
    pub frequency: u32,
    /// Preference exponent of the poorest household
    pub tax_gamma: f64,
}

impl DirectGovernment {
    pub fn new(frequency: u32, tax_gamma: f64) -> Self {
        Self {
            treasury: Treasury::default(),
            frequency,
            tax_gamma,
        }
    }

    /// Without `frequency` months of Gini history there is no tax. After
    /// that a vote is held every `frequency` months and the rate holds in
    /// between.
    pub fn compute_policy(&mut self, inputs: &PolicyInputs) {
        let window = self.frequency as usize;
        let Some(m_gini) = recent_mean(inputs.gini_history, window) else {
            self.treasury.tax_rate = 0.0;
            return;
        };
        if inputs.month % self.frequency != 0 {
            return;
        }

        let incomes: Vec<f64> = inputs.households.iter().map(|h| h.income).collect();
        self.treasury.tax_rate = vote_tax_rate(&incomes, m_gini, self.tax_gamma);
        debug!(
            "Month {}: direct vote sets tax rate {:.4} (mean gini {:.4})",
            inputs.month, self.treasury.tax_rate, m_gini
        );
    }
}

/// Tax rate a voter with preference exponent `gamma` asks for
///
/// Zero at `gamma = 0`, rising towards 1 with both inequality and `gamma`.
pub fn preferred_rate(m_gini: f64, gamma: f64) -> f64 {
    1.0 - (1.0 + m_gini).powf(-gamma)
}

/// Unweighted mean of every voter's preferred rate
///
/// Voters are ranked by income. The exponent falls linearly from
/// `tax_gamma` for the lowest income to 0 for the highest. When all incomes
/// are equal every voter uses `tax_gamma / 2`.
pub fn vote_tax_rate(incomes: &[f64], m_gini: f64, tax_gamma: f64) -> f64 {
    if incomes.is_empty() {
        return 0.0;
    }
    let mut sorted: Vec<OrderedFloat<f64>> = incomes.iter().copied().map(OrderedFloat).collect();
    sorted.sort();

    let min = sorted[0].0;
    let max = sorted[sorted.len() - 1].0;
    let spread = min - max;

    if spread == 0.0 {
        warn!(
            "All {} voters have income {:.3}; using half the preference exponent",
            incomes.len(),
            min
        );
        return preferred_rate(m_gini, tax_gamma / 2.0);
    }

    let total: f64 = sorted
        .iter()
        .map(|income| {
            let gamma = (income.0 - max) / spread * tax_gamma;
            preferred_rate(m_gini, gamma)
        })
        .sum();
    total / sorted.len() as f64
}
