//! Representative democracy: an elected parliament of income-quintile parties
//!
//! Each household belongs to the party of its income quintile. At every
//! election a parliament is drawn at random from the population, so seat
//! shares track quintile sizes up to sampling noise. Party `p` (0 = poorest)
//! campaigns on the rate a voter with exponent `tax_gamma * (4 - p) / 4`
//! would prefer, and the parliament's rate is the seat-weighted mean of the
//! platforms.

use ordered_float::OrderedFloat;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::government::direct::preferred_rate;
use crate::government::{recent_mean, PolicyInputs, Treasury};

/// One party per income quintile
pub const NUM_PARTIES: usize = 5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepresentativeGovernment {
    pub treasury: Treasury,
    /// Months between elections
    pub frequency: u32,
    pub tax_gamma: f64,
    /// Seats up for election
    pub seats: u32,
    /// Seats held by each party, poorest first
    pub parliament: [u32; NUM_PARTIES],
}

impl RepresentativeGovernment {
    pub fn new(frequency: u32, tax_gamma: f64, seats: u32) -> Self {
        Self {
            treasury: Treasury::default(),
            frequency,
            tax_gamma,
            seats,
            parliament: [0; NUM_PARTIES],
        }
    }

    /// Elections run every `frequency` months from month 0. The parliament
    /// only sets a tax once `frequency` months of Gini history exist.
    pub fn compute_policy<R: Rng + ?Sized>(&mut self, inputs: &PolicyInputs, rng: &mut R) {
        let on_cycle = inputs.month % self.frequency == 0;
        if on_cycle {
            let incomes: Vec<f64> = inputs.households.iter().map(|h| h.income).collect();
            self.parliament = elect_parliament(&incomes, self.seats as usize, rng);
            debug!("Month {}: parliament elected {:?}", inputs.month, self.parliament);
        }

        let Some(m_gini) = recent_mean(inputs.gini_history, self.frequency as usize) else {
            self.treasury.tax_rate = 0.0;
            return;
        };
        if on_cycle {
            self.treasury.tax_rate = seat_weighted_rate(&self.parliament, m_gini, self.tax_gamma);
            debug!(
                "Month {}: parliament sets tax rate {:.4}",
                inputs.month, self.treasury.tax_rate
            );
        }
    }
}

/// Party of each household by income rank, 0 for the poorest quintile
pub fn income_parties(incomes: &[f64]) -> Vec<usize> {
    let n = incomes.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| OrderedFloat(incomes[i]));

    let mut parties = vec![0; n];
    for (rank, &i) in order.iter().enumerate() {
        parties[i] = rank * NUM_PARTIES / n;
    }
    parties
}

/// Draw `seats` members without replacement and count seats per party
///
/// A population smaller than the parliament fills only as many seats as it
/// has households.
pub fn elect_parliament<R: Rng + ?Sized>(
    incomes: &[f64],
    seats: usize,
    rng: &mut R,
) -> [u32; NUM_PARTIES] {
    let mut parliament = [0; NUM_PARTIES];
    if incomes.is_empty() {
        return parliament;
    }
    let parties = income_parties(incomes);
    let members = seats.min(incomes.len());
    for member in index::sample(rng, incomes.len(), members) {
        parliament[parties[member]] += 1;
    }
    parliament
}

/// Rate party `party` campaigns on
pub fn platform_rate(party: usize, m_gini: f64, tax_gamma: f64) -> f64 {
    let top = (NUM_PARTIES - 1) as f64;
    let gamma = tax_gamma * (top - party as f64) / top;
    preferred_rate(m_gini, gamma)
}

/// Seat-weighted mean of the party platforms; 0 for an empty parliament
pub fn seat_weighted_rate(parliament: &[u32; NUM_PARTIES], m_gini: f64, tax_gamma: f64) -> f64 {
    let total: u32 = parliament.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let weighted: f64 = parliament
        .iter()
        .enumerate()
        .map(|(party, &seats)| seats as f64 * platform_rate(party, m_gini, tax_gamma))
        .sum();
    weighted / total as f64
}
