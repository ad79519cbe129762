//! Government - taxation and universal basic income
//!
//! The variant is chosen once from configuration and never changes during a
//! run. Every variant taxes household income at `tax_rate` and pays the whole
//! take back as an equal UBI in the same month, so the treasury is empty
//! after each payout.

pub mod direct;
pub mod representative;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::GovernmentConfig;
use crate::core::error::Result;
use crate::core::types::{GovernmentType, Month};
use crate::economy::household::Household;

pub use direct::{preferred_rate, vote_tax_rate, DirectGovernment};
pub use representative::{
    elect_parliament, platform_rate, seat_weighted_rate, RepresentativeGovernment, NUM_PARTIES,
};

/// What a government looks at when it sets policy
pub struct PolicyInputs<'a> {
    pub month: Month,
    /// Income Gini of every completed month so far, oldest first
    pub gini_history: &'a [f64],
    pub households: &'a [Household],
}

/// Tax receipts and the policy that produced them
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Treasury {
    /// Tax collected and not yet paid out
    pub money: f64,
    pub tax_rate: f64,
    pub ubi: f64,
}

impl Treasury {
    /// Tax every household's income for the month at the current rate
    pub fn collect_tax(&mut self, households: &mut [Household]) -> Result<f64> {
        let mut collected = 0.0;
        for hh in households.iter_mut() {
            collected += hh.pay_tax(self.tax_rate)?;
        }
        self.money += collected;
        Ok(collected)
    }

    pub fn calc_ubi(&mut self, num_households: usize) -> f64 {
        self.ubi = if num_households == 0 {
            0.0
        } else {
            self.money / num_households as f64
        };
        self.ubi
    }

    /// Pay `ubi` to every household and empty the treasury
    pub fn pay_ubi(&mut self, households: &mut [Household]) -> Result<f64> {
        for hh in households.iter_mut() {
            hh.receive_ubi(self.ubi)?;
        }
        let paid = self.ubi * households.len() as f64;
        self.money = 0.0;
        Ok(paid)
    }
}

/// Mean of the last `window` values, if there are that many
pub fn recent_mean(history: &[f64], window: usize) -> Option<f64> {
    if window == 0 || history.len() < window {
        return None;
    }
    let recent = &history[history.len() - window..];
    Some(recent.iter().sum::<f64>() / window as f64)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Government {
    /// No taxes, no transfers
    None,
    Direct(DirectGovernment),
    Representative(RepresentativeGovernment),
}

impl Government {
    pub fn new(config: &GovernmentConfig) -> Self {
        match config.government_type {
            GovernmentType::None => Government::None,
            GovernmentType::Direct => Government::Direct(DirectGovernment::new(
                config.tax_adjustment_frequency,
                config.tax_gamma,
            )),
            GovernmentType::Representative => {
                Government::Representative(RepresentativeGovernment::new(
                    config.tax_adjustment_frequency,
                    config.tax_gamma,
                    config.parliament_seats,
                ))
            }
        }
    }

    pub fn kind(&self) -> GovernmentType {
        match self {
            Government::None => GovernmentType::None,
            Government::Direct(_) => GovernmentType::Direct,
            Government::Representative(_) => GovernmentType::Representative,
        }
    }

    fn treasury(&self) -> Option<&Treasury> {
        match self {
            Government::None => None,
            Government::Direct(g) => Some(&g.treasury),
            Government::Representative(g) => Some(&g.treasury),
        }
    }

    fn treasury_mut(&mut self) -> Option<&mut Treasury> {
        match self {
            Government::None => None,
            Government::Direct(g) => Some(&mut g.treasury),
            Government::Representative(g) => Some(&mut g.treasury),
        }
    }

    /// Decide the tax rate for the coming months
    pub fn compute_policy<R: Rng + ?Sized>(&mut self, inputs: &PolicyInputs, rng: &mut R) {
        match self {
            Government::None => {}
            Government::Direct(g) => g.compute_policy(inputs),
            Government::Representative(g) => g.compute_policy(inputs, rng),
        }
    }

    pub fn collect_tax(&mut self, households: &mut [Household]) -> Result<f64> {
        match self.treasury_mut() {
            Some(t) => t.collect_tax(households),
            None => Ok(0.0),
        }
    }

    pub fn calc_ubi(&mut self, num_households: usize) -> f64 {
        self.treasury_mut()
            .map_or(0.0, |t| t.calc_ubi(num_households))
    }

    pub fn pay_ubi(&mut self, households: &mut [Household]) -> Result<f64> {
        match self.treasury_mut() {
            Some(t) => t.pay_ubi(households),
            None => Ok(0.0),
        }
    }

    pub fn tax_rate(&self) -> f64 {
        self.treasury().map_or(0.0, |t| t.tax_rate)
    }

    pub fn ubi(&self) -> f64 {
        self.treasury().map_or(0.0, |t| t.ubi)
    }

    pub fn money(&self) -> f64 {
        self.treasury().map_or(0.0, |t| t.money)
    }

    /// Seats per income-quintile party, poorest first
    pub fn party_seats(&self) -> Option<[u32; NUM_PARTIES]> {
        match self {
            Government::Representative(g) => Some(g.parliament),
            _ => None,
        }
    }
}
