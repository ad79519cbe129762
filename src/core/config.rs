//! Simulation configuration with documented constants
//!
//! All magic numbers of the baseline model are collected here with an
//! explanation of what they control. Defaults follow the Lengnick (2013)
//! baseline calibration. Every struct deserializes with `#[serde(default)]`,
//! so a TOML file only needs to name the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EconError, Result};
use crate::core::types::GovernmentType;

/// Top-level configuration for a batch of independent runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Months simulated per run
    pub months: u32,

    /// Number of independent runs stacked by the statistician
    pub runs: u32,

    /// Base seed; run `r` is seeded with `seed + r`
    pub seed: u64,

    /// Execute runs concurrently (each run owns its own world)
    pub parallel: bool,

    /// Working days per month. Production and purchases happen daily.
    pub days_in_month: u32,

    pub government: GovernmentConfig,
    pub firms: FirmConfig,
    pub households: HouseholdConfig,
}

/// Government regime and its voting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernmentConfig {
    pub government_type: GovernmentType,

    /// Months between tax votes (τ). A vote also needs τ months of Gini
    /// history, so the first non-zero tax rate appears in month τ.
    pub tax_adjustment_frequency: u32,

    /// Maximum exponent used by the poorest voter. The richest voter always
    /// uses 0 and therefore proposes a tax rate of 0.
    pub tax_gamma: f64,

    /// Members of parliament sampled each election (representative only)
    pub parliament_seats: u32,
}

/// Firm population and behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmConfig {
    pub num_firms: u32,

    /// Starting balance of every firm
    pub init_money: f64,

    /// Starting inventory of every firm
    pub init_items: u32,

    /// Mean starting price; each firm draws within ±1% of it
    pub init_avg_price: f64,

    /// Mean starting wage; each firm draws within ±1% of it
    pub init_avg_wage: f64,

    /// Probability that a firm reconsiders its price in a month
    pub price_adj_prob: f64,

    /// Maximum relative price change per adjustment
    pub price_adj_rate: f64,

    /// Maximum relative wage change per adjustment
    pub wage_adj_rate: f64,

    /// Consecutive months without a vacancy before the wage is cut
    pub lo_wage_months: u32,

    /// Stock below `inv_lo × demand` is too little
    pub inv_lo: f64,

    /// Stock above `inv_up × demand` is too much
    pub inv_up: f64,

    /// Prices below `price_lo × marginal_cost` are too low
    pub price_lo: f64,

    /// Prices above `price_up × marginal_cost` are too high
    pub price_up: f64,

    /// Items produced per employee per day
    pub tech_lvl: f64,

    /// Lowest wage a firm posts at its monthly decision
    pub min_wage: f64,

    /// Fraction of the monthly wage bill kept back from profit payouts, on
    /// top of the wage bill itself
    pub buffer_rate: f64,

    /// Employee capacity as a multiple of the fair share
    /// `num_households / num_firms`; each firm draws within ±20% of it
    pub capacity_factor: f64,

    /// A firm whose balance falls below `-insolvency_threshold` aborts the run
    pub insolvency_threshold: f64,
}

/// Household population and behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub num_households: u32,

    /// Mean starting savings; each household draws within ±20% of it
    pub init_money: f64,

    /// Fraction of households employed when a run starts
    pub init_employment_rate: f64,

    /// Exponent damping consumption relative to wealth (0 < cr_decay < 1)
    pub cr_decay: f64,

    /// Firms a household buys from
    pub num_vendors: u32,

    /// Probability of looking for a cheaper vendor each month
    pub repl_vend_price_prob: f64,

    /// Probability of replacing a vendor that ran out of stock
    pub repl_vend_inv_prob: f64,

    /// Minimum relative price advantage for switching to a cheaper vendor
    pub lower_vendor_price: f64,

    /// Firms an unemployed household asks for work each month
    pub unemployed_ask_num: u32,

    /// Firms an employed household asks when looking for better pay
    pub employed_ask_num: u32,

    /// Probability that a satisfied employee looks for a better job anyway
    pub repl_employer_prob: f64,

    /// Reservation wage multiplier after a month of fruitless job search
    pub res_wage_unemployed: f64,

    /// Daily purchasing stops once this fraction of the day's plan is met
    pub demand_sat: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            months: 120,
            runs: 1,
            seed: 12345,
            parallel: false,
            days_in_month: 21,
            government: GovernmentConfig::default(),
            firms: FirmConfig::default(),
            households: HouseholdConfig::default(),
        }
    }
}

impl Default for GovernmentConfig {
    fn default() -> Self {
        Self {
            government_type: GovernmentType::None,
            tax_adjustment_frequency: 12,
            tax_gamma: 4.0,
            parliament_seats: 50,
        }
    }
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            num_firms: 100,
            init_money: 200.0,
            init_items: 50,
            init_avg_price: 1.0,
            init_avg_wage: 52.0,
            price_adj_prob: 0.75,
            price_adj_rate: 0.02,
            wage_adj_rate: 0.019,
            lo_wage_months: 24,
            inv_lo: 0.25,
            inv_up: 1.0,
            price_lo: 1.025,
            price_up: 1.15,
            tech_lvl: 3.0,
            min_wage: 1.0,
            buffer_rate: 0.1,
            capacity_factor: 2.0,
            insolvency_threshold: 1e-6,
        }
    }
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            num_households: 1000,
            init_money: 100.0,
            init_employment_rate: 0.9,
            cr_decay: 0.9,
            num_vendors: 7,
            repl_vend_price_prob: 0.25,
            repl_vend_inv_prob: 0.25,
            lower_vendor_price: 0.01,
            unemployed_ask_num: 5,
            employed_ask_num: 1,
            repl_employer_prob: 0.1,
            res_wage_unemployed: 0.9,
            demand_sat: 0.95,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) TOML document on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    ///
    /// Called before any run starts; an invalid configuration never
    /// produces a partial result.
    pub fn validate(&self) -> Result<()> {
        positive("months", self.months)?;
        positive("runs", self.runs)?;
        positive("days_in_month", self.days_in_month)?;
        positive("num_firms", self.firms.num_firms)?;
        positive("num_households", self.households.num_households)?;
        positive(
            "tax_adjustment_frequency",
            self.government.tax_adjustment_frequency,
        )?;
        positive("num_vendors", self.households.num_vendors)?;
        positive("unemployed_ask_num", self.households.unemployed_ask_num)?;

        if !(self.government.tax_gamma.is_finite() && self.government.tax_gamma >= 0.0) {
            return Err(EconError::InvalidConfig(format!(
                "tax_gamma ({}) must be finite and >= 0",
                self.government.tax_gamma
            )));
        }
        if self.government.government_type == GovernmentType::Representative {
            positive("parliament_seats", self.government.parliament_seats)?;
        }

        let probabilities = [
            ("price_adj_prob", self.firms.price_adj_prob),
            ("init_employment_rate", self.households.init_employment_rate),
            ("repl_vend_price_prob", self.households.repl_vend_price_prob),
            ("repl_vend_inv_prob", self.households.repl_vend_inv_prob),
            ("repl_employer_prob", self.households.repl_employer_prob),
            ("demand_sat", self.households.demand_sat),
        ];
        for (name, value) in probabilities {
            unit_interval(name, value)?;
        }

        let rates = [
            ("price_adj_rate", self.firms.price_adj_rate),
            ("wage_adj_rate", self.firms.wage_adj_rate),
            ("buffer_rate", self.firms.buffer_rate),
            ("lower_vendor_price", self.households.lower_vendor_price),
        ];
        for (name, value) in rates {
            unit_interval(name, value)?;
        }

        let positive_reals = [
            ("init_avg_price", self.firms.init_avg_price),
            ("init_avg_wage", self.firms.init_avg_wage),
            ("tech_lvl", self.firms.tech_lvl),
            ("capacity_factor", self.firms.capacity_factor),
            ("cr_decay", self.households.cr_decay),
            ("res_wage_unemployed", self.households.res_wage_unemployed),
        ];
        for (name, value) in positive_reals {
            if !(value.is_finite() && value > 0.0) {
                return Err(EconError::InvalidConfig(format!(
                    "{} ({}) must be finite and > 0",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("firm init_money", self.firms.init_money),
            ("household init_money", self.households.init_money),
            ("insolvency_threshold", self.firms.insolvency_threshold),
            ("min_wage", self.firms.min_wage),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(EconError::InvalidConfig(format!(
                    "{} ({}) must be finite and >= 0",
                    name, value
                )));
            }
        }

        // Bounds must be ordered or firms oscillate between both adjustments
        if !(self.firms.inv_lo >= 0.0 && self.firms.inv_lo <= self.firms.inv_up) {
            return Err(EconError::InvalidConfig(format!(
                "inv_lo ({}) must be within [0, inv_up ({})]",
                self.firms.inv_lo, self.firms.inv_up
            )));
        }
        if !(self.firms.price_lo > 0.0 && self.firms.price_lo <= self.firms.price_up) {
            return Err(EconError::InvalidConfig(format!(
                "price_lo ({}) must be within (0, price_up ({})]",
                self.firms.price_lo, self.firms.price_up
            )));
        }
        if self.households.cr_decay > 1.0 {
            return Err(EconError::InvalidConfig(format!(
                "cr_decay ({}) must be <= 1",
                self.households.cr_decay
            )));
        }
        if self.households.res_wage_unemployed > 1.0 {
            return Err(EconError::InvalidConfig(format!(
                "res_wage_unemployed ({}) must be <= 1",
                self.households.res_wage_unemployed
            )));
        }

        Ok(())
    }

    pub fn num_households(&self) -> usize {
        self.households.num_households as usize
    }

    pub fn num_firms(&self) -> usize {
        self.firms.num_firms as usize
    }
}

fn positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(EconError::InvalidConfig(format!("{} must be > 0", name)));
    }
    Ok(())
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(EconError::InvalidConfig(format!(
            "{} ({}) must be within [0, 1]",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let mut config = SimulationConfig::default();
        config.firms.num_firms = 0;
        assert!(matches!(config.validate(), Err(EconError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.government.tax_adjustment_frequency = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_gamma_rejected() {
        let mut config = SimulationConfig::default();
        config.government.tax_gamma = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_probability_rejected() {
        let mut config = SimulationConfig::default();
        config.households.repl_employer_prob = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_min_wage_rejected() {
        let mut config = SimulationConfig::default();
        config.firms.min_wage = -1.0;
        assert!(config.validate().is_err());
        config.firms.min_wage = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            months = 24
            runs = 3

            [government]
            government_type = "direct"
            tax_gamma = 2.5

            [households]
            num_households = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.months, 24);
        assert_eq!(config.runs, 3);
        assert_eq!(config.government.government_type, GovernmentType::Direct);
        assert_eq!(config.government.tax_gamma, 2.5);
        assert_eq!(config.government.tax_adjustment_frequency, 12);
        assert_eq!(config.households.num_households, 200);
        assert_eq!(config.firms.num_firms, 100);
    }

    #[test]
    fn test_invalid_toml_value_rejected() {
        let result = SimulationConfig::from_toml_str("months = 0");
        assert!(matches!(result, Err(EconError::InvalidConfig(_))));
    }
}
