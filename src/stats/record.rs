//! Per-run result record
//!
//! A run appends one value per `Metric` every month and a snapshot of each
//! `Distribution` when it ends. The finished record is immutable input to the
//! `Statistician`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{EconError, Result};
use crate::core::types::{GovernmentType, Month};
use crate::economy::firm::Firm;
use crate::economy::world::EconomyWorld;
use crate::government::{Government, NUM_PARTIES};
use crate::stats::inequality::{gini, hoover, mean};

/// Aggregate series recorded once per month
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    FirmMoneySum,
    FirmMoneyAvg,
    FirmNumItems,
    FirmItemPrice,
    FirmMarginalCost,
    FirmDemand,
    FirmNumEmployees,
    FirmWage,
    FirmMonthsHiring,
    HouseholdMoneySum,
    HouseholdMoneyAvg,
    /// Share of households with an employer
    HouseholdEmployment,
    HouseholdResWage,
    HouseholdIncome,
    GiniIncome,
    GiniMoney,
    HooverMoney,
    TaxRate,
    Ubi,
}

impl Metric {
    pub const ALL: [Metric; 19] = [
        Metric::FirmMoneySum,
        Metric::FirmMoneyAvg,
        Metric::FirmNumItems,
        Metric::FirmItemPrice,
        Metric::FirmMarginalCost,
        Metric::FirmDemand,
        Metric::FirmNumEmployees,
        Metric::FirmWage,
        Metric::FirmMonthsHiring,
        Metric::HouseholdMoneySum,
        Metric::HouseholdMoneyAvg,
        Metric::HouseholdEmployment,
        Metric::HouseholdResWage,
        Metric::HouseholdIncome,
        Metric::GiniIncome,
        Metric::GiniMoney,
        Metric::HooverMoney,
        Metric::TaxRate,
        Metric::Ubi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::FirmMoneySum => "firm_money_sum",
            Metric::FirmMoneyAvg => "firm_money_avg",
            Metric::FirmNumItems => "firm_num_items",
            Metric::FirmItemPrice => "firm_item_price",
            Metric::FirmMarginalCost => "firm_marginal_cost",
            Metric::FirmDemand => "firm_demand",
            Metric::FirmNumEmployees => "firm_num_employees",
            Metric::FirmWage => "firm_wage",
            Metric::FirmMonthsHiring => "firm_months_hiring",
            Metric::HouseholdMoneySum => "household_money_sum",
            Metric::HouseholdMoneyAvg => "household_money_avg",
            Metric::HouseholdEmployment => "household_employment",
            Metric::HouseholdResWage => "household_res_wage",
            Metric::HouseholdIncome => "household_income",
            Metric::GiniIncome => "gini_income",
            Metric::GiniMoney => "gini_money",
            Metric::HooverMoney => "hoover_money",
            Metric::TaxRate => "tax_rate",
            Metric::Ubi => "ubi",
        }
    }
}

/// Per-agent values snapshotted at the end of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    FirmMoney,
    FirmWage,
    HouseholdMoney,
    HouseholdIncome,
}

impl Distribution {
    pub const ALL: [Distribution; 4] = [
        Distribution::FirmMoney,
        Distribution::FirmWage,
        Distribution::HouseholdMoney,
        Distribution::HouseholdIncome,
    ];

    /// True for distributions over firms, false for households
    pub fn is_firm(&self) -> bool {
        matches!(self, Distribution::FirmMoney | Distribution::FirmWage)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub run: u32,
    pub series: BTreeMap<Metric, Vec<f64>>,
    pub distributions: BTreeMap<Distribution, Vec<f64>>,
    /// Seats per party, `NUM_PARTIES` values per month, for representative
    /// governments only
    pub parties: Option<Vec<f64>>,
}

impl RunRecord {
    pub fn new(run: u32, government: GovernmentType) -> Self {
        Self {
            run,
            series: Metric::ALL.iter().map(|m| (*m, Vec::new())).collect(),
            distributions: BTreeMap::new(),
            parties: (government == GovernmentType::Representative).then(Vec::new),
        }
    }

    pub fn months_recorded(&self) -> usize {
        self.series.get(&Metric::GiniIncome).map_or(0, |s| s.len())
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        self.series.get(&metric).map(|s| s.as_slice()).unwrap_or(&[])
    }

    pub fn latest(&self, metric: Metric) -> Option<f64> {
        self.series(metric).last().copied()
    }

    /// Append this month's aggregates
    ///
    /// Months must be recorded in order without gaps.
    pub fn record_month(
        &mut self,
        month: Month,
        world: &EconomyWorld,
        government: &Government,
    ) -> Result<()> {
        let expected = self.months_recorded();
        if month as usize != expected {
            return Err(EconError::ShapeMismatch {
                what: format!("run {} month index", self.run),
                expected,
                actual: month as usize,
            });
        }

        let firm_money: Vec<f64> = world.firms.iter().map(|f| f.money).collect();
        let hh_money: Vec<f64> = world.households.iter().map(|h| h.money).collect();
        let hh_income: Vec<f64> = world.households.iter().map(|h| h.income).collect();
        let hh_res_wage: Vec<f64> = world.households.iter().map(|h| h.res_wage).collect();

        let values: [(Metric, f64); 19] = [
            (Metric::FirmMoneySum, firm_money.iter().sum()),
            (Metric::FirmMoneyAvg, mean(&firm_money)),
            (Metric::FirmNumItems, firm_mean(world, |f| f.num_items as f64)),
            (Metric::FirmItemPrice, firm_mean(world, |f| f.item_price)),
            (Metric::FirmMarginalCost, firm_mean(world, |f| f.marginal_cost)),
            (Metric::FirmDemand, firm_mean(world, |f| f.demand as f64)),
            (Metric::FirmNumEmployees, firm_mean(world, |f| f.num_employees() as f64)),
            (Metric::FirmWage, firm_mean(world, |f| f.wage)),
            (Metric::FirmMonthsHiring, firm_mean(world, |f| f.months_hiring as f64)),
            (Metric::HouseholdMoneySum, hh_money.iter().sum()),
            (Metric::HouseholdMoneyAvg, mean(&hh_money)),
            (Metric::HouseholdEmployment, world.employment_rate()),
            (Metric::HouseholdResWage, mean(&hh_res_wage)),
            (Metric::HouseholdIncome, mean(&hh_income)),
            (Metric::GiniIncome, gini(&hh_income)),
            (Metric::GiniMoney, gini(&hh_money)),
            (Metric::HooverMoney, hoover(&hh_money)),
            (Metric::TaxRate, government.tax_rate()),
            (Metric::Ubi, government.ubi()),
        ];
        for (metric, value) in values {
            self.series.entry(metric).or_default().push(value);
        }

        if let Some(parties) = &mut self.parties {
            let seats = government.party_seats().unwrap_or([0; NUM_PARTIES]);
            parties.extend(seats.iter().map(|s| *s as f64));
        }
        Ok(())
    }

    /// Snapshot the end-of-run distributions
    pub fn record_distributions(&mut self, world: &EconomyWorld) {
        let snapshot: [(Distribution, Vec<f64>); 4] = [
            (Distribution::FirmMoney, world.firms.iter().map(|f| f.money).collect()),
            (Distribution::FirmWage, world.firms.iter().map(|f| f.wage).collect()),
            (Distribution::HouseholdMoney, world.households.iter().map(|h| h.money).collect()),
            (Distribution::HouseholdIncome, world.households.iter().map(|h| h.income).collect()),
        ];
        self.distributions = snapshot.into_iter().collect();
    }
}

fn firm_mean(world: &EconomyWorld, value: impl Fn(&Firm) -> f64) -> f64 {
    mean(&world.firms.iter().map(value).collect::<Vec<_>>())
}
