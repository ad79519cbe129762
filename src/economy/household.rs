//! Household - consumer, worker and voter
//!
//! A household owns only its own balance sheet. Anything that touches a firm
//! as well (taking a job, buying goods) goes through `EconomyWorld`, which
//! keeps both sides of the relationship in step.

use serde::{Deserialize, Serialize};

use crate::core::error::{EconError, Result};
use crate::core::types::{FirmId, HouseholdId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,

    /// Liquid savings, never negative
    pub money: f64,

    /// Wage and UBI received this month, net of tax; profit shares are
    /// savings, not income
    pub income: f64,

    /// Current employer; mirrored by the firm's employee list
    pub employer: Option<FirmId>,

    /// Minimum wage the household accepts to take or keep a job
    pub res_wage: f64,

    /// Firms the household buys from (type A connections)
    pub vendors: Vec<FirmId>,

    /// Vendors that could not serve the full request last month
    pub low_stock_vendors: Vec<FirmId>,

    /// Units the household intends to buy this month
    pub planned_demand: u32,
}

impl Household {
    pub fn new(id: HouseholdId, money: f64, res_wage: f64) -> Self {
        Self {
            id,
            money,
            income: 0.0,
            employer: None,
            res_wage,
            vendors: Vec::new(),
            low_stock_vendors: Vec::new(),
            planned_demand: 0,
        }
    }

    pub fn is_employed(&self) -> bool {
        self.employer.is_some()
    }

    /// Income is a monthly flow
    pub fn start_month(&mut self) {
        self.income = 0.0;
    }

    /// Pay `income × rate` in tax and return the amount paid
    ///
    /// Rates outside [0, 1] are rejected rather than clamped. The tax comes
    /// out of this month's income, which is already part of `money`.
    pub fn pay_tax(&mut self, rate: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(EconError::InvalidTaxRate(rate));
        }
        let tax = self.income.max(0.0) * rate;
        self.income -= tax;
        self.money -= tax;
        Ok(tax)
    }

    pub fn receive_ubi(&mut self, amount: f64) -> Result<()> {
        self.credit(amount)
    }

    pub fn receive_wage(&mut self, amount: f64) -> Result<()> {
        self.credit(amount)
    }

    /// A profit share adds to savings only, so it is neither taxed nor
    /// counted in income statistics
    pub fn receive_profit(&mut self, amount: f64) -> Result<()> {
        check_transfer(amount)?;
        self.money += amount;
        Ok(())
    }

    fn credit(&mut self, amount: f64) -> Result<()> {
        check_transfer(amount)?;
        self.money += amount;
        self.income += amount;
        Ok(())
    }

    /// Monthly consumption plan given the mean price of the household's vendors
    ///
    /// Spending grows sub-linearly with wealth: `(money / price)^cr_decay`,
    /// capped at what the household can actually afford.
    pub fn plan_demand(&mut self, mean_price: f64, cr_decay: f64) -> u32 {
        self.planned_demand = if mean_price > 0.0 && self.money > 0.0 {
            let affordable = self.money / mean_price;
            affordable.powf(cr_decay).min(affordable).floor() as u32
        } else {
            0
        };
        self.planned_demand
    }

    /// Employed households never accept less than what they are paid now
    pub fn raise_reservation_wage(&mut self, wage: f64) {
        if wage > self.res_wage {
            self.res_wage = wage;
        }
    }

    /// Lower expectations after a month without finding work
    pub fn lower_reservation_wage(&mut self, factor: f64) {
        self.res_wage *= factor;
    }

    pub fn note_low_stock(&mut self, firm: FirmId) {
        if !self.low_stock_vendors.contains(&firm) {
            self.low_stock_vendors.push(firm);
        }
    }

    pub fn replace_vendor(&mut self, old: FirmId, new: FirmId) {
        if let Some(slot) = self.vendors.iter_mut().find(|v| **v == old) {
            *slot = new;
        }
        self.low_stock_vendors.retain(|v| *v != old);
    }
}

fn check_transfer(amount: f64) -> Result<()> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(EconError::InvalidTransfer(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn household() -> Household {
        Household::new(HouseholdId(0), 100.0, 50.0)
    }

    #[test]
    fn test_pay_tax_takes_share_of_income() {
        let mut hh = household();
        hh.receive_wage(60.0).unwrap();

        let tax = hh.pay_tax(0.25).unwrap();

        assert!((tax - 15.0).abs() < 1e-12);
        assert!((hh.income - 45.0).abs() < 1e-12);
        assert!((hh.money - 145.0).abs() < 1e-12);
    }

    #[test]
    fn test_pay_tax_rejects_out_of_range_rate() {
        let mut hh = household();
        hh.receive_wage(10.0).unwrap();
        assert!(matches!(hh.pay_tax(1.5), Err(EconError::InvalidTaxRate(_))));
        assert!(hh.pay_tax(-0.1).is_err());
        assert_eq!(hh.money, 110.0);
    }

    #[test]
    fn test_unemployed_household_pays_no_tax() {
        let mut hh = household();
        assert_eq!(hh.pay_tax(0.5).unwrap(), 0.0);
        assert_eq!(hh.money, 100.0);
    }

    #[test]
    fn test_ubi_counts_as_income() {
        let mut hh = household();
        hh.receive_ubi(7.5).unwrap();
        assert_eq!(hh.income, 7.5);
        assert_eq!(hh.money, 107.5);
        assert!(matches!(hh.receive_ubi(-1.0), Err(EconError::InvalidTransfer(_))));
    }

    #[test]
    fn test_profit_share_is_savings_not_income() {
        let mut hh = household();
        hh.receive_profit(12.5).unwrap();
        assert_eq!(hh.money, 112.5);
        assert_eq!(hh.income, 0.0);
        // Nothing to tax for an unemployed household
        assert_eq!(hh.pay_tax(0.5).unwrap(), 0.0);

        assert!(matches!(hh.receive_profit(-1.0), Err(EconError::InvalidTransfer(_))));
        assert!(hh.receive_profit(f64::NAN).is_err());
        assert!(hh.receive_profit(f64::INFINITY).is_err());
        assert_eq!(hh.money, 112.5);
    }

    #[test]
    fn test_plan_demand_is_sublinear_in_wealth() {
        let mut hh = household();
        let planned = hh.plan_demand(1.0, 0.9);
        // 100^0.9 ≈ 63.1
        assert_eq!(planned, 63);

        hh.money = 0.5;
        // Below one unit the cap at affordability applies
        assert_eq!(hh.plan_demand(1.0, 0.9), 0);

        hh.money = 100.0;
        assert_eq!(hh.plan_demand(0.0, 0.9), 0);
    }

    #[test]
    fn test_reservation_wage_dynamics() {
        let mut hh = household();
        hh.raise_reservation_wage(40.0);
        assert_eq!(hh.res_wage, 50.0);
        hh.raise_reservation_wage(55.0);
        assert_eq!(hh.res_wage, 55.0);
        hh.lower_reservation_wage(0.9);
        assert!((hh.res_wage - 49.5).abs() < 1e-12);
    }

    #[test]
    fn test_replace_vendor_keeps_slot() {
        let mut hh = household();
        hh.vendors = vec![FirmId(1), FirmId(2), FirmId(3)];
        hh.note_low_stock(FirmId(2));
        hh.note_low_stock(FirmId(2));
        assert_eq!(hh.low_stock_vendors.len(), 1);

        hh.replace_vendor(FirmId(2), FirmId(9));
        assert_eq!(hh.vendors, vec![FirmId(1), FirmId(9), FirmId(3)]);
        assert!(hh.low_stock_vendors.is_empty());
    }
}
