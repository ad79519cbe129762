//! Firm - producer and employer
//!
//! Firms set their own price and wage from last month's demand and from how
//! long a vacancy stays open. Employment links are changed only through
//! `EconomyWorld`, which updates the household side at the same time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::FirmConfig;
use crate::core::types::{FirmId, HouseholdId};

/// Staffing decision for the coming month
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiringStatus {
    /// One vacancy is open
    Hire,
    #[default]
    Stay,
    /// One employee is laid off
    Fire,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Firm {
    pub id: FirmId,

    /// Balance; stays >= 0 because wages are cut to what the firm can pay
    pub money: f64,

    /// Wage offered to and paid to every employee
    pub wage: f64,

    pub item_price: f64,

    /// Labor cost of one more unit of output
    pub marginal_cost: f64,

    /// Units in stock
    pub num_items: u32,

    /// Units requested by households this month, served or not
    pub demand: u32,

    /// Mirrored by each household's `employer`
    pub employees: Vec<HouseholdId>,

    /// Upper bound on `employees.len()`
    pub capacity: u32,

    /// Consecutive months with an open vacancy
    pub months_hiring: u32,

    /// Consecutive months without an open vacancy
    pub months_staffed: u32,

    pub hiring_status: HiringStatus,

    /// Money kept back from profit payouts
    pub reserve: f64,
}

impl Firm {
    pub fn new(
        id: FirmId,
        money: f64,
        num_items: u32,
        item_price: f64,
        wage: f64,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            money,
            wage,
            item_price,
            marginal_cost: 0.0,
            num_items,
            demand: 0,
            employees: Vec::new(),
            capacity,
            months_hiring: 0,
            months_staffed: 0,
            hiring_status: HiringStatus::Stay,
            reserve: 0.0,
        }
    }

    pub fn num_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn has_capacity(&self) -> bool {
        (self.employees.len() as u32) < self.capacity
    }

    /// Open vacancy with room for one more employee
    pub fn is_hiring(&self) -> bool {
        self.hiring_status == HiringStatus::Hire && self.has_capacity()
    }

    pub fn wage_bill(&self) -> f64 {
        self.wage * self.employees.len() as f64
    }

    /// Monthly output at the current headcount
    pub fn monthly_output(&self, tech_lvl: f64, days_in_month: u32) -> f64 {
        tech_lvl * days_in_month as f64 * self.employees.len() as f64
    }

    /// Marginal cost is the wage bill divided by monthly output. Without
    /// employees it is the cost of the first worker's output.
    pub fn update_marginal_cost(&mut self, tech_lvl: f64, days_in_month: u32) {
        let output = self.monthly_output(tech_lvl, days_in_month);
        self.marginal_cost = if output > 0.0 {
            self.wage_bill() / output
        } else {
            self.wage / (tech_lvl * days_in_month as f64)
        };
    }

    /// Monthly price, wage and staffing decision
    ///
    /// Uses last month's `demand` and the vacancy counters, so it must run
    /// before the goods market resets demand.
    pub fn set_price_and_wage<R: Rng + ?Sized>(
        &mut self,
        config: &FirmConfig,
        days_in_month: u32,
        rng: &mut R,
    ) {
        self.update_wage(config, rng);
        self.update_hiring_status(config);
        self.update_marginal_cost(config.tech_lvl, days_in_month);
        self.update_price(config, rng);
    }

    /// Raise the wage for every month a vacancy stays unfilled; cut it after
    /// a long stretch without any vacancy
    fn update_wage<R: Rng + ?Sized>(&mut self, config: &FirmConfig, rng: &mut R) {
        if self.hiring_status == HiringStatus::Hire {
            self.months_staffed = 0;
            self.wage *= 1.0 + rng.gen_range(0.0..=config.wage_adj_rate);
        } else {
            self.months_staffed += 1;
            if self.months_staffed > config.lo_wage_months {
                self.wage *= 1.0 - rng.gen_range(0.0..=config.wage_adj_rate);
            }
        }
        // A wage deleveraged to zero could never be raised multiplicatively
        self.wage = self.wage.max(config.min_wage);
    }

    fn update_hiring_status(&mut self, config: &FirmConfig) {
        let (lo_items, up_items) = self.inventory_bounds(config);
        let stock = self.num_items as f64;

        if stock < lo_items {
            self.hiring_status = HiringStatus::Hire;
            self.months_hiring += 1;
        } else if stock > up_items {
            self.hiring_status = HiringStatus::Fire;
            self.months_hiring = 0;
        } else {
            self.hiring_status = HiringStatus::Stay;
            self.months_hiring = 0;
        }
    }

    /// Stock is too low below the first bound and too high above the second
    pub fn inventory_bounds(&self, config: &FirmConfig) -> (f64, f64) {
        let demand = self.demand as f64;
        (config.inv_lo * demand, config.inv_up * demand)
    }

    /// Acceptable price band around marginal cost
    pub fn price_bounds(&self, config: &FirmConfig) -> (f64, f64) {
        (
            config.price_lo * self.marginal_cost,
            config.price_up * self.marginal_cost,
        )
    }

    fn update_price<R: Rng + ?Sized>(&mut self, config: &FirmConfig, rng: &mut R) {
        if rng.gen::<f64>() >= config.price_adj_prob {
            return;
        }

        let (lo_items, up_items) = self.inventory_bounds(config);
        let (lo_price, up_price) = self.price_bounds(config);
        let stock = self.num_items as f64;

        if stock < lo_items && self.item_price < up_price {
            self.item_price *= 1.0 + config.price_adj_rate * rng.gen::<f64>();
        } else if stock > up_items && self.item_price > lo_price {
            self.item_price *= 1.0 - config.price_adj_rate * rng.gen::<f64>();
        }
    }

    /// One working day of production
    pub fn produce(&mut self, tech_lvl: f64, days_in_month: u32) -> u32 {
        let produced = (tech_lvl * self.employees.len() as f64).floor() as u32;
        self.num_items += produced;
        self.update_marginal_cost(tech_lvl, days_in_month);
        produced
    }

    /// Sell up to `quantity` units and return the number sold
    ///
    /// The full request counts towards demand even when stock runs short.
    pub fn sell(&mut self, quantity: u32) -> u32 {
        self.demand += quantity;
        let sold = quantity.min(self.num_items);
        self.num_items -= sold;
        self.money += sold as f64 * self.item_price;
        sold
    }

    /// Demand that could not be served from stock
    pub fn record_unmet_demand(&mut self, quantity: u32) {
        self.demand += quantity;
    }

    pub fn reset_demand(&mut self) {
        self.demand = 0;
    }

    /// Forced deleveraging: a firm that cannot cover its wage bill cuts the
    /// wage to what it can pay. Returns true if the wage was cut.
    pub fn cap_wage_to_balance(&mut self) -> bool {
        let n = self.employees.len();
        if n == 0 || self.money >= self.wage_bill() {
            return false;
        }
        self.wage = self.money.max(0.0) / n as f64;
        true
    }

    /// Hold back next month's wage bill plus a buffer of
    /// `buffer_rate × wage bill` and return the rest
    pub fn distributable_profit(&mut self, buffer_rate: f64) -> f64 {
        let wage_bill = self.wage_bill();
        self.reserve = (buffer_rate * wage_bill).min(self.money).max(0.0);
        (self.money - wage_bill - self.reserve).max(0.0)
    }

    pub(crate) fn add_employee(&mut self, household: HouseholdId) {
        if !self.employees.contains(&household) {
            self.employees.push(household);
        }
    }

    pub(crate) fn remove_employee(&mut self, household: HouseholdId) -> bool {
        match self.employees.iter().position(|h| *h == household) {
            Some(pos) => {
                self.employees.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// A hire fills the vacancy
    pub(crate) fn fill_vacancy(&mut self) {
        self.hiring_status = HiringStatus::Stay;
        self.months_hiring = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn firm() -> Firm {
        Firm::new(FirmId(0), 100.0, 10, 1.0, 50.0, 4)
    }

    #[test]
    fn test_sell_records_unmet_demand() {
        let mut f = firm();
        let sold = f.sell(15);
        assert_eq!(sold, 10);
        assert_eq!(f.num_items, 0);
        assert_eq!(f.demand, 15);
        assert!((f.money - 110.0).abs() < 1e-12);
    }

    #[test]
    fn test_produce_scales_with_employees() {
        let mut f = firm();
        f.employees = vec![HouseholdId(1), HouseholdId(2)];
        let produced = f.produce(3.0, 21);
        assert_eq!(produced, 6);
        assert_eq!(f.num_items, 16);
        // 2 × 50 wage bill over 2 × 3 × 21 units
        assert!((f.marginal_cost - 100.0 / 126.0).abs() < 1e-12);
    }

    #[test]
    fn test_marginal_cost_without_employees() {
        let mut f = firm();
        f.update_marginal_cost(3.0, 21);
        assert!((f.marginal_cost - 50.0 / 63.0).abs() < 1e-12);
    }

    #[test]
    fn test_low_stock_opens_vacancy_and_counts_months() {
        let config = FirmConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut f = firm();
        f.demand = 100;
        f.num_items = 5;

        f.set_price_and_wage(&config, 21, &mut rng);
        assert_eq!(f.hiring_status, HiringStatus::Hire);
        assert_eq!(f.months_hiring, 1);

        let wage_before = f.wage;
        f.set_price_and_wage(&config, 21, &mut rng);
        assert_eq!(f.months_hiring, 2);
        assert!(f.wage >= wage_before);

        f.fill_vacancy();
        assert_eq!(f.months_hiring, 0);
        assert_eq!(f.hiring_status, HiringStatus::Stay);
    }

    #[test]
    fn test_overstock_triggers_layoff_decision() {
        let config = FirmConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut f = firm();
        f.demand = 4;
        f.num_items = 40;
        f.set_price_and_wage(&config, 21, &mut rng);
        assert_eq!(f.hiring_status, HiringStatus::Fire);
    }

    #[test]
    fn test_wage_cut_after_long_full_staffing() {
        let config = FirmConfig {
            lo_wage_months: 2,
            ..FirmConfig::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut f = firm();
        f.demand = 10;
        f.num_items = 10;

        for _ in 0..2 {
            f.set_price_and_wage(&config, 21, &mut rng);
        }
        assert_eq!(f.wage, 50.0);
        for _ in 0..5 {
            f.set_price_and_wage(&config, 21, &mut rng);
        }
        assert!(f.wage <= 50.0);
    }

    #[test]
    fn test_cap_wage_to_balance() {
        let mut f = firm();
        f.employees = vec![HouseholdId(1), HouseholdId(2), HouseholdId(3), HouseholdId(4)];
        assert!(f.cap_wage_to_balance());
        assert!((f.wage - 25.0).abs() < 1e-12);
        assert!(!f.cap_wage_to_balance());
    }

    #[test]
    fn test_distributable_profit_keeps_reserve() {
        let mut f = firm();
        f.employees = vec![HouseholdId(1)];
        f.money = 200.0;
        let profit = f.distributable_profit(0.1);
        assert!((f.reserve - 5.0).abs() < 1e-12);
        // 200 less a 50 payroll and the 5 buffer
        assert!((profit - 145.0).abs() < 1e-12);

        // Not even the payroll is covered: nothing to pay out
        f.money = 30.0;
        assert_eq!(f.distributable_profit(0.1), 0.0);
        assert!((f.reserve - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_wage_floor_lifts_deleveraged_wage() {
        let config = FirmConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut f = firm();
        f.employees = vec![HouseholdId(1), HouseholdId(2)];
        f.money = 0.0;
        assert!(f.cap_wage_to_balance());
        assert_eq!(f.wage, 0.0);

        // Short of stock, so the firm wants to hire
        f.demand = 100;
        f.num_items = 0;
        f.set_price_and_wage(&config, 21, &mut rng);
        assert_eq!(f.hiring_status, HiringStatus::Hire);
        assert!(f.wage >= config.min_wage);

        let before = f.wage;
        f.set_price_and_wage(&config, 21, &mut rng);
        assert!(f.wage >= before);
    }

    #[test]
    fn test_capacity_limits_hiring() {
        let mut f = firm();
        f.hiring_status = HiringStatus::Hire;
        assert!(f.is_hiring());
        for i in 0..4 {
            f.add_employee(HouseholdId(i));
        }
        assert!(!f.is_hiring());
        assert!(f.remove_employee(HouseholdId(2)));
        assert!(!f.remove_employee(HouseholdId(2)));
        assert!(f.is_hiring());
    }
}
