//! EconomyWorld - the arena holding every agent of one run
//!
//! Households and firms refer to each other by index. The employment link is
//! stored on both sides (`Household::employer`, `Firm::employees`) and only
//! the matching operations here (`employ`, `hire`, `fire`, `quit`) change it,
//! so the two sides cannot diverge.

use rand_chacha::ChaCha8Rng;

use crate::core::error::{EconError, Result};
use crate::core::types::{FirmId, HouseholdId, Month};
use crate::economy::firm::Firm;
use crate::economy::household::Household;

pub struct EconomyWorld {
    pub households: Vec<Household>,
    pub firms: Vec<Firm>,
    /// Current month of the run
    pub month: Month,
    /// Random number generator (deterministic per run)
    pub rng: ChaCha8Rng,
}

impl EconomyWorld {
    pub fn new(households: Vec<Household>, firms: Vec<Firm>, rng: ChaCha8Rng) -> Self {
        Self {
            households,
            firms,
            month: 0,
            rng,
        }
    }

    pub fn household(&self, id: HouseholdId) -> Result<&Household> {
        self.households
            .get(id.index())
            .ok_or(EconError::UnknownHousehold(id))
    }

    pub fn household_mut(&mut self, id: HouseholdId) -> Result<&mut Household> {
        self.households
            .get_mut(id.index())
            .ok_or(EconError::UnknownHousehold(id))
    }

    pub fn firm(&self, id: FirmId) -> Result<&Firm> {
        self.firms.get(id.index()).ok_or(EconError::UnknownFirm(id))
    }

    pub fn firm_mut(&mut self, id: FirmId) -> Result<&mut Firm> {
        self.firms.get_mut(id.index()).ok_or(EconError::UnknownFirm(id))
    }

    /// Link a household to a firm with free capacity, leaving any previous
    /// employer first. Returns false if the firm is full.
    pub fn employ(&mut self, household: HouseholdId, firm: FirmId) -> Result<bool> {
        if self.household(household)?.employer == Some(firm) {
            return Ok(true);
        }
        if !self.firm(firm)?.has_capacity() {
            return Ok(false);
        }
        self.quit(household)?;

        self.firm_mut(firm)?.add_employee(household);
        self.household_mut(household)?.employer = Some(firm);
        Ok(true)
    }

    /// Fill the firm's open vacancy with this household
    ///
    /// Returns false without changing anything if the firm is not hiring.
    pub fn hire(&mut self, household: HouseholdId, firm: FirmId) -> Result<bool> {
        if !self.firm(firm)?.is_hiring() {
            return Ok(false);
        }
        let hired = self.employ(household, firm)?;
        if hired {
            self.firm_mut(firm)?.fill_vacancy();
        }
        Ok(hired)
    }

    /// Lay off an employee; clears the household's back-reference
    pub fn fire(&mut self, firm: FirmId, household: HouseholdId) -> Result<bool> {
        let removed = self.firm_mut(firm)?.remove_employee(household);
        if removed {
            let hh = self.household_mut(household)?;
            if hh.employer == Some(firm) {
                hh.employer = None;
            }
        }
        Ok(removed)
    }

    /// Household leaves its employer, if any
    pub fn quit(&mut self, household: HouseholdId) -> Result<()> {
        if let Some(employer) = self.household(household)?.employer {
            self.firm_mut(employer)?.remove_employee(household);
            self.household_mut(household)?.employer = None;
        }
        Ok(())
    }

    /// All-or-nothing purchase of `quantity` units
    ///
    /// Rejected (returns 0, nothing changes) when the firm has fewer units in
    /// stock than requested or the household cannot pay for all of them.
    pub fn buy_goods(&mut self, household: HouseholdId, firm: FirmId, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Ok(0);
        }
        let (price, stock) = {
            let f = self.firm(firm)?;
            (f.item_price, f.num_items)
        };
        let cost = quantity as f64 * price;
        if stock < quantity || self.household(household)?.money < cost {
            return Ok(0);
        }

        let sold = self.firm_mut(firm)?.sell(quantity);
        self.household_mut(household)?.money -= sold as f64 * price;
        Ok(sold)
    }

    /// Move `amount` from a firm to one of its employees as wage income
    pub fn pay_wage(&mut self, firm: FirmId, household: HouseholdId, amount: f64) -> Result<()> {
        self.household_mut(household)?.receive_wage(amount)?;
        self.firm_mut(firm)?.money -= amount;
        Ok(())
    }

    pub fn household_money(&self) -> f64 {
        self.households.iter().map(|h| h.money).sum()
    }

    pub fn firm_money(&self) -> f64 {
        self.firms.iter().map(|f| f.money).sum()
    }

    /// Money held by households and firms together
    pub fn total_money(&self) -> f64 {
        self.household_money() + self.firm_money()
    }

    pub fn employment_rate(&self) -> f64 {
        if self.households.is_empty() {
            return 0.0;
        }
        let employed = self.households.iter().filter(|h| h.is_employed()).count();
        employed as f64 / self.households.len() as f64
    }

    /// Check the employment back-references on both sides agree
    pub fn employment_is_consistent(&self) -> bool {
        let firms_agree = self.firms.iter().all(|f| {
            f.employees.len() as u32 <= f.capacity
                && f.employees.iter().all(|h| {
                    self.households
                        .get(h.index())
                        .map(|hh| hh.employer == Some(f.id))
                        .unwrap_or(false)
                })
        });
        let households_agree = self.households.iter().all(|h| match h.employer {
            Some(fid) => self
                .firms
                .get(fid.index())
                .map(|f| f.employees.contains(&h.id))
                .unwrap_or(false),
            None => true,
        });
        firms_agree && households_agree
    }
}
