//! End-of-month settlement: wages, profits and solvency

use tracing::debug;

use crate::core::error::{EconError, Result};
use crate::core::types::HouseholdId;
use crate::economy::world::EconomyWorld;

/// Every firm pays its wage to each employee
///
/// A firm that cannot cover the full bill cuts its wage first, so wages are
/// always paid in full at the (possibly reduced) rate. Returns the total
/// paid.
pub fn pay_wages(world: &mut EconomyWorld) -> Result<f64> {
    let mut paid = 0.0;
    for i in 0..world.firms.len() {
        let firm = &mut world.firms[i];
        if firm.cap_wage_to_balance() {
            debug!("{} cut wage to {:.3} to cover payroll", firm.id, firm.wage);
        }
        let firm_id = firm.id;
        let wage = firm.wage;
        let employees: Vec<HouseholdId> = firm.employees.clone();
        for household in employees {
            world.pay_wage(firm_id, household, wage)?;
            paid += wage;
        }
    }
    Ok(paid)
}

/// Firms pay out everything above next month's payroll and their reserve to
/// households in proportion to household savings
///
/// Shares come from a snapshot taken before any payout, so the order of
/// payment does not matter. If no household has positive savings the profit
/// is split equally. Returns the total distributed.
pub fn distribute_profits(world: &mut EconomyWorld, buffer_rate: f64) -> Result<f64> {
    if world.households.is_empty() {
        return Ok(0.0);
    }

    let mut profit = 0.0;
    for firm in &mut world.firms {
        let payout = firm.distributable_profit(buffer_rate);
        firm.money -= payout;
        profit += payout;
    }
    if profit <= 0.0 {
        return Ok(0.0);
    }

    let weights: Vec<f64> = world.households.iter().map(|h| h.money.max(0.0)).collect();
    let total: f64 = weights.iter().sum();
    let n = world.households.len() as f64;

    for (hh, weight) in world.households.iter_mut().zip(weights) {
        let share = if total > 0.0 { weight / total } else { 1.0 / n };
        hh.receive_profit(profit * share)?;
    }
    Ok(profit)
}

/// Employed households will not accept less than they are paid now
pub fn update_reservation_wages(world: &mut EconomyWorld) {
    let EconomyWorld {
        households, firms, ..
    } = world;
    for hh in households.iter_mut() {
        if let Some(wage) = hh.employer.and_then(|f| firms.get(f.index())).map(|f| f.wage) {
            hh.raise_reservation_wage(wage);
        }
    }
}

/// Fail the run if any firm's balance went negative beyond rounding error
pub fn check_solvency(world: &EconomyWorld, threshold: f64) -> Result<()> {
    for firm in &world.firms {
        if firm.money.is_nan() || firm.money < -threshold {
            return Err(EconError::FirmInsolvent {
                firm: firm.id,
                money: firm.money,
            });
        }
    }
    Ok(())
}
