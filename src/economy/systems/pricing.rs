//! Firm price, wage and staffing decisions

use crate::core::config::SimulationConfig;
use crate::economy::world::EconomyWorld;

/// Every firm revises wage, hiring status and price from last month's demand
pub fn update_firm_decisions(world: &mut EconomyWorld, config: &SimulationConfig) {
    let EconomyWorld { firms, rng, .. } = world;
    for firm in firms.iter_mut() {
        firm.set_price_and_wage(&config.firms, config.days_in_month, rng);
    }
}
