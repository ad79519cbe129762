//! Initial population of a run

use rand::seq::index;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{FirmId, HouseholdId};
use crate::economy::firm::Firm;
use crate::economy::household::Household;
use crate::economy::world::EconomyWorld;

/// Build the world for one run from the configuration and the run's RNG
///
/// Firms draw price and wage within ±1% of the configured means and a
/// capacity around `capacity_factor` times their fair share of households.
/// Households draw savings within ±20% of the mean, pick their vendors and
/// are spread round-robin over firms at `init_employment_rate`. Each firm's
/// demand is seeded with its starting monthly output so the first pricing
/// decision has something to compare stock against.
pub fn populate_world(config: &SimulationConfig, mut rng: ChaCha8Rng) -> Result<EconomyWorld> {
    let fc = &config.firms;
    let hc = &config.households;
    let num_firms = config.num_firms();
    let num_households = config.num_households();

    let fair_share = num_households as f64 / num_firms as f64;

    let firms: Vec<Firm> = (0..num_firms)
        .map(|i| {
            let price = fc.init_avg_price * (1.0 + rng.gen_range(-0.01..=0.01));
            let wage = fc.init_avg_wage * (1.0 + rng.gen_range(-0.01..=0.01));
            let capacity =
                (fair_share * fc.capacity_factor * rng.gen_range(0.8..=1.2)).round().max(1.0) as u32;
            Firm::new(FirmId(i as u32), fc.init_money, fc.init_items, price, wage, capacity)
        })
        .collect();

    let num_vendors = (hc.num_vendors as usize).min(num_firms);
    let households: Vec<Household> = (0..num_households)
        .map(|i| {
            let money = hc.init_money * rng.gen_range(0.8..=1.2);
            let res_wage = fc.init_avg_wage * rng.gen_range(0.9..=1.0);
            let mut hh = Household::new(HouseholdId(i as u32), money, res_wage);
            hh.vendors = index::sample(&mut rng, num_firms, num_vendors)
                .into_iter()
                .map(|f| FirmId(f as u32))
                .collect();
            hh
        })
        .collect();

    let mut world = EconomyWorld::new(households, firms, rng);

    for i in 0..num_households {
        if world.rng.gen::<f64>() < hc.init_employment_rate {
            world.employ(HouseholdId(i as u32), FirmId((i % num_firms) as u32))?;
        }
    }

    for firm in &mut world.firms {
        firm.demand = firm.monthly_output(fc.tech_lvl, config.days_in_month).floor() as u32;
        firm.update_marginal_cost(fc.tech_lvl, config.days_in_month);
    }

    Ok(world)
}
