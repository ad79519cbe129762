//! Goods market: vendor networks, consumption plans and daily trading

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{EconError, Result};
use crate::core::types::{FirmId, HouseholdId};
use crate::economy::firm::Firm;
use crate::economy::world::EconomyWorld;

/// Households revise their vendor network, then forget last month's
/// shortages
pub fn update_vendors(world: &mut EconomyWorld, config: &SimulationConfig) -> Result<()> {
    let hc = &config.households;
    for i in 0..world.households.len() {
        let id = world.households[i].id;
        if world.rng.gen::<f64>() < hc.repl_vend_price_prob {
            find_cheaper_vendor(world, id, hc.lower_vendor_price)?;
        }
        if world.rng.gen::<f64>() < hc.repl_vend_inv_prob {
            find_stocked_vendor(world, id)?;
        }
    }
    for hh in &mut world.households {
        hh.low_stock_vendors.clear();
    }
    Ok(())
}

/// Compare one random vendor against a firm outside the network, drawn with
/// probability proportional to its headcount. The newcomer replaces the
/// vendor if it is cheaper by more than `min_saving`.
pub fn find_cheaper_vendor(
    world: &mut EconomyWorld,
    household: HouseholdId,
    min_saving: f64,
) -> Result<bool> {
    let EconomyWorld {
        households,
        firms,
        rng,
        ..
    } = world;
    let hh = households
        .get_mut(household.index())
        .ok_or(EconError::UnknownHousehold(household))?;
    if hh.vendors.is_empty() {
        return Ok(false);
    }

    let candidates: Vec<&Firm> = firms.iter().filter(|f| !hh.vendors.contains(&f.id)).collect();
    if candidates.is_empty() {
        return Ok(false);
    }
    // Nobody employed anywhere: fall back to a uniform draw
    let pick = match WeightedIndex::<usize>::new(candidates.iter().map(|f| f.num_employees())) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..candidates.len()),
    };
    let newcomer = candidates[pick];

    let old = hh.vendors[rng.gen_range(0..hh.vendors.len())];
    let old_price = firms
        .get(old.index())
        .ok_or(EconError::UnknownFirm(old))?
        .item_price;

    if newcomer.item_price < old_price * (1.0 - min_saving) {
        hh.replace_vendor(old, newcomer.id);
        return Ok(true);
    }
    Ok(false)
}

/// Replace one vendor that ran out of stock last month with a random firm
/// outside the network
pub fn find_stocked_vendor(world: &mut EconomyWorld, household: HouseholdId) -> Result<bool> {
    let EconomyWorld {
        households,
        firms,
        rng,
        ..
    } = world;
    let hh = households
        .get_mut(household.index())
        .ok_or(EconError::UnknownHousehold(household))?;

    let Some(&old) = hh.low_stock_vendors.choose(rng) else {
        return Ok(false);
    };
    let outsiders: Vec<FirmId> = firms
        .iter()
        .map(|f| f.id)
        .filter(|id| !hh.vendors.contains(id))
        .collect();
    let Some(&new) = outsiders.choose(rng) else {
        return Ok(false);
    };

    hh.replace_vendor(old, new);
    Ok(true)
}

/// Every household plans this month's consumption from its vendors' mean
/// price
pub fn plan_demand(world: &mut EconomyWorld, config: &SimulationConfig) {
    let EconomyWorld {
        households, firms, ..
    } = world;
    for hh in households.iter_mut() {
        let prices: Vec<f64> = hh
            .vendors
            .iter()
            .filter_map(|v| firms.get(v.index()))
            .map(|f| f.item_price)
            .collect();
        let mean_price = if prices.is_empty() {
            0.0
        } else {
            prices.iter().sum::<f64>() / prices.len() as f64
        };
        hh.plan_demand(mean_price, config.households.cr_decay);
    }
}

/// Units of a monthly plan that fall on `day`
///
/// The shares are whole units and add up to `planned` over the month.
pub fn daily_share(planned: u32, day: u32, days_in_month: u32) -> u32 {
    let planned = planned as u64;
    let days = days_in_month.max(1) as u64;
    let day = day as u64;
    ((day + 1) * planned / days - day * planned / days) as u32
}

/// Trade for a whole month
///
/// Each day firms produce first, then households (in an order shuffled once
/// per month) buy their daily share. Returns the number of units sold.
pub fn run_goods_market(world: &mut EconomyWorld, config: &SimulationConfig) -> Result<u64> {
    for firm in &mut world.firms {
        firm.reset_demand();
    }

    let mut order: Vec<HouseholdId> = world.households.iter().map(|h| h.id).collect();
    order.shuffle(&mut world.rng);

    let days = config.days_in_month.max(1);
    let mut sold = 0u64;
    for day in 0..days {
        for firm in &mut world.firms {
            firm.produce(config.firms.tech_lvl, days);
        }
        for &household in &order {
            let planned = world.household(household)?.planned_demand;
            let daily = daily_share(planned, day, days);
            sold += buy_for_day(world, household, daily, config.households.demand_sat)? as u64;
        }
    }
    Ok(sold)
}

/// Visit vendors in random order until the day's demand is mostly met
///
/// A vendor that cannot cover the request sells what it has; the shortfall
/// counts towards its demand and the household remembers it as low on stock.
pub fn buy_for_day(
    world: &mut EconomyWorld,
    household: HouseholdId,
    daily: u32,
    demand_sat: f64,
) -> Result<u32> {
    let mut vendors = world.household(household)?.vendors.clone();
    vendors.shuffle(&mut world.rng);

    let satisfied = (1.0 - demand_sat) * daily as f64;
    let mut remaining = daily;
    let mut bought = 0;

    for firm in vendors {
        if remaining as f64 <= satisfied {
            break;
        }
        let (price, stock) = {
            let f = world.firm(firm)?;
            (f.item_price, f.num_items)
        };
        let money = world.household(household)?.money;

        let mut ask = if price > 0.0 {
            remaining.min((money / price).floor() as u32)
        } else {
            remaining
        };
        if ask > 0 && ask as f64 * price > money {
            ask -= 1;
        }
        if ask == 0 {
            break;
        }

        let available = ask.min(stock);
        if available < ask {
            world.firm_mut(firm)?.record_unmet_demand(ask - available);
            world.household_mut(household)?.note_low_stock(firm);
        }
        let got = world.buy_goods(household, firm, available)?;
        remaining -= got;
        bought += got;
    }
    Ok(bought)
}
