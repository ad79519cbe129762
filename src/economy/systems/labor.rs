//! Labor market: layoffs and job search

use ordered_float::OrderedFloat;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::core::types::{FirmId, HouseholdId};
use crate::economy::firm::HiringStatus;
use crate::economy::world::EconomyWorld;

/// Firms that decided to shrink lay off one random employee each
pub fn run_layoffs(world: &mut EconomyWorld) -> Result<usize> {
    let mut fired = 0;
    for i in 0..world.firms.len() {
        if world.firms[i].hiring_status != HiringStatus::Fire {
            continue;
        }
        let firm_id = world.firms[i].id;
        let victim = world.firms[i].employees.choose(&mut world.rng).copied();
        if let Some(household) = victim {
            if world.fire(firm_id, household)? {
                fired += 1;
            }
        }
        world.firms[i].hiring_status = HiringStatus::Stay;
    }
    Ok(fired)
}

/// Every household (in random order) considers its employment
pub fn run_job_search(world: &mut EconomyWorld, config: &SimulationConfig) -> Result<usize> {
    let mut order: Vec<HouseholdId> = world.households.iter().map(|h| h.id).collect();
    order.shuffle(&mut world.rng);

    let mut moves = 0;
    for household in order {
        if decide_job_search(world, household, config)? {
            moves += 1;
        }
    }
    Ok(moves)
}

/// One household's job search for the month
///
/// Unemployed households ask `unemployed_ask_num` random firms. Employed
/// households search when paid below their reservation wage, or with
/// probability `repl_employer_prob` otherwise, and ask `employed_ask_num`
/// firms. The best hiring offer at or above the reservation wage (and above
/// the current wage, for the employed) is accepted. An unemployed household
/// that finds nothing lowers its reservation wage.
///
/// Returns true if the household took a new job.
pub fn decide_job_search(
    world: &mut EconomyWorld,
    household: HouseholdId,
    config: &SimulationConfig,
) -> Result<bool> {
    let hc = &config.households;
    let (employer, res_wage) = {
        let hh = world.household(household)?;
        (hh.employer, hh.res_wage)
    };

    let (asks, current_wage) = match employer {
        None => (hc.unemployed_ask_num, None),
        Some(firm) => {
            let wage = world.firm(firm)?.wage;
            let underpaid = wage < res_wage;
            if !underpaid && world.rng.gen::<f64>() >= hc.repl_employer_prob {
                return Ok(false);
            }
            (hc.employed_ask_num, Some(wage))
        }
    };

    let num_firms = world.firms.len();
    if num_firms == 0 {
        return Ok(false);
    }

    let mut best: Option<(FirmId, f64)> = None;
    for _ in 0..asks {
        let candidate = &world.firms[world.rng.gen_range(0..num_firms)];
        if Some(candidate.id) == employer || !candidate.is_hiring() {
            continue;
        }
        if candidate.wage < res_wage {
            continue;
        }
        if current_wage.map_or(false, |w| candidate.wage <= w) {
            continue;
        }
        if best.map_or(true, |(_, w)| OrderedFloat(candidate.wage) > OrderedFloat(w)) {
            best = Some((candidate.id, candidate.wage));
        }
    }

    match best {
        Some((firm, _)) => world.hire(household, firm),
        None => {
            if employer.is_none() {
                world
                    .household_mut(household)?
                    .lower_reservation_wage(hc.res_wage_unemployed);
            }
            Ok(false)
        }
    }
}
