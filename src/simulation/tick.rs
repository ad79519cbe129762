//! Monthly tick - the fixed order of one month's effects
//!
//! Every run calls the systems in the same order each month so that
//! cross-run statistics compare like with like.

use tracing::{debug, warn};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::economy::systems;
use crate::economy::world::EconomyWorld;
use crate::government::{Government, PolicyInputs};
use crate::stats::record::{Metric, RunRecord};

/// Relative drift of total money tolerated before warning
const CONSERVATION_TOLERANCE: f64 = 1e-9;

/// Counts of what happened during one month
#[derive(Debug, Clone, Default)]
pub struct MonthSummary {
    pub layoffs: usize,
    pub job_moves: usize,
    pub units_sold: u64,
    pub wages_paid: f64,
    pub profits_paid: f64,
    pub tax_collected: f64,
    pub ubi_paid: f64,
}

/// Run one month
///
/// 1. Reset monthly household income
/// 2. Firms set wage, hiring status and price from last month's demand
/// 3. Labor market: layoffs, then job search in random household order
/// 4. Goods market: vendor switching, demand planning, daily production and purchases
/// 5. Settlement: wages, reserves and profit payouts, reservation wages, solvency check
/// 6. Government collects tax on this month's income
/// 7. Government updates its policy from the income-Gini history
/// 8. Tax receipts are paid out as equal UBI
/// 9. The month's statistics are appended to the run record
pub fn run_month_tick(
    world: &mut EconomyWorld,
    government: &mut Government,
    record: &mut RunRecord,
    config: &SimulationConfig,
) -> Result<MonthSummary> {
    let month = world.month;
    let money_at_start = world.total_money() + government.money();
    let mut summary = MonthSummary::default();

    // 1. Income is a monthly flow
    for hh in &mut world.households {
        hh.start_month();
    }

    // 2. Pricing
    systems::update_firm_decisions(world, config);

    // 3. Labor market
    summary.layoffs = systems::run_layoffs(world)?;
    summary.job_moves = systems::run_job_search(world, config)?;

    // 4. Goods market
    systems::update_vendors(world, config)?;
    systems::plan_demand(world, config);
    summary.units_sold = systems::run_goods_market(world, config)?;

    // 5. Settlement
    summary.wages_paid = systems::pay_wages(world)?;
    summary.profits_paid = systems::distribute_profits(world, config.firms.buffer_rate)?;
    systems::update_reservation_wages(world);
    systems::check_solvency(world, config.firms.insolvency_threshold)?;

    // 6. Taxation
    summary.tax_collected = government.collect_tax(&mut world.households)?;

    // 7. Policy
    let inputs = PolicyInputs {
        month,
        gini_history: record.series(Metric::GiniIncome),
        households: &world.households,
    };
    government.compute_policy(&inputs, &mut world.rng);

    // 8. Redistribution
    government.calc_ubi(world.households.len());
    summary.ubi_paid = government.pay_ubi(&mut world.households)?;

    let money_at_end = world.total_money() + government.money();
    let drift = money_at_end - money_at_start;
    if drift.abs() > CONSERVATION_TOLERANCE * money_at_start.abs().max(1.0) {
        warn!("Month {}: total money drifted by {:.3e}", month, drift);
    }

    // 9. Statistics
    record.record_month(month, world, government)?;

    debug!(
        "Month {}: employment {:.3}, sold {}, tax {:.4}, ubi {:.3}, gini {:.4}",
        month,
        world.employment_rate(),
        summary.units_sold,
        government.tax_rate(),
        government.ubi(),
        record.latest(Metric::GiniIncome).unwrap_or(0.0),
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GovernmentType;
    use crate::economy::systems::populate_world;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(government: GovernmentType) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.firms.num_firms = 10;
        config.households.num_households = 100;
        config.government.government_type = government;
        config.government.tax_adjustment_frequency = 2;
        config
    }

    #[test]
    fn test_tick_records_one_month() {
        let config = config(GovernmentType::Direct);
        let mut world = populate_world(&config, ChaCha8Rng::seed_from_u64(1)).unwrap();
        let mut government = Government::new(&config.government);
        let mut record = RunRecord::new(0, GovernmentType::Direct);

        run_month_tick(&mut world, &mut government, &mut record, &config).unwrap();

        assert_eq!(record.months_recorded(), 1);
        assert_eq!(government.money(), 0.0);
        assert!(world.employment_is_consistent());
    }

    #[test]
    fn test_tick_conserves_money() {
        let config = config(GovernmentType::Direct);
        let mut world = populate_world(&config, ChaCha8Rng::seed_from_u64(2)).unwrap();
        let mut government = Government::new(&config.government);
        let mut record = RunRecord::new(0, GovernmentType::Direct);
        let before = world.total_money();

        for month in 0..6 {
            world.month = month;
            run_month_tick(&mut world, &mut government, &mut record, &config).unwrap();
        }

        let after = world.total_money() + government.money();
        assert!((after - before).abs() < 1e-6 * before);
        // Gini history is long enough by now for a vote
        assert!(record.series(Metric::TaxRate)[5] > 0.0);
    }

    #[test]
    fn test_wages_tax_and_ubi_conserve_money() {
        let config = config(GovernmentType::Direct);
        let mut world = populate_world(&config, ChaCha8Rng::seed_from_u64(4)).unwrap();
        let mut government = Government::new(&config.government);
        if let Government::Direct(direct) = &mut government {
            direct.treasury.tax_rate = 0.3;
        }
        let before = world.total_money() + government.money();

        for hh in &mut world.households {
            hh.start_month();
        }
        let wages = systems::pay_wages(&mut world).unwrap();
        let tax = government.collect_tax(&mut world.households).unwrap();
        government.calc_ubi(world.households.len());
        let ubi = government.pay_ubi(&mut world.households).unwrap();

        assert!(wages > 0.0);
        assert!((tax - 0.3 * wages).abs() < 1e-6 * wages);
        assert!((ubi - tax).abs() < 1e-9 * tax.max(1.0));
        assert!(government.money().abs() < 1e-9);
        let after = world.total_money() + government.money();
        assert!((after - before).abs() < 1e-9 * before);
    }

    #[test]
    fn test_unemployed_income_is_only_ubi() {
        for government_type in [GovernmentType::None, GovernmentType::Direct] {
            let config = config(government_type);
            let mut world = populate_world(&config, ChaCha8Rng::seed_from_u64(5)).unwrap();
            let mut government = Government::new(&config.government);
            let mut record = RunRecord::new(0, government_type);

            for month in 0..12 {
                world.month = month;
                run_month_tick(&mut world, &mut government, &mut record, &config).unwrap();
                let ubi = government.ubi();
                if government_type == GovernmentType::None {
                    assert_eq!(ubi, 0.0);
                }
                for hh in world.households.iter().filter(|h| !h.is_employed()) {
                    assert!((hh.income - ubi).abs() < 1e-12, "month {}", month);
                }
            }
        }
    }

    #[test]
    fn test_tax_flows_through_as_ubi() {
        let config = config(GovernmentType::Direct);
        let mut world = populate_world(&config, ChaCha8Rng::seed_from_u64(3)).unwrap();
        let mut government = Government::new(&config.government);
        let mut record = RunRecord::new(0, GovernmentType::Direct);

        for month in 0..6 {
            world.month = month;
            let summary =
                run_month_tick(&mut world, &mut government, &mut record, &config).unwrap();
            assert!((summary.tax_collected - summary.ubi_paid).abs() < 1e-6);
        }
    }
}
