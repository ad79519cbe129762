//! Monthly market systems

mod goods;
mod labor;
mod pricing;
mod settlement;
mod setup;

pub use goods::{
    buy_for_day, daily_share, find_cheaper_vendor, find_stocked_vendor, plan_demand,
    run_goods_market, update_vendors,
};
pub use labor::{decide_job_search, run_job_search, run_layoffs};
pub use pricing::update_firm_decisions;
pub use settlement::{check_solvency, distribute_profits, pay_wages, update_reservation_wages};
pub use setup::populate_world;
