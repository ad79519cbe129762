//! Statistics: inequality measures, per-run records and cross-run aggregation

pub mod inequality;
pub mod record;
pub mod statistician;

pub use inequality::{gini, hoover, mean};
pub use record::{Distribution, Metric, RunRecord};
pub use statistician::{cross_run, CrossRunStats, Statistician};
