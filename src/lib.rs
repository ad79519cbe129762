//! Agent Economy - agent-based macroeconomic simulation
//!
//! Households work, consume and vote; firms hire, produce and set prices; a
//! government (none, direct democracy or representative parliament) taxes
//! income and redistributes it as universal basic income. Repeated seeded
//! runs are stacked by a statistician that reports inequality and cross-run
//! mean and standard error for every tracked series.

pub mod core;
pub mod economy;
pub mod government;
pub mod simulation;
pub mod stats;

pub use crate::core::{EconError, GovernmentType, Result, SimulationConfig};
pub use crate::simulation::{simulate, Simulation, SimulationOutput};
pub use crate::stats::{gini, CrossRunStats, Metric, Statistician};
