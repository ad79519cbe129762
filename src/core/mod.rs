pub mod config;
pub mod error;
pub mod types;

pub use config::{FirmConfig, GovernmentConfig, HouseholdConfig, SimulationConfig};
pub use error::{EconError, Result};
pub use types::{FirmId, GovernmentType, HouseholdId, Month};
