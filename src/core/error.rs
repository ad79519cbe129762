use thiserror::Error;

use crate::core::types::{FirmId, HouseholdId};

#[derive(Error, Debug)]
pub enum EconError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tax rate {0} is outside [0, 1]")]
    InvalidTaxRate(f64),

    #[error("Transfer amount {0} must be finite and non-negative")]
    InvalidTransfer(f64),

    #[error("Household not found: {0}")]
    UnknownHousehold(HouseholdId),

    #[error("Firm not found: {0}")]
    UnknownFirm(FirmId),

    #[error("{firm} is insolvent with balance {money:.4}")]
    FirmInsolvent { firm: FirmId, money: f64 },

    #[error("Shape mismatch for {what}: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Run {run} failed: {source}")]
    RunFailed {
        run: u32,
        #[source]
        source: Box<EconError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EconError>;
