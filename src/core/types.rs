//! Core type definitions used throughout the codebase

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::EconError;

/// Simulation month counter (0-based within a run)
pub type Month = u32;

/// Index of a household in the world's household arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u32);

impl HouseholdId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hh#{}", self.0)
    }
}

/// Index of a firm in the world's firm arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirmId(pub u32);

impl FirmId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firm#{}", self.0)
    }
}

/// Which government regime redistributes income during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernmentType {
    /// No taxes, no UBI
    #[default]
    None,
    /// Every household votes on the tax rate
    Direct,
    /// Five income-quintile parties vote through a sampled parliament
    Representative,
}

impl GovernmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernmentType::None => "none",
            GovernmentType::Direct => "direct",
            GovernmentType::Representative => "representative",
        }
    }
}

impl fmt::Display for GovernmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GovernmentType {
    type Err = EconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(GovernmentType::None),
            "direct" | "dir" => Ok(GovernmentType::Direct),
            "representative" | "rep" => Ok(GovernmentType::Representative),
            other => Err(EconError::InvalidConfig(format!(
                "unknown government type '{}' (expected none, direct or representative)",
                other
            ))),
        }
    }
}
