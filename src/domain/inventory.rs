use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BloodType, Error};
use crate::matching::can_donate;

/// Units of one blood type held in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// The stocked blood type.
    pub blood_type: BloodType,
    /// Units on hand.
    pub units: u32,
}

/// How healthy a stock level is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    /// Below the critical threshold.
    Critical,
    /// Below the low threshold.
    Low,
    /// At or above the low threshold.
    Stable,
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Critical => "Critical",
            Self::Low => "Low",
            Self::Stable => "Stable",
        })
    }
}

/// Unit counts at which stock is reported as low or critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryThresholds {
    /// Stock strictly below this many units is critical.
    #[serde(default = "default_critical_below")]
    pub critical_below: u32,
    /// Stock strictly below this many units (and not critical) is low.
    #[serde(default = "default_low_below")]
    pub low_below: u32,
}

const fn default_critical_below() -> u32 {
    10
}

const fn default_low_below() -> u32 {
    20
}

impl Default for InventoryThresholds {
    fn default() -> Self {
        Self {
            critical_below: default_critical_below(),
            low_below: default_low_below(),
        }
    }
}

impl InventoryThresholds {
    /// Checks that the critical level does not exceed the low level, so
    /// every [`StockLevel`] remains reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidThresholds`] if `critical_below > low_below`.
    pub const fn validated(self) -> Result<Self, Error> {
        if self.critical_below > self.low_below {
            return Err(Error::InvalidThresholds {
                critical_below: self.critical_below,
                low_below: self.low_below,
            });
        }
        Ok(self)
    }

    /// Classifies a unit count.
    #[must_use]
    pub const fn classify(&self, units: u32) -> StockLevel {
        if units < self.critical_below {
            StockLevel::Critical
        } else if units < self.low_below {
            StockLevel::Low
        } else {
            StockLevel::Stable
        }
    }
}

/// Total units in `inventory` that may be transfused into a `recipient`.
///
/// Entries for the same blood type are summed.
#[must_use]
pub fn usable_units(recipient: BloodType, inventory: &[InventoryEntry]) -> u32 {
    inventory
        .iter()
        .filter(|entry| can_donate(entry.blood_type, recipient))
        .map(|entry| entry.units)
        .fold(0, u32::saturating_add)
}
