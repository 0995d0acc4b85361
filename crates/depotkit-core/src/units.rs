//! Length unit handling
//!
//! Layouts are always stored in world units (meters). The configured display
//! unit only changes thresholds that are expressed "per unit", such as the
//! shelf edge snap distance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display/measurement unit configured for a warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Meters (world units map 1:1)
    #[default]
    Meters,
    /// Centimeters
    Centimeters,
}

impl LengthUnit {
    /// Size of one configured unit in world units.
    pub fn scale(&self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Centimeters => 0.01,
        }
    }

    /// Short symbol used in labels.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Centimeters => "cm",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meters => write!(f, "Meters"),
            Self::Centimeters => write!(f, "Centimeters"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "meter" | "meters" | "米" => Ok(Self::Meters),
            "cm" | "centimeter" | "centimeters" | "厘米" => Ok(Self::Centimeters),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Formats a world-space length in the given unit, two decimals.
pub fn format_length(value_m: f64, unit: LengthUnit) -> String {
    format!("{:.2}{}", value_m / unit.scale(), unit.symbol())
}
