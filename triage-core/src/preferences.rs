//! User preferences that shape scoring and the same-day feasibility walk.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse energy level reported by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    /// Multiplier on effort scores for strategies that honor energy.
    pub fn modifier(self) -> f64 {
        match self {
            EnergyLevel::Low => 0.7,
            EnergyLevel::Medium => 1.0,
            EnergyLevel::High => 1.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        }
    }

    /// Unknown names map to `Medium`.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(energy_level = name, "unknown energy level, using medium");
            EnergyLevel::Medium
        })
    }
}

impl FromStr for EnergyLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(EnergyLevel::Low),
            "medium" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            other => anyhow::bail!("unknown energy level: {other} (expected low, medium or high)"),
        }
    }
}

impl<'de> Deserialize<'de> for EnergyLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(EnergyLevel::from_name_or_default(&name))
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_AVAILABLE_HOURS: f64 = 8.0;

fn default_available_hours() -> f64 {
    DEFAULT_AVAILABLE_HOURS
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Hours the user can spend on tasks today.
    #[serde(default = "default_available_hours")]
    pub available_hours: f64,

    #[serde(default)]
    pub energy_level: EnergyLevel,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            available_hours: DEFAULT_AVAILABLE_HOURS,
            energy_level: EnergyLevel::Medium,
        }
    }
}

impl Preferences {
    pub fn new(available_hours: f64, energy_level: EnergyLevel) -> Self {
        Self {
            available_hours,
            energy_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let p: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(p, Preferences::default());
        assert_eq!(p.available_hours, 8.0);
        assert_eq!(p.energy_level, EnergyLevel::Medium);
    }

    #[test]
    fn test_unknown_energy_falls_back_to_medium() {
        let p: Preferences =
            serde_json::from_str(r#"{"available_hours": 3, "energy_level": "caffeinated"}"#).unwrap();
        assert_eq!(p.available_hours, 3.0);
        assert_eq!(p.energy_level, EnergyLevel::Medium);
        assert_eq!(p.energy_level.modifier(), 1.0);
    }

    #[test]
    fn test_energy_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&EnergyLevel::High).unwrap(), r#""high""#);
        assert_eq!("LOW".parse::<EnergyLevel>().unwrap(), EnergyLevel::Low);
        assert!("sleepy".parse::<EnergyLevel>().is_err());
    }
}
