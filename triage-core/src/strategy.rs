//! Prioritization strategies and their weight vectors.
//!
//! Each strategy is one row in `PROFILES`: names, user-facing text and the default
//! weights over the four scoring components. Adding a strategy means adding a
//! variant and a row.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    FastWins,
    HighImpact,
    DeadlineDriven,
    #[default]
    SmartBalance,
}

/// Weights over the scoring components. Defaults sum to 1.0; overrides are used as
/// given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependency,
        }
    }

    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependency
    }
}

/// Static description of one strategy.
#[derive(Debug)]
pub struct StrategyProfile {
    pub strategy: Strategy,
    pub name: &'static str,
    /// Short mode name shown next to each score.
    pub mode: &'static str,
    /// One-line description of the whole ranking.
    pub description: &'static str,
    /// Opening phrase of every per-task reason.
    pub reason: &'static str,
    pub weights: Weights,
}

static PROFILES: [StrategyProfile; 4] = [
    StrategyProfile {
        strategy: Strategy::FastWins,
        name: "fast_wins",
        mode: "Speed Mode",
        description: "Optimized for quick completions to build momentum",
        reason: "Quick completion for maximum momentum",
        weights: Weights::new(0.25, 0.15, 0.50, 0.10),
    },
    StrategyProfile {
        strategy: Strategy::HighImpact,
        name: "high_impact",
        mode: "Effective Mode",
        description: "Focused on high-value tasks for maximum impact",
        reason: "High-value task for maximum impact",
        weights: Weights::new(0.15, 0.55, 0.10, 0.20),
    },
    StrategyProfile {
        strategy: Strategy::DeadlineDriven,
        name: "deadline_driven",
        mode: "Deadline Crisis Mode",
        description: "Prioritized by deadline urgency to prevent overdue tasks",
        reason: "Urgent deadline - immediate attention required",
        weights: Weights::new(0.65, 0.15, 0.10, 0.10),
    },
    StrategyProfile {
        strategy: Strategy::SmartBalance,
        name: "smart_balance",
        mode: "Balanced Mode",
        description: "Balanced approach considering urgency, importance, and effort",
        reason: "Balanced prioritization for optimal productivity",
        weights: Weights::new(0.30, 0.30, 0.20, 0.20),
    },
];

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::FastWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
        Strategy::SmartBalance,
    ];

    pub fn profile(self) -> &'static StrategyProfile {
        match self {
            Strategy::FastWins => &PROFILES[0],
            Strategy::HighImpact => &PROFILES[1],
            Strategy::DeadlineDriven => &PROFILES[2],
            Strategy::SmartBalance => &PROFILES[3],
        }
    }

    pub fn as_str(self) -> &'static str {
        self.profile().name
    }

    pub fn default_weights(self) -> Weights {
        self.profile().weights
    }

    /// Deadline-driven ranking scales urgency up across the board.
    pub fn crisis_mode(self) -> bool {
        self == Strategy::DeadlineDriven
    }

    /// Unknown names rank with the balanced strategy.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(strategy = name, "unknown strategy, using smart_balance");
            Strategy::SmartBalance
        })
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        PROFILES
            .iter()
            .find(|p| p.name == wanted)
            .map(|p| p.strategy)
            .ok_or_else(|| {
                let known: Vec<&str> = PROFILES.iter().map(|p| p.name).collect();
                anyhow::anyhow!("unknown strategy: {s} (expected one of {})", known.join(", "))
            })
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Strategy::from_name_or_default(&name))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-strategy weight overrides keyed by strategy name.
///
/// Both `fast_wins` and `fast_wins_weights` are accepted as keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightOverrides(HashMap<String, Weights>);

impl WeightOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, strategy: Strategy, weights: Weights) -> Self {
        self.0.insert(strategy.as_str().to_string(), weights);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, strategy: Strategy) -> Option<Weights> {
        let name = strategy.as_str();
        self.0
            .get(name)
            .or_else(|| self.0.get(&format!("{name}_weights")))
            .copied()
    }

    /// Override for `strategy` if present, else its defaults.
    pub fn weights_for(&self, strategy: Strategy) -> Weights {
        self.get(strategy).unwrap_or_else(|| strategy.default_weights())
    }

    /// Keys that do not name a strategy.
    pub fn unknown_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .0
            .keys()
            .map(String::as_str)
            .filter(|k| {
                let base = k.strip_suffix("_weights").unwrap_or(k);
                base.parse::<Strategy>().is_err()
            })
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        for s in Strategy::ALL {
            let total = s.default_weights().total();
            assert!((total - 1.0).abs() < 1e-9, "{s} sums to {total}");
        }
    }

    #[test]
    fn test_profile_rows_match_variants() {
        for s in Strategy::ALL {
            assert_eq!(s.profile().strategy, s);
            assert_eq!(s.as_str().parse::<Strategy>().unwrap(), s);
        }
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        assert!("yolo".parse::<Strategy>().is_err());
        assert_eq!(Strategy::from_name_or_default("yolo"), Strategy::SmartBalance);
        assert_eq!(Strategy::from_name_or_default("Fast_Wins"), Strategy::FastWins);
    }

    #[test]
    fn test_unknown_strategy_name_decodes_as_default() {
        let json = r#"["yolo", "high_impact", "DEADLINE_DRIVEN"]"#;
        let s: Vec<Strategy> = serde_json::from_str(json).unwrap();
        assert_eq!(
            s,
            vec![Strategy::SmartBalance, Strategy::HighImpact, Strategy::DeadlineDriven]
        );
    }

    #[test]
    fn test_only_deadline_driven_is_crisis_mode() {
        let crisis: Vec<Strategy> = Strategy::ALL.into_iter().filter(|s| s.crisis_mode()).collect();
        assert_eq!(crisis, vec![Strategy::DeadlineDriven]);
    }

    #[test]
    fn test_overrides_accept_both_key_forms() {
        let json = r#"{
            "fast_wins": {"urgency": 0.1, "importance": 0.1, "effort": 0.7, "dependency": 0.1},
            "high_impact_weights": {"urgency": 0.0, "importance": 1.0, "effort": 0.0, "dependency": 0.0},
            "turbo": {"urgency": 1.0, "importance": 0.0, "effort": 0.0, "dependency": 0.0}
        }"#;
        let o: WeightOverrides = serde_json::from_str(json).unwrap();

        assert_eq!(o.weights_for(Strategy::FastWins).effort, 0.7);
        assert_eq!(o.weights_for(Strategy::HighImpact).importance, 1.0);
        assert_eq!(
            o.weights_for(Strategy::SmartBalance),
            Strategy::SmartBalance.default_weights()
        );
        assert_eq!(o.unknown_keys(), vec!["turbo"]);
    }
}
