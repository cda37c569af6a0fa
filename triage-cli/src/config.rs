use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use triage_core::{
    AnalysisOptions, DEFAULT_SUGGESTION_LIMIT, EnergyLevel, Preferences, Strategy, WeightOverrides,
};

use crate::state::config_path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsSection,

    /// Per-strategy weight overrides, e.g. `[weights.fast_wins]`.
    #[serde(default, skip_serializing_if = "WeightOverrides::is_empty")]
    pub weights: WeightOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub strategy: Strategy,
    pub available_hours: f64,
    pub energy_level: EnergyLevel,
    /// Suggestions shown by `triage suggest`.
    pub limit: usize,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        let prefs = Preferences::default();
        Self {
            strategy: Strategy::default(),
            available_hours: prefs.available_hours,
            energy_level: prefs.energy_level,
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub strategy: Option<Strategy>,
    pub available_hours: Option<f64>,
    pub energy_level: Option<EnergyLevel>,
}

impl Overrides {
    pub fn apply(self, opts: &mut AnalysisOptions) {
        if let Some(strategy) = self.strategy {
            opts.strategy = strategy;
        }
        if let Some(hours) = self.available_hours {
            opts.preferences.available_hours = hours;
        }
        if let Some(level) = self.energy_level {
            opts.preferences.energy_level = level;
        }
    }
}

impl Config {
    /// Effective analysis options: flags, then file defaults.
    pub fn analysis_options(&self, overrides: Overrides) -> AnalysisOptions {
        let preferences =
            Preferences::new(self.defaults.available_hours, self.defaults.energy_level);
        let mut opts = AnalysisOptions::new(self.defaults.strategy)
            .with_weights(self.weights.clone())
            .with_preferences(preferences);
        overrides.apply(&mut opts);
        opts
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    for key in cfg.weights.unknown_keys() {
        tracing::warn!(key, path = %path.display(), "config names an unknown strategy");
    }
    Ok(cfg)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config_to(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::Weights;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.defaults.limit, 3);
        assert_eq!(cfg.defaults.available_hours, 8.0);
    }

    #[test]
    fn parses_defaults_and_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[defaults]
strategy = "deadline_driven"
energy_level = "low"

[weights.fast_wins]
urgency = 0.1
importance = 0.1
effort = 0.7
dependency = 0.1
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.strategy, Strategy::DeadlineDriven);
        assert_eq!(cfg.defaults.energy_level, EnergyLevel::Low);
        assert_eq!(cfg.defaults.available_hours, 8.0);
        assert_eq!(cfg.weights.weights_for(Strategy::FastWins).effort, 0.7);
    }

    #[test]
    fn flags_override_file_values() {
        let cfg = Config {
            defaults: DefaultsSection {
                strategy: Strategy::HighImpact,
                available_hours: 6.0,
                energy_level: EnergyLevel::High,
                limit: 5,
            },
            weights: WeightOverrides::new()
                .with(Strategy::FastWins, Weights::new(0.25, 0.25, 0.25, 0.25)),
        };

        let opts = cfg.analysis_options(Overrides {
            strategy: Some(Strategy::FastWins),
            available_hours: None,
            energy_level: Some(EnergyLevel::Low),
        });
        assert_eq!(opts.strategy, Strategy::FastWins);
        assert_eq!(opts.preferences.available_hours, 6.0);
        assert_eq!(opts.preferences.energy_level, EnergyLevel::Low);
        assert_eq!(opts.weights.weights_for(Strategy::FastWins).urgency, 0.25);
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        save_config_to(&path, &Config::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("strategy = \"smart_balance\""));
        assert_eq!(load_config_from(&path).unwrap(), Config::default());
    }
}
