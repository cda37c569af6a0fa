//! Request files for `triage analyze --file` and `triage suggest --file`.
//!
//! A file holds either a bare JSON array of tasks or an object with a `tasks`
//! array plus optional `strategy`, `config` and `user_preferences`.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use triage_core::{AnalysisOptions, EnergyLevel, Strategy, TaskRecord, WeightOverrides};

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub tasks: Vec<TaskRecord>,
    /// Warnings for task rows that could not be decoded at all.
    pub rejected: Vec<String>,
    pub strategy: Option<Strategy>,
    pub weights: Option<WeightOverrides>,
    pub preferences: PreferencesPatch,
}

/// Preference fields present in the request; absent ones keep configured values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreferencesPatch {
    #[serde(default)]
    pub available_hours: Option<f64>,
    #[serde(default)]
    pub energy_level: Option<String>,
}

impl Request {
    /// Layer the request's options over `opts`.
    pub fn apply(&self, opts: &mut AnalysisOptions) {
        if let Some(strategy) = self.strategy {
            opts.strategy = strategy;
        }
        if let Some(weights) = &self.weights {
            opts.weights = weights.clone();
        }
        if let Some(hours) = self.preferences.available_hours {
            opts.preferences.available_hours = hours;
        }
        if let Some(level) = &self.preferences.energy_level {
            opts.preferences.energy_level = EnergyLevel::from_name_or_default(level);
        }
    }
}

/// Decode each row on its own so one malformed task does not sink the batch.
fn decode_tasks(rows: Vec<Value>) -> (Vec<TaskRecord>, Vec<String>) {
    let mut tasks = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for row in rows {
        let title = row
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        match serde_json::from_value::<TaskRecord>(row) {
            Ok(task) => tasks.push(task),
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "skipping malformed task");
                rejected.push(format!("Error scoring task '{title}': {e}"));
            }
        }
    }
    (tasks, rejected)
}

pub fn parse_request(text: &str) -> Result<Request> {
    let value: Value = serde_json::from_str(text).context("request is not valid JSON")?;

    match value {
        Value::Array(rows) => {
            let (tasks, rejected) = decode_tasks(rows);
            Ok(Request {
                tasks,
                rejected,
                ..Request::default()
            })
        }
        Value::Object(mut obj) => {
            let (tasks, rejected) = match obj.remove("tasks") {
                Some(Value::Array(rows)) => decode_tasks(rows),
                _ => bail!("invalid input: tasks field is required and must be a list"),
            };

            let strategy = match obj.remove("strategy") {
                Some(Value::String(name)) => Some(Strategy::from_name_or_default(&name)),
                Some(Value::Null) | None => None,
                Some(other) => bail!("invalid input: strategy must be a string, got {other}"),
            };

            let weights = match obj.remove("config") {
                Some(Value::Null) | None => None,
                Some(v) => {
                    let w: WeightOverrides =
                        serde_json::from_value(v).context("parse config weights")?;
                    for key in w.unknown_keys() {
                        tracing::warn!(key, "request config names an unknown strategy");
                    }
                    Some(w)
                }
            };

            let preferences = match obj.remove("user_preferences") {
                Some(Value::Null) | None => PreferencesPatch::default(),
                Some(v) => serde_json::from_value(v).context("parse user_preferences")?,
            };

            Ok(Request {
                tasks,
                rejected,
                strategy,
                weights,
                preferences,
            })
        }
        _ => bail!("invalid input: expected a task list or an object with a tasks field"),
    }
}

/// Read a request from `path`, or stdin when `path` is `-`.
pub fn read_request(path: &Path) -> Result<Request> {
    let text = if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("read request from stdin")?;
        s
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    parse_request(&text).with_context(|| format!("in {}", path.display()))
}
