//! Analysis orchestrator: score a whole batch, rank it, and work out what fits today.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::composer::{ScoreBreakdown, round_to, score_task};
use crate::graph::detect_circular_dependencies;
use crate::preferences::{EnergyLevel, Preferences};
use crate::strategy::{Strategy, WeightOverrides};
use crate::task::TaskRecord;

pub const EMPTY_BATCH_WARNING: &str = "No tasks provided for analysis";

/// Score at or above which a task counts as urgent in the insights.
pub const URGENT_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityTier {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 9.0 => PriorityTier::Critical,
            s if s >= 7.0 => PriorityTier::High,
            s if s >= 5.0 => PriorityTier::Medium,
            _ => PriorityTier::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::Critical => "Critical",
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }
}

/// Everything that shapes one analysis besides the tasks and the date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default, alias = "config")]
    pub weights: WeightOverrides,

    #[serde(default, alias = "user_preferences")]
    pub preferences: Preferences,
}

impl AnalysisOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_weights(mut self, weights: WeightOverrides) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub task: TaskRecord,
    pub score: f64,
    pub reason: String,
    pub priority_level: PriorityTier,
    pub metadata: Option<ScoreBreakdown>,
    pub can_complete_today: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub total_hours_needed: f64,
    pub available_hours: f64,
    pub tasks_completable_today: usize,
    pub hours_completable_today: f64,
    pub overdue_tasks: usize,
    pub urgent_tasks: usize,
    pub energy_level: EnergyLevel,
    /// Share of today's hours the completable tasks fill, in percent.
    pub productivity_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Highest score first; equal scores keep input order.
    pub analyzed_tasks: Vec<ScoredTask>,
    pub strategy_used: Strategy,
    pub strategy_description: String,
    pub total_tasks: usize,
    pub circular_dependencies: Vec<String>,
    pub warnings: Vec<String>,
    /// Absent for an empty batch.
    pub insights: Option<Insights>,
    pub user_preferences: Preferences,
}

impl AnalysisResult {
    fn empty(options: &AnalysisOptions) -> Self {
        Self {
            analyzed_tasks: Vec::new(),
            strategy_used: options.strategy,
            strategy_description: options.strategy.profile().description.to_string(),
            total_tasks: 0,
            circular_dependencies: Vec::new(),
            warnings: vec![EMPTY_BATCH_WARNING.to_string()],
            insights: None,
            user_preferences: options.preferences,
        }
    }
}

/// Hours a task adds to today's budget. A missing or negative estimate adds
/// nothing; a non-numeric one cannot be budgeted.
fn budget_hours(task: &TaskRecord) -> Result<f64> {
    match &task.estimated_hours {
        None => Ok(0.0),
        Some(est) => est
            .hours()
            .map(|h| h.max(0.0))
            .ok_or_else(|| anyhow!("estimated_hours {est} is not a number")),
    }
}

fn check_importance(task: &TaskRecord) -> Result<()> {
    match &task.importance {
        Some(imp) if imp.value().is_none() => Err(anyhow!("importance {imp} is not a number")),
        _ => Ok(()),
    }
}

fn score_row(
    task: &TaskRecord,
    tasks: &[TaskRecord],
    options: &AnalysisOptions,
    today: NaiveDate,
) -> Result<(ScoredTask, f64)> {
    let outcome = score_task(
        task,
        options.strategy,
        &options.weights,
        tasks,
        &options.preferences,
        today,
    );
    let hours = budget_hours(task)?;
    check_importance(task)?;

    let row = ScoredTask {
        task: task.clone(),
        score: outcome.score,
        reason: outcome.reason,
        priority_level: PriorityTier::from_score(outcome.score),
        metadata: outcome.metadata,
        can_complete_today: false,
    };
    Ok((row, hours))
}

/// Rank `tasks` under `options` as of `today`.
///
/// A task that cannot be scored is reported in `warnings` and left out; the rest of
/// the batch still ranks.
pub fn analyze_tasks(
    tasks: &[TaskRecord],
    options: &AnalysisOptions,
    today: NaiveDate,
) -> AnalysisResult {
    if tasks.is_empty() {
        return AnalysisResult::empty(options);
    }

    let strategy = options.strategy;
    info!(strategy = %strategy, tasks = tasks.len(), "analyzing task batch");

    let mut warnings = Vec::new();

    for key in options.weights.unknown_keys() {
        warn!(key, "ignoring weight override for unknown strategy");
    }

    let circular = detect_circular_dependencies(tasks);
    if !circular.is_empty() {
        warn!(tasks = ?circular, "circular dependencies detected");
        warnings.push(format!(
            "Circular dependencies detected in: {}",
            circular.join(", ")
        ));
    }

    let mut rows: Vec<(ScoredTask, f64)> = Vec::with_capacity(tasks.len());
    for task in tasks {
        match score_row(task, tasks, options, today) {
            Ok(row) => {
                debug!(task = %task.id, score = row.0.score, "scored task");
                rows.push(row);
            }
            Err(e) => {
                warn!(task = %task.id, error = %e, "failed to score task");
                warnings.push(format!(
                    "Error scoring task '{}': {e}",
                    task.display_title()
                ));
            }
        }
    }

    let total_hours: f64 = rows.iter().map(|(_, h)| h).sum();

    // sort_by is stable: equal scores keep input order
    rows.sort_by(|a, b| b.0.score.total_cmp(&a.0.score));

    let available = options.preferences.available_hours;
    let mut cumulative = 0.0;
    let mut completable = 0;
    for (row, hours) in rows.iter_mut() {
        if cumulative + *hours <= available {
            cumulative += *hours;
            completable += 1;
            row.can_complete_today = true;
        }
    }

    let analyzed: Vec<ScoredTask> = rows.into_iter().map(|(row, _)| row).collect();

    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
    let urgent = analyzed
        .iter()
        .filter(|t| t.score >= URGENT_THRESHOLD)
        .count();
    let productivity_ratio = if available > 0.0 {
        round_to(cumulative / available * 100.0, 1)
    } else {
        0.0
    };

    let insights = Insights {
        total_hours_needed: round_to(total_hours, 1),
        available_hours: available,
        tasks_completable_today: completable,
        hours_completable_today: round_to(cumulative, 1),
        overdue_tasks: overdue,
        urgent_tasks: urgent,
        energy_level: options.preferences.energy_level,
        productivity_ratio,
    };

    info!(
        ranked = analyzed.len(),
        completable,
        overdue,
        urgent,
        "analysis complete"
    );

    AnalysisResult {
        total_tasks: analyzed.len(),
        analyzed_tasks: analyzed,
        strategy_used: strategy,
        strategy_description: strategy.profile().description.to_string(),
        circular_dependencies: circular,
        warnings,
        insights: Some(insights),
        user_preferences: options.preferences,
    }
}
