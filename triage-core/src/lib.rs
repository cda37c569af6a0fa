//! triage-core: task prioritization engine.
//!
//! Takes a batch of task records, detects dependency cycles, scores every task under
//! a strategy, ranks the batch and estimates what fits in today's hours. Pure and
//! synchronous; storage and transport belong to the caller.

pub mod analysis;
pub mod composer;
pub mod graph;
pub mod preferences;
pub mod scoring;
pub mod strategy;
pub mod suggest;
pub mod task;
pub mod time;
pub mod validation;

pub use analysis::{
    AnalysisOptions, AnalysisResult, EMPTY_BATCH_WARNING, Insights, PriorityTier, ScoredTask,
    analyze_tasks,
};
pub use composer::{ScoreBreakdown, ScoreOutcome, score_task};
pub use graph::{DependencyGraph, detect_circular_dependencies};
pub use preferences::{EnergyLevel, Preferences};
pub use scoring::{
    EffortBand, UrgencyBand, calculate_dependency_boost, calculate_effort_score,
    calculate_urgency_score,
};
pub use strategy::{Strategy, StrategyProfile, WeightOverrides, Weights};
pub use suggest::{DEFAULT_SUGGESTION_LIMIT, Suggestions, get_top_suggestions, suggest_with_options};
pub use task::{Estimate, Importance, TaskId, TaskRecord};
pub use time::{local_today, parse_due_date};
pub use validation::{ValidationError, validate_task};
