//! Top-N suggestions: the head of a full analysis.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisOptions, ScoredTask, analyze_tasks};
use crate::strategy::Strategy;
use crate::task::TaskRecord;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub suggestions: Vec<ScoredTask>,
    pub strategy_used: Strategy,
    /// Tasks that made it into the ranking.
    pub total_evaluated: usize,
}

/// Best `limit` tasks under `strategy` with default preferences.
pub fn get_top_suggestions(
    tasks: &[TaskRecord],
    strategy: Strategy,
    limit: usize,
    today: NaiveDate,
) -> Suggestions {
    suggest_with_options(tasks, &AnalysisOptions::new(strategy), limit, today)
}

/// Same as `get_top_suggestions`, with caller-supplied weights and preferences.
pub fn suggest_with_options(
    tasks: &[TaskRecord],
    options: &AnalysisOptions,
    limit: usize,
    today: NaiveDate,
) -> Suggestions {
    let analysis = analyze_tasks(tasks, options, today);
    let total_evaluated = analysis.total_tasks;
    let mut suggestions = analysis.analyzed_tasks;
    suggestions.truncate(limit);

    Suggestions {
        suggestions,
        strategy_used: analysis.strategy_used,
        total_evaluated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 12).unwrap()
    }

    fn batch() -> Vec<TaskRecord> {
        (1..=5)
            .map(|i: i64| {
                TaskRecord::new(i, format!("Task {i}"))
                    .due_on(today() + Duration::days(1))
                    .with_hours(i as f64)
                    .with_importance(10 - i)
            })
            .collect()
    }

    #[test]
    fn test_limit_three_of_five() {
        let result = get_top_suggestions(&batch(), Strategy::SmartBalance, 3, today());
        assert_eq!(result.suggestions.len(), 3);
        assert_eq!(result.strategy_used, Strategy::SmartBalance);
        assert_eq!(result.total_evaluated, 5);
        assert_eq!(result.suggestions[0].task.display_title(), "Task 1");
    }

    #[test]
    fn test_limit_larger_than_batch() {
        let result = get_top_suggestions(&batch(), Strategy::FastWins, 10, today());
        assert_eq!(result.suggestions.len(), 5);
    }

    #[test]
    fn test_empty_batch_has_no_suggestions() {
        let result = get_top_suggestions(&[], Strategy::HighImpact, 3, today());
        assert!(result.suggestions.is_empty());
        assert_eq!(result.total_evaluated, 0);
        assert_eq!(result.strategy_used, Strategy::HighImpact);
    }
}
