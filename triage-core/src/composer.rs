//! Strategy composer: combine component scores into one ranked score with a reason.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::preferences::Preferences;
use crate::scoring::{
    DEFAULT_MAX_SCORE, DEPENDENT_BOOST, UrgencyBand, calculate_dependency_boost,
    calculate_effort_score, calculate_urgency_score,
};
use crate::strategy::{Strategy, WeightOverrides};
use crate::task::{Importance, TaskRecord};

/// Importance used when a record carries none.
pub const DEFAULT_IMPORTANCE: f64 = 5.0;

pub const MAX_COMPOSITE: f64 = 10.0;

/// Raw component values behind a score, for display and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency_label: String,
    pub effort_label: String,
    pub strategy_desc: String,
    pub urgency_score: f64,
    pub effort_score: f64,
    pub importance_score: f64,
    pub dependency_boost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// In `[0, 10]`, rounded to 2 dp.
    pub score: f64,
    pub reason: String,
    /// Absent when required fields are missing.
    pub metadata: Option<ScoreBreakdown>,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Score one task under `strategy`.
///
/// A record missing any required field scores 0.0 with a reason naming the missing
/// fields; that is a normal outcome, not an error.
pub fn score_task(
    task: &TaskRecord,
    strategy: Strategy,
    overrides: &WeightOverrides,
    all_tasks: &[TaskRecord],
    preferences: &Preferences,
    today: NaiveDate,
) -> ScoreOutcome {
    let missing = task.missing_fields();
    if !missing.is_empty() {
        return ScoreOutcome {
            score: 0.0,
            reason: format!("Missing required fields: {}", missing.join(", ")),
            metadata: None,
        };
    }

    let profile = strategy.profile();
    let (urgency, urgency_band) = calculate_urgency_score(
        task.due_date.as_deref(),
        DEFAULT_MAX_SCORE,
        strategy.crisis_mode(),
        today,
    );
    let importance = task
        .importance
        .as_ref()
        .and_then(Importance::value)
        .unwrap_or(DEFAULT_IMPORTANCE);
    let (effort, effort_band) =
        calculate_effort_score(task.estimated_hours.as_ref(), strategy, preferences.energy_level);
    let dependency = calculate_dependency_boost(task, all_tasks);

    let w = overrides.weights_for(strategy);
    let raw = urgency * w.urgency
        + importance * w.importance
        + effort * w.effort
        + dependency * w.dependency;
    let score = raw.clamp(0.0, MAX_COMPOSITE);

    let mut flags: Vec<String> = Vec::new();
    match urgency_band {
        UrgencyBand::Overdue => flags.push("OVERDUE".into()),
        UrgencyBand::DueToday => flags.push("Due today".into()),
        UrgencyBand::DueTomorrow => flags.push("Due tomorrow".into()),
        band if urgency > 7.0 => flags.push(band.label().into()),
        _ => {}
    }
    if importance >= 9.0 {
        flags.push("Critical importance".into());
    } else if importance >= 7.0 {
        flags.push("High importance".into());
    }
    if effort > 7.0 {
        flags.push("Quick win".into());
    }
    if dependency > 0.0 {
        let blocking = (dependency / DEPENDENT_BOOST) as usize;
        let plural = if blocking > 1 { "s" } else { "" };
        flags.push(format!("Blocks {blocking} task{plural}"));
    }

    let reason = if flags.is_empty() {
        profile.reason.to_string()
    } else {
        format!("{} | {}", profile.reason, flags.join(" | "))
    };

    tracing::trace!(
        task = %task.id,
        urgency,
        importance,
        effort,
        dependency,
        score,
        "composed task score"
    );

    ScoreOutcome {
        score: round_to(score, 2),
        reason,
        metadata: Some(ScoreBreakdown {
            urgency_label: urgency_band.label().to_string(),
            effort_label: effort_band.label().to_string(),
            strategy_desc: profile.mode.to_string(),
            urgency_score: round_to(urgency, 2),
            effort_score: round_to(effort, 2),
            importance_score: importance,
            dependency_boost: round_to(dependency, 2),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::EnergyLevel;
    use crate::strategy::Weights;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 12).unwrap()
    }

    fn sample(days: i64, hours: f64, importance: i64) -> TaskRecord {
        TaskRecord::new(1, "Test Task")
            .due_on(today() + Duration::days(days))
            .with_hours(hours)
            .with_importance(importance)
    }

    fn score(task: &TaskRecord, strategy: Strategy) -> ScoreOutcome {
        score_task(
            task,
            strategy,
            &WeightOverrides::new(),
            std::slice::from_ref(task),
            &Preferences::default(),
            today(),
        )
    }

    #[test]
    fn test_missing_fields_score_zero() {
        let mut task = sample(1, 2.0, 7);
        task.title = None;
        task.importance = None;
        let out = score(&task, Strategy::SmartBalance);
        assert_eq!(out.score, 0.0);
        assert_eq!(out.reason, "Missing required fields: title, importance");
        assert!(out.metadata.is_none());
    }

    #[test]
    fn test_smart_balance_weighted_sum() {
        // urgency 9.5, importance 7, effort 7.0, no dependents
        let out = score(&sample(1, 2.0, 7), Strategy::SmartBalance);
        assert_eq!(out.score, 6.35);
        assert_eq!(
            out.reason,
            "Balanced prioritization for optimal productivity | Due tomorrow | High importance"
        );
        let meta = out.metadata.unwrap();
        assert_eq!(meta.urgency_label, "Due Tomorrow");
        assert_eq!(meta.effort_label, "Medium(1-2h)");
        assert_eq!(meta.strategy_desc, "Balanced Mode");
        assert_eq!(meta.effort_score, 7.0);
        assert_eq!(meta.importance_score, 7.0);
        assert_eq!(meta.dependency_boost, 0.0);
    }

    #[test]
    fn test_fast_wins_rewards_short_tasks() {
        let quick = score(&sample(1, 0.5, 7), Strategy::FastWins);
        let slow = score(&sample(1, 8.0, 7), Strategy::FastWins);
        assert!(quick.score > slow.score);
        assert!(quick.reason.starts_with("Quick completion for maximum momentum"));
        assert!(quick.reason.contains("Quick win"));
    }

    #[test]
    fn test_high_impact_rewards_importance() {
        let high = score(&sample(1, 2.0, 10), Strategy::HighImpact);
        let low = score(&sample(1, 2.0, 2), Strategy::HighImpact);
        assert!(high.score > low.score);
        assert!(high.reason.contains("maximum impact"));
        assert!(high.reason.contains("Critical importance"));
    }

    #[test]
    fn test_deadline_driven_uses_crisis_urgency() {
        let out = score(&sample(0, 1.0, 5), Strategy::DeadlineDriven);
        let meta = out.metadata.unwrap();
        assert_eq!(meta.urgency_score, 15.0);
        assert_eq!(meta.strategy_desc, "Deadline Crisis Mode");
        // 15*0.65 + 5*0.15 + 6.7*0.1 = 11.17, clamped
        assert_eq!(out.score, 10.0);
        assert!(out.reason.contains("Due today"));
    }

    #[test]
    fn test_high_urgency_label_flag() {
        // 2 days out in crisis mode: 8.5 * 1.5 = 12.75 > 7
        let out = score(&sample(2, 1.0, 5), Strategy::DeadlineDriven);
        assert!(out.reason.contains("| Due in 2-3 days"));
        // a week out without crisis mode: 6.5, below the flag threshold
        let calm = score(&sample(5, 1.0, 5), Strategy::SmartBalance);
        assert!(!calm.reason.contains("Due this week"));
    }

    #[test]
    fn test_out_of_range_importance_is_used_as_given() {
        let out = score(&sample(1, 2.0, 15), Strategy::SmartBalance);
        assert!(out.score > 0.0);
        assert_eq!(out.metadata.unwrap().importance_score, 15.0);
    }

    #[test]
    fn test_dependents_add_blocks_flag() {
        let hub = sample(10, 3.0, 5);
        let batch = vec![
            hub.clone(),
            TaskRecord::new(2, "a").depends_on(1),
            TaskRecord::new(3, "b").depends_on(1),
        ];
        let out = score_task(
            &hub,
            Strategy::SmartBalance,
            &WeightOverrides::new(),
            &batch,
            &Preferences::default(),
            today(),
        );
        assert!(out.reason.ends_with("| Blocks 2 tasks"));
        assert_eq!(out.metadata.unwrap().dependency_boost, 4.0);

        let single = vec![hub.clone(), TaskRecord::new(2, "a").depends_on(1)];
        let out = score_task(
            &hub,
            Strategy::SmartBalance,
            &WeightOverrides::new(),
            &single,
            &Preferences::default(),
            today(),
        );
        assert!(out.reason.ends_with("| Blocks 1 task"));
    }

    #[test]
    fn test_heavy_dependency_weight_is_clamped() {
        let mut batch = vec![sample(60, 1.0, 1)];
        for i in 2..=11 {
            batch.push(TaskRecord::new(i, format!("t{i}")).depends_on(1));
        }
        let overrides =
            WeightOverrides::new().with(Strategy::SmartBalance, Weights::new(0.0, 0.0, 0.0, 1.0));
        let out = score_task(
            &batch[0],
            Strategy::SmartBalance,
            &overrides,
            &batch,
            &Preferences::default(),
            today(),
        );
        assert_eq!(out.metadata.unwrap().dependency_boost, 20.0);
        assert_eq!(out.score, 10.0);
    }

    #[test]
    fn test_low_energy_lowers_balanced_effort() {
        let task = sample(20, 1.0, 5);
        let tired = score_task(
            &task,
            Strategy::SmartBalance,
            &WeightOverrides::new(),
            std::slice::from_ref(&task),
            &Preferences::new(8.0, EnergyLevel::Low),
            today(),
        );
        let rested = score(&task, Strategy::SmartBalance);
        assert!(tired.score < rested.score);
    }
}
