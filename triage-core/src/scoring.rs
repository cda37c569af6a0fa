//! Component scorers: urgency, effort and dependency leverage.
//!
//! Each is a pure function of its inputs. Bad dates and bad durations fall back to
//! fixed low scores instead of failing, so partially filled tasks still rank.

use chrono::NaiveDate;

use crate::preferences::EnergyLevel;
use crate::strategy::Strategy;
use crate::task::{Estimate, TaskRecord};
use crate::time::{days_until, parse_due_date};

pub const DEFAULT_MAX_SCORE: f64 = 10.0;

/// Pre-multiplier ceiling for overdue tasks.
pub const OVERDUE_CAP: f64 = 15.0;

const CRISIS_MULTIPLIER: f64 = 1.5;

/// Score a task without a usable date or duration gets.
pub const FALLBACK_SCORE: f64 = 1.0;

/// Leverage points per dependent task.
pub const DEPENDENT_BOOST: f64 = 2.0;

/// Urgency bucket derived from days until due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBand {
    Overdue,
    DueToday,
    DueTomorrow,
    DueSoon,
    ThisWeek,
    TwoWeeks,
    ThisMonth,
    Future,
    NoDeadline,
}

impl UrgencyBand {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d < 0 => UrgencyBand::Overdue,
            0 => UrgencyBand::DueToday,
            1 => UrgencyBand::DueTomorrow,
            2..=3 => UrgencyBand::DueSoon,
            4..=7 => UrgencyBand::ThisWeek,
            8..=14 => UrgencyBand::TwoWeeks,
            15..=30 => UrgencyBand::ThisMonth,
            _ => UrgencyBand::Future,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UrgencyBand::Overdue => "OVERDUE",
            UrgencyBand::DueToday => "Due Today",
            UrgencyBand::DueTomorrow => "Due Tomorrow",
            UrgencyBand::DueSoon => "Due in 2-3 days",
            UrgencyBand::ThisWeek => "Due this week",
            UrgencyBand::TwoWeeks => "Due in 2 weeks",
            UrgencyBand::ThisMonth => "Due this month",
            UrgencyBand::Future => "Future task",
            UrgencyBand::NoDeadline => "No deadline",
        }
    }

    /// Fraction of the max score for bands that scale with it.
    fn factor(self) -> f64 {
        match self {
            UrgencyBand::DueToday => 1.0,
            UrgencyBand::DueTomorrow => 0.95,
            UrgencyBand::DueSoon => 0.85,
            UrgencyBand::ThisWeek => 0.65,
            UrgencyBand::TwoWeeks => 0.45,
            UrgencyBand::ThisMonth => 0.25,
            UrgencyBand::Future => 0.1,
            UrgencyBand::Overdue | UrgencyBand::NoDeadline => 0.0,
        }
    }
}

/// Urgency from a due-date string relative to `today`.
///
/// Overdue tasks get `max + days_late * rate` (rate 1.0 in crisis mode, else 0.5),
/// capped at 15 before the crisis multiplier. Tasks more than 30 days out ignore the
/// multiplier.
pub fn calculate_urgency_score(
    due_date: Option<&str>,
    max_score: f64,
    crisis_mode: bool,
    today: NaiveDate,
) -> (f64, UrgencyBand) {
    let Some(due) = due_date.and_then(|s| parse_due_date(s).ok()) else {
        return (FALLBACK_SCORE, UrgencyBand::NoDeadline);
    };

    let days = days_until(due, today);
    let multiplier = if crisis_mode { CRISIS_MULTIPLIER } else { 1.0 };
    let band = UrgencyBand::for_days(days);

    let score = match band {
        UrgencyBand::Overdue => {
            let rate = if crisis_mode { 1.0 } else { 0.5 };
            let penalty = days.unsigned_abs() as f64 * rate;
            (max_score + penalty).min(OVERDUE_CAP) * multiplier
        }
        UrgencyBand::Future => max_score * band.factor(),
        _ => max_score * band.factor() * multiplier,
    };

    (score, band)
}

/// Duration bucket for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffortBand {
    Quick,
    Short,
    Medium,
    Focused,
    DeepWork,
    /// No usable duration.
    Unsized,
}

impl EffortBand {
    pub fn for_hours(hours: f64) -> Self {
        match hours {
            h if h <= 0.5 => EffortBand::Quick,
            h if h <= 1.0 => EffortBand::Short,
            h if h <= 2.0 => EffortBand::Medium,
            h if h <= 4.0 => EffortBand::Focused,
            _ => EffortBand::DeepWork,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EffortBand::Quick => "Quick(<30min)",
            EffortBand::Short => "Short(<1h)",
            EffortBand::Medium => "Medium(1-2h)",
            EffortBand::Focused => "Focused(2-4h)",
            EffortBand::DeepWork => "Deep work(4h+)",
            EffortBand::Unsized => "Quick task",
        }
    }
}

/// Effort score: shorter tasks score higher, how much depends on the strategy.
///
/// `high_impact` and `deadline_driven` ignore energy; the other two scale by it.
pub fn calculate_effort_score(
    estimate: Option<&Estimate>,
    strategy: Strategy,
    energy: EnergyLevel,
) -> (f64, EffortBand) {
    let hours = match estimate.and_then(Estimate::hours) {
        Some(h) if h > 0.0 => h,
        _ => return (FALLBACK_SCORE, EffortBand::Unsized),
    };

    let modifier = energy.modifier();
    let score = match strategy {
        Strategy::FastWins => (10.0 - hours.powf(1.5)).max(1.0) * modifier,
        Strategy::HighImpact => (6.0 - hours * 0.2).max(4.0),
        Strategy::DeadlineDriven => (7.0 - hours * 0.3).max(2.0),
        Strategy::SmartBalance => (8.0 - hours * 0.5).max(1.0) * modifier,
    };

    (score, EffortBand::for_hours(hours))
}

/// Two points for every other task in the batch that depends on `task`. Uncapped.
pub fn calculate_dependency_boost(task: &TaskRecord, all_tasks: &[TaskRecord]) -> f64 {
    task.dependent_count(all_tasks) as f64 * DEPENDENT_BOOST
}
