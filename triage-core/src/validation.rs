//! Checks a task must pass before it is stored.
//!
//! The engine tolerates all of these; storage does not.

use thiserror::Error;

use crate::task::TaskRecord;
use crate::time::parse_due_date;

pub const MAX_TITLE_LEN: usize = 200;
pub const MIN_ESTIMATED_HOURS: f64 = 0.1;
pub const IMPORTANCE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("title must be at most {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },

    #[error("due_date is required")]
    MissingDueDate,

    #[error("invalid due_date '{0}': expected YYYY-MM-DD")]
    InvalidDueDate(String),

    #[error("estimated_hours is required")]
    MissingEstimate,

    #[error("estimated_hours must be a number of at least 0.1")]
    InvalidEstimate,

    #[error("importance is required")]
    MissingImportance,

    #[error("importance must be a number")]
    InvalidImportance,

    #[error("importance must be between 1 and 10 (got {0})")]
    ImportanceOutOfRange(f64),

    #[error("a task cannot depend on itself")]
    SelfDependency,
}

/// First problem found, checking fields in declaration order.
pub fn validate_task(task: &TaskRecord) -> Result<(), ValidationError> {
    let title = task.title.as_deref().ok_or(ValidationError::MissingTitle)?;
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    let len = title.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: MAX_TITLE_LEN,
        });
    }

    let due = task.due_date.as_deref().ok_or(ValidationError::MissingDueDate)?;
    parse_due_date(due).map_err(|_| ValidationError::InvalidDueDate(due.to_string()))?;

    let estimate = task
        .estimated_hours
        .as_ref()
        .ok_or(ValidationError::MissingEstimate)?;
    match estimate.hours() {
        Some(h) if h >= MIN_ESTIMATED_HOURS => {}
        _ => return Err(ValidationError::InvalidEstimate),
    }

    let importance = task
        .importance
        .as_ref()
        .ok_or(ValidationError::MissingImportance)?
        .value()
        .ok_or(ValidationError::InvalidImportance)?;
    if !IMPORTANCE_RANGE.contains(&importance) {
        return Err(ValidationError::ImportanceOutOfRange(importance));
    }

    if task.dependencies.contains(&task.id) {
        return Err(ValidationError::SelfDependency);
    }

    Ok(())
}
