//! Task records as they arrive from callers.
//!
//! Fields the scorer needs are optional on purpose: a partially filled record is a
//! normal input and gets a zero score with an explanation instead of a parse failure.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::time::{days_until, parse_due_date};

/// Identifier of a task, unique within one analysis batch.
///
/// Accepts both `1` and `"1"` on input; always serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => TaskId(n.to_string()),
            RawId::Text(s) => TaskId(s),
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<i32> for TaskId {
    fn from(n: i32) -> Self {
        Self(n.to_string())
    }
}

/// Estimated duration in hours, as supplied.
///
/// Callers sometimes send numbers as strings; text that parses as a finite float
/// counts as numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estimate {
    Hours(f64),
    Text(String),
}

impl Estimate {
    /// Numeric hours, or `None` when the value is not a finite number.
    pub fn hours(&self) -> Option<f64> {
        let hours = match self {
            Estimate::Hours(h) => *h,
            Estimate::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        hours.is_finite().then_some(hours)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Hours(h) => write!(f, "{h}"),
            Estimate::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<f64> for Estimate {
    fn from(h: f64) -> Self {
        Estimate::Hours(h)
    }
}

/// Importance as supplied: 1-10, higher means more important.
///
/// Fractions and numeric strings are accepted; other text fails that task only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Importance {
    Value(f64),
    Text(String),
}

impl Importance {
    /// Numeric importance, or `None` when the value is not a finite number.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Importance::Value(v) => *v,
            Importance::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Importance::Value(v) => write!(f, "{v}"),
            Importance::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for Importance {
    fn from(v: i64) -> Self {
        Importance::Value(v as f64)
    }
}

impl From<i32> for Importance {
    fn from(v: i32) -> Self {
        Importance::Value(v.into())
    }
}

impl From<f64> for Importance {
    fn from(v: f64) -> Self {
        Importance::Value(v)
    }
}

/// Scalar JSON values are kept as text; `20260101` becomes `"20260101"` and then
/// fails date parsing like any other malformed date.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawText {
        Text(String),
        Int(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<RawText>::deserialize(deserializer)?.map(|raw| match raw {
        RawText::Text(s) => s,
        RawText::Int(n) => n.to_string(),
        RawText::Float(x) => x.to_string(),
        RawText::Flag(b) => b.to_string(),
    }))
}

/// One task in an analysis batch. The engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,

    pub title: Option<String>,

    /// ISO calendar date (`YYYY-MM-DD`). Kept as text so bad input reaches the
    /// urgency fallback instead of failing the whole request.
    #[serde(default, deserialize_with = "lenient_text")]
    pub due_date: Option<String>,

    pub estimated_hours: Option<Estimate>,

    pub importance: Option<Importance>,

    /// Ids of tasks that must complete before this one.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

/// Field names the composer requires, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["title", "due_date", "estimated_hours", "importance"];

impl TaskRecord {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    pub fn due_on(self, date: NaiveDate) -> Self {
        self.with_due_date(date.format("%Y-%m-%d").to_string())
    }

    pub fn with_hours(mut self, hours: impl Into<Estimate>) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    pub fn with_importance(mut self, importance: impl Into<Importance>) -> Self {
        self.importance = Some(importance.into());
        self
    }

    pub fn depends_on(mut self, id: impl Into<TaskId>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Title for messages; `Unknown` when absent.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    /// Required fields that are absent, in `REQUIRED_FIELDS` order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.title.is_some(),
            self.due_date.is_some(),
            self.estimated_hours.is_some(),
            self.importance.is_some(),
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Parsed due date; `None` when absent or unparseable.
    pub fn due(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(|s| parse_due_date(s).ok())
    }

    /// Days until due (negative when overdue).
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        self.due().map(|due| days_until(due, today))
    }

    /// Unparseable or missing due dates are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due().is_some_and(|due| due < today)
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Number of other tasks in `batch` that list this task as a dependency.
    pub fn dependent_count(&self, batch: &[TaskRecord]) -> usize {
        batch
            .iter()
            .filter(|other| other.id != self.id && other.dependencies.contains(&self.id))
            .count()
    }
}
