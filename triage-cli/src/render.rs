//! Plain-text rendering of analysis results for the terminal.

use chrono::NaiveDate;
use std::fmt::{self, Write};

use triage_core::{AnalysisResult, Insights, ScoredTask, Suggestions, TaskRecord};

fn write_task_line(out: &mut String, rank: usize, st: &ScoredTask) -> fmt::Result {
    let today_marker = if st.can_complete_today { "today" } else { "later" };
    writeln!(
        out,
        "{rank:>2}. [{:<8}] {:>5.2}  {}  ({today_marker})\n      {}",
        st.priority_level.as_str(),
        st.score,
        st.task.display_title(),
        st.reason
    )
}

fn write_insights(out: &mut String, i: &Insights) -> fmt::Result {
    writeln!(out, "## Insights\n")?;
    writeln!(
        out,
        "- Fits today: {} tasks, {:.1}h of {:.1}h available ({:.1}%)",
        i.tasks_completable_today, i.hours_completable_today, i.available_hours, i.productivity_ratio
    )?;
    writeln!(out, "- Total work: {:.1}h", i.total_hours_needed)?;
    writeln!(out, "- Overdue: {} | Urgent: {}", i.overdue_tasks, i.urgent_tasks)?;
    writeln!(out, "- Energy: {}", i.energy_level)
}

fn write_warnings(out: &mut String, warnings: &[String]) -> fmt::Result {
    if warnings.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n## Warnings\n")?;
    for w in warnings {
        writeln!(out, "- {w}")?;
    }
    Ok(())
}

pub fn render_analysis(result: &AnalysisResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "# Ranked with {} ({})\n",
        result.strategy_used, result.strategy_description
    )?;

    if result.analyzed_tasks.is_empty() {
        writeln!(out, "(no tasks ranked)\n")?;
    }
    for (i, st) in result.analyzed_tasks.iter().enumerate() {
        write_task_line(&mut out, i + 1, st)?;
    }

    if let Some(insights) = &result.insights {
        writeln!(out)?;
        write_insights(&mut out, insights)?;
    }
    write_warnings(&mut out, &result.warnings)?;
    Ok(out)
}

pub fn render_suggestions(s: &Suggestions) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "# Top {} of {} ({})\n",
        s.suggestions.len(),
        s.total_evaluated,
        s.strategy_used
    )?;
    for (i, st) in s.suggestions.iter().enumerate() {
        write_task_line(&mut out, i + 1, st)?;
    }
    Ok(out)
}

pub fn render_task_list(tasks: &[TaskRecord], today: NaiveDate) -> Result<String, fmt::Error> {
    if tasks.is_empty() {
        return Ok("No tasks stored. Add one with: triage add --title ...\n".to_string());
    }

    let mut out = String::new();
    for t in tasks {
        let due = match t.days_until_due(today) {
            Some(d) if d < 0 => format!("overdue by {}d", -d),
            Some(0) => "due today".to_string(),
            Some(d) => format!("due in {d}d"),
            None => "no due date".to_string(),
        };
        let hours = t
            .estimated_hours
            .as_ref()
            .and_then(|e| e.hours())
            .map(|h| format!("{h:.1}h"))
            .unwrap_or_else(|| "?h".to_string());
        let importance = t
            .importance
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "?".to_string());

        writeln!(
            out,
            "{:>4}  {}  [{due}, {hours}, importance {importance}, depends on {}, blocks {}]",
            t.id,
            t.display_title(),
            t.dependency_count(),
            t.dependent_count(tasks)
        )?;
    }
    Ok(out)
}
