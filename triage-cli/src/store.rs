//! File-backed task store: a pretty-printed JSON array of task records.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

use triage_core::{TaskId, TaskRecord, validate_task};

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored tasks; empty when the file does not exist yet.
    pub fn load(&self) -> Result<Vec<TaskRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&s).with_context(|| format!("parse {}", self.path.display()))
    }

    pub fn save(&self, tasks: &[TaskRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }

    /// Validate and append `task`, returning the stored record.
    ///
    /// An empty id gets the next free numeric id.
    pub fn add(&self, mut task: TaskRecord) -> Result<TaskRecord> {
        let mut tasks = self.load()?;

        if task.id.as_str().is_empty() {
            task.id = next_id(&tasks);
        }
        if tasks.iter().any(|t| t.id == task.id) {
            bail!("task {} already exists", task.id);
        }
        for dep in &task.dependencies {
            if *dep != task.id && !tasks.iter().any(|t| t.id == *dep) {
                bail!("unknown dependency: {dep}");
            }
        }
        validate_task(&task).with_context(|| format!("invalid task {}", task.id))?;

        tasks.push(task.clone());
        self.save(&tasks)?;
        tracing::debug!(id = %task.id, path = %self.path.display(), "stored task");
        Ok(task)
    }

    /// Remove a task and drop it from every other task's dependencies.
    pub fn remove(&self, id: &TaskId) -> Result<TaskRecord> {
        let mut tasks = self.load()?;
        let Some(pos) = tasks.iter().position(|t| t.id == *id) else {
            bail!("no task with id {id}");
        };
        let removed = tasks.remove(pos);
        for t in tasks.iter_mut() {
            t.dependencies.retain(|d| d != id);
        }
        self.save(&tasks)?;
        Ok(removed)
    }
}

fn next_id(tasks: &[TaskRecord]) -> TaskId {
    let max = tasks
        .iter()
        .filter_map(|t| t.id.as_str().parse::<i64>().ok())
        .max()
        .unwrap_or(0);
    TaskId::from(max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str) -> TaskRecord {
        TaskRecord::new(id, title)
            .with_due_date("2026-07-01")
            .with_hours(1.5)
            .with_importance(6)
    }

    fn store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        (dir, store)
    }

    #[test]
    fn empty_store_loads_nothing() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_assigns_ids_and_persists() {
        let (_dir, store) = store();
        let a = store.add(record("", "first")).unwrap();
        let b = store.add(record("", "second").depends_on(a.id.clone())).unwrap();

        assert_eq!(a.id.as_str(), "1");
        assert_eq!(b.id.as_str(), "2");
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].dependencies, vec![TaskId::from("1")]);
    }

    #[test]
    fn add_rejects_invalid_tasks() {
        let (_dir, store) = store();
        store.add(record("7", "seven")).unwrap();

        assert!(store.add(record("7", "dup")).is_err());
        assert!(store.add(record("", "orphan").depends_on("99")).is_err());
        assert!(store.add(record("8", "self").depends_on("8")).is_err());
        assert!(store.add(record("", "zero").with_hours(0.0)).is_err());
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn remove_strips_dependency_references() {
        let (_dir, store) = store();
        store.add(record("1", "base")).unwrap();
        store.add(record("2", "child").depends_on("1")).unwrap();

        let removed = store.remove(&TaskId::from("1")).unwrap();
        assert_eq!(removed.display_title(), "base");
        let left = store.load().unwrap();
        assert_eq!(left.len(), 1);
        assert!(left[0].dependencies.is_empty());
        assert!(store.remove(&TaskId::from("1")).is_err());
    }
}
