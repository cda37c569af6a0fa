//! Dependency graph over one task batch, with cycle detection.
//!
//! Edge `u -> v` means "u depends on v". Dependencies naming ids outside the batch
//! are dropped when the graph is built.

use std::collections::{HashMap, HashSet};

use crate::task::{TaskId, TaskRecord};

/// Adjacency view of a batch, borrowed from the records.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    /// Ids in first-seen batch order.
    order: Vec<&'a TaskId>,
    edges: HashMap<&'a TaskId, Vec<&'a TaskId>>,
    titles: HashMap<&'a TaskId, &'a str>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph. A repeated id keeps the last record's title and edges.
    pub fn from_tasks(tasks: &'a [TaskRecord]) -> Self {
        let known: HashSet<&TaskId> = tasks.iter().map(|t| &t.id).collect();

        let mut order = Vec::with_capacity(tasks.len());
        let mut edges = HashMap::with_capacity(tasks.len());
        let mut titles = HashMap::with_capacity(tasks.len());

        for task in tasks {
            let deps: Vec<&TaskId> = task
                .dependencies
                .iter()
                .filter(|d| known.contains(d))
                .collect();
            if edges.insert(&task.id, deps).is_none() {
                order.push(&task.id);
            }
            titles.insert(&task.id, task.title.as_deref().unwrap_or(task.id.as_str()));
        }

        Self {
            order,
            edges,
            titles,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn dependencies_of(&self, id: &TaskId) -> &[&'a TaskId] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn title_of(&self, id: &TaskId) -> Option<&'a str> {
        self.titles.get(id).copied()
    }

    /// Every id on at least one cycle, in order of first detection.
    ///
    /// Each node is expanded once; a back edge to a node on the current path marks
    /// the path from that node to the tip. The search keeps going after a hit, so
    /// separate cycles are all found.
    pub fn cycle_members(&self) -> Vec<&'a TaskId> {
        let mut search = CycleSearch::default();
        for &id in &self.order {
            if !search.visited.contains(id) {
                search.visit(self, id);
            }
        }
        search.members
    }
}

#[derive(Default)]
struct CycleSearch<'a> {
    visited: HashSet<&'a TaskId>,
    on_path: HashSet<&'a TaskId>,
    path: Vec<&'a TaskId>,
    members: Vec<&'a TaskId>,
    seen: HashSet<&'a TaskId>,
}

impl<'a> CycleSearch<'a> {
    /// Depth-first walk from `root` with an explicit stack of (node, next edge).
    fn visit(&mut self, graph: &DependencyGraph<'a>, root: &'a TaskId) {
        self.enter(root);
        let mut stack: Vec<(&'a TaskId, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            top.1 += 1;

            match graph.dependencies_of(node).get(next) {
                Some(&dep) if self.on_path.contains(dep) => self.mark_cycle_from(dep),
                Some(&dep) if !self.visited.contains(dep) => {
                    self.enter(dep);
                    stack.push((dep, 0));
                }
                Some(_) => {}
                None => {
                    stack.pop();
                    self.on_path.remove(node);
                    self.path.pop();
                }
            }
        }
    }

    fn enter(&mut self, node: &'a TaskId) {
        self.visited.insert(node);
        self.on_path.insert(node);
        self.path.push(node);
    }

    fn mark_cycle_from(&mut self, start: &'a TaskId) {
        let Some(pos) = self.path.iter().position(|&n| n == start) else {
            return;
        };
        for &id in &self.path[pos..] {
            if self.seen.insert(id) {
                self.members.push(id);
            }
        }
    }
}

/// Titles of tasks that take part in a dependency cycle.
///
/// Missing titles fall back to the task id.
pub fn detect_circular_dependencies(tasks: &[TaskRecord]) -> Vec<String> {
    let graph = DependencyGraph::from_tasks(tasks);
    graph
        .cycle_members()
        .into_iter()
        .map(|id| graph.title_of(id).unwrap_or(id.as_str()).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, deps: &[i64]) -> TaskRecord {
        deps.iter()
            .fold(TaskRecord::new(id, format!("Task {id}")), |t, d| t.depends_on(*d))
    }

    #[test]
    fn no_cycle_in_chain() {
        let tasks = vec![task(1, &[]), task(2, &[1]), task(3, &[2])];
        assert!(detect_circular_dependencies(&tasks).is_empty());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let tasks = vec![task(1, &[2, 3]), task(2, &[4]), task(3, &[4]), task(4, &[])];
        assert!(detect_circular_dependencies(&tasks).is_empty());
    }

    #[test]
    fn mutual_dependency() {
        let tasks = vec![task(1, &[2]), task(2, &[1])];
        assert_eq!(detect_circular_dependencies(&tasks), vec!["Task 1", "Task 2"]);
    }

    #[test]
    fn three_node_cycle() {
        let tasks = vec![task(1, &[3]), task(2, &[1]), task(3, &[2])];
        let cycle = detect_circular_dependencies(&tasks);
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle, vec!["Task 1", "Task 3", "Task 2"]);
    }

    #[test]
    fn self_dependency_is_a_one_node_cycle() {
        let tasks = vec![task(1, &[1]), task(2, &[1])];
        assert_eq!(detect_circular_dependencies(&tasks), vec!["Task 1"]);
    }

    #[test]
    fn tail_leading_into_cycle_is_excluded() {
        // 1 -> 2 -> 3 -> 2
        let tasks = vec![task(1, &[2]), task(2, &[3]), task(3, &[2])];
        assert_eq!(detect_circular_dependencies(&tasks), vec!["Task 2", "Task 3"]);
    }

    #[test]
    fn independent_cycles_are_both_found() {
        // 1 <-> 2 reached first from 1; 3 -> 4 -> 3 hangs off 1 as a later branch.
        let tasks = vec![task(1, &[2, 3]), task(2, &[1]), task(3, &[4]), task(4, &[3])];
        assert_eq!(
            detect_circular_dependencies(&tasks),
            vec!["Task 1", "Task 2", "Task 3", "Task 4"]
        );
    }

    #[test]
    fn node_on_two_cycles_reported_once() {
        let tasks = vec![task(1, &[2, 3]), task(2, &[1]), task(3, &[1])];
        assert_eq!(
            detect_circular_dependencies(&tasks),
            vec!["Task 1", "Task 2", "Task 3"]
        );
    }

    #[test]
    fn unknown_dependency_ids_are_ignored() {
        let tasks = vec![task(1, &[99]), task(2, &[1, 42])];
        let graph = DependencyGraph::from_tasks(&tasks);
        assert!(graph.dependencies_of(&TaskId::from(1)).is_empty());
        assert_eq!(graph.dependencies_of(&TaskId::from(2)).len(), 1);
        assert!(graph.cycle_members().is_empty());
    }

    #[test]
    fn long_chain_does_not_exhaust_the_stack() {
        let n = 100_000;
        let mut tasks: Vec<TaskRecord> = (1..=n).map(|i| task(i, &[i - 1])).collect();
        tasks[0].dependencies.clear();
        assert!(detect_circular_dependencies(&tasks).is_empty());

        // close the chain: every link is now on one cycle
        tasks[0] = task(1, &[n]);
        let cycle = detect_circular_dependencies(&tasks);
        assert_eq!(cycle.len(), n as usize);
        assert_eq!(cycle[0], "Task 1");
        assert_eq!(cycle[1], format!("Task {n}"));
    }

    #[test]
    fn untitled_cycle_member_reports_id() {
        let mut a = task(1, &[2]);
        a.title = None;
        let tasks = vec![a, task(2, &[1])];
        assert_eq!(detect_circular_dependencies(&tasks), vec!["1", "Task 2"]);
    }
}
