//! Per-task dependency statistics

use serde::Serialize;
use std::collections::{HashSet, VecDeque};

use super::graph::{DependencyGraph, GraphNode};
use super::task::Task;

/// Aggregate dependency figures for one task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DependencyStats<'a> {
    /// Entries in the task's own `dependencies` list
    pub direct_dependencies: usize,
    /// Distinct tasks reachable by following dependencies
    pub total_dependencies: usize,
    /// Tasks listing this one directly
    pub direct_dependents: usize,
    /// Distinct tasks reachable by following dependents
    pub total_dependents: usize,
    pub is_blocked: bool,
    /// Direct dependencies that are not completed
    pub blocking_tasks: Vec<&'a Task>,
}

/// Counts distinct tasks reachable from `start`, excluding `start` itself
fn reachable<'a, F>(graph: &DependencyGraph<'a>, start: &'a str, next: F) -> usize
where
    F: for<'n> Fn(&'n GraphNode<'a>) -> &'n [&'a Task],
{
    let mut seen: HashSet<&'a str> = HashSet::from([start]);
    let mut queue: VecDeque<&'a str> = VecDeque::from([start]);

    while let Some(id) = queue.pop_front() {
        let Some(node) = graph.node(id) else {
            continue;
        };
        for &task in next(node) {
            let task_id = task.id.as_str();
            if seen.insert(task_id) {
                queue.push_back(task_id);
            }
        }
    }

    seen.len() - 1
}

/// Computes dependency statistics for `task_id` within a built graph
///
/// An unknown ID yields all-zero stats.
pub fn stats_from_graph<'a>(task_id: &str, graph: &DependencyGraph<'a>) -> DependencyStats<'a> {
    let Some(node) = graph.node(task_id) else {
        return DependencyStats::default();
    };
    let id = node.id().as_str();

    DependencyStats {
        direct_dependencies: node.task.dependencies.len(),
        total_dependencies: reachable(graph, id, |n| n.dependencies.as_slice()),
        direct_dependents: node.dependents.len(),
        total_dependents: reachable(graph, id, |n| n.dependents.as_slice()),
        is_blocked: node.is_blocked,
        blocking_tasks: node
            .dependencies
            .iter()
            .copied()
            .filter(|dep| !dep.status.is_complete())
            .collect(),
    }
}

/// Computes dependency statistics for one task of a snapshot
pub fn task_dependency_stats<'a>(task_id: &str, tasks: &'a [Task]) -> DependencyStats<'a> {
    stats_from_graph(task_id, &DependencyGraph::build(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskStatus;

    fn make_task(id: &str, status: TaskStatus, deps: &[&str]) -> Task {
        let mut task = Task::new(id.parse().unwrap(), format!("Task {}", id));
        task.status = status;
        task.dependencies = deps.iter().map(|d| d.parse().unwrap()).collect();
        task
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            make_task("task1", TaskStatus::Todo, &[]),
            make_task("task2", TaskStatus::Todo, &["task1"]),
            make_task("task3", TaskStatus::Todo, &["task2"]),
            make_task("task4", TaskStatus::Todo, &["task1"]),
        ]
    }

    #[test]
    fn counts_direct_and_total_dependents() {
        let tasks = sample_tasks();
        let stats = task_dependency_stats("task1", &tasks);

        assert_eq!(stats.direct_dependents, 2);
        assert_eq!(stats.total_dependents, 3);
        assert_eq!(stats.direct_dependencies, 0);
        assert_eq!(stats.total_dependencies, 0);
        assert!(!stats.is_blocked);
        assert!(stats.blocking_tasks.is_empty());
    }

    #[test]
    fn counts_transitive_dependencies() {
        let tasks = sample_tasks();
        let stats = task_dependency_stats("task3", &tasks);

        assert_eq!(stats.direct_dependencies, 1);
        assert_eq!(stats.total_dependencies, 2);
        assert_eq!(stats.direct_dependents, 0);
        assert!(stats.is_blocked);

        let blocking: Vec<_> = stats.blocking_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(blocking, vec!["task2"]);
    }

    #[test]
    fn diamond_not_double_counted() {
        let tasks = vec![
            make_task("bottom", TaskStatus::Todo, &[]),
            make_task("left", TaskStatus::Todo, &["bottom"]),
            make_task("right", TaskStatus::Todo, &["bottom"]),
            make_task("top", TaskStatus::Todo, &["left", "right"]),
        ];

        let top = task_dependency_stats("top", &tasks);
        assert_eq!(top.total_dependencies, 3);

        let bottom = task_dependency_stats("bottom", &tasks);
        assert_eq!(bottom.direct_dependents, 2);
        assert_eq!(bottom.total_dependents, 3);
    }

    #[test]
    fn blocking_tasks_only_incomplete() {
        let tasks = vec![
            make_task("done", TaskStatus::Completed, &[]),
            make_task("open", TaskStatus::InProgress, &[]),
            make_task("target", TaskStatus::Todo, &["done", "open", "ghost"]),
        ];

        let stats = task_dependency_stats("target", &tasks);
        assert_eq!(stats.direct_dependencies, 3);
        assert_eq!(stats.total_dependencies, 2);
        assert!(stats.is_blocked);

        let blocking: Vec<_> = stats.blocking_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(blocking, vec!["open"]);
    }

    #[test]
    fn unknown_task_yields_zero_stats() {
        let tasks = sample_tasks();
        let stats = task_dependency_stats("missing", &tasks);

        assert_eq!(stats, DependencyStats::default());
    }

    #[test]
    fn cycle_excludes_self_from_totals() {
        let tasks = vec![
            make_task("a", TaskStatus::Todo, &["b"]),
            make_task("b", TaskStatus::Todo, &["a"]),
        ];

        let stats = task_dependency_stats("a", &tasks);
        assert_eq!(stats.total_dependencies, 1);
        assert_eq!(stats.total_dependents, 1);
    }

    #[test]
    fn self_dependency_excluded_from_totals() {
        let tasks = vec![make_task("a", TaskStatus::Todo, &["a"])];

        let stats = task_dependency_stats("a", &tasks);
        assert_eq!(stats.direct_dependencies, 1);
        assert_eq!(stats.total_dependencies, 0);
        assert_eq!(stats.direct_dependents, 1);
        assert_eq!(stats.total_dependents, 0);
    }
}
