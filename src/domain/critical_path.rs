//! Critical path: the longest chain of tasks linked by dependency edges
//!
//! Length counts tasks, not effort. For every task the longest chain ending
//! at it is memoized (`1` for a task with no resolved dependencies, otherwise
//! `1 + max` over its dependencies). A task still being computed is skipped
//! when reached again, so cyclic input terminates.

use std::collections::HashMap;
use tracing::debug;

use super::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done(usize),
}

struct ChainSearch<'a> {
    tasks: HashMap<&'a str, &'a Task>,
    marks: HashMap<&'a str, Mark>,
    /// The dependency that produced each task's maximum
    best_prev: HashMap<&'a str, &'a str>,
}

impl<'a> ChainSearch<'a> {
    fn new(tasks: &'a [Task]) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for task in tasks {
            by_id.entry(task.id.as_str()).or_insert(task);
        }

        Self {
            tasks: by_id,
            marks: HashMap::with_capacity(tasks.len()),
            best_prev: HashMap::new(),
        }
    }

    fn chain_length(&mut self, id: &'a str) -> usize {
        match self.marks.get(id) {
            Some(Mark::Done(len)) => return *len,
            Some(Mark::InProgress) => return 0,
            None => {}
        }

        let Some(task) = self.tasks.get(id).copied() else {
            return 0;
        };

        self.marks.insert(id, Mark::InProgress);

        let mut best = 0;
        let mut prev = None;
        for dep in &task.dependencies {
            let dep = dep.as_str();
            if !self.tasks.contains_key(dep) || self.marks.get(dep) == Some(&Mark::InProgress) {
                continue;
            }
            let len = self.chain_length(dep);
            if len > best {
                best = len;
                prev = Some(dep);
            }
        }

        if let Some(prev) = prev {
            self.best_prev.insert(id, prev);
        }

        let len = best + 1;
        self.marks.insert(id, Mark::Done(len));
        len
    }
}

/// Returns the longest dependency chain, ordered from root to tip
///
/// Ties are broken in favour of the tip that appears first in the snapshot.
/// Non-empty input always yields at least one task.
pub fn calculate_critical_path(tasks: &[Task]) -> Vec<&Task> {
    let mut search = ChainSearch::new(tasks);

    let mut tip: Option<(&str, usize)> = None;
    for task in tasks {
        let len = search.chain_length(task.id.as_str());
        if tip.map_or(true, |(_, best)| len > best) {
            tip = Some((task.id.as_str(), len));
        }
    }

    let Some((tip_id, tip_len)) = tip else {
        return Vec::new();
    };

    // best_prev always points at a strictly shorter chain, so this terminates
    let mut path = Vec::with_capacity(tip_len);
    let mut cursor = Some(tip_id);
    while let Some(id) = cursor {
        path.push(search.tasks[id]);
        cursor = search.best_prev.get(id).copied();
    }
    path.reverse();

    debug!(tip = tip_id, length = path.len(), "critical path computed");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_task(id: &str, deps: &[&str]) -> Task {
        let mut task = Task::new(id.parse().unwrap(), format!("Task {}", id));
        task.dependencies = deps.iter().map(|d| d.parse().unwrap()).collect();
        task
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn picks_longest_branch() {
        let tasks = vec![
            make_task("task1", &[]),
            make_task("task2", &["task1"]),
            make_task("task3", &["task2"]),
            make_task("task4", &["task1"]),
        ];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["task1", "task2", "task3"]);
    }

    #[test]
    fn empty_input_yields_empty_path() {
        assert!(calculate_critical_path(&[]).is_empty());
    }

    #[test]
    fn independent_tasks_yield_single_task() {
        let tasks = vec![make_task("a", &[]), make_task("b", &[])];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["a"]);
    }

    #[test]
    fn input_order_does_not_change_length() {
        // Tip listed before its dependencies
        let tasks = vec![
            make_task("d", &["c"]),
            make_task("c", &["b"]),
            make_task("b", &["a"]),
            make_task("a", &[]),
        ];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn follows_longest_dependency_in_diamond() {
        // top depends on short (len 1) and long (len 3)
        let tasks = vec![
            make_task("short", &[]),
            make_task("base", &[]),
            make_task("mid", &["base"]),
            make_task("long", &["mid"]),
            make_task("top", &["short", "long"]),
        ];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["base", "mid", "long", "top"]);
    }

    #[test]
    fn dangling_dependencies_ignored() {
        let tasks = vec![make_task("a", &["ghost"]), make_task("b", &["a"])];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["a", "b"]);
    }

    #[test]
    fn terminates_on_cycle() {
        let tasks = vec![
            make_task("a", &["b"]),
            make_task("b", &["c"]),
            make_task("c", &["a"]),
        ];

        let path = calculate_critical_path(&tasks);
        assert!(!path.is_empty());
        assert!(path.len() <= 3);
    }

    #[test]
    fn terminates_on_self_dependency() {
        let tasks = vec![make_task("a", &["a"]), make_task("b", &["a"])];

        let path = calculate_critical_path(&tasks);
        assert_eq!(ids(&path), vec!["a", "b"]);
    }

    #[test]
    fn returns_original_tasks() {
        let tasks = vec![make_task("a", &[]), make_task("b", &["a"])];

        let path = calculate_critical_path(&tasks);
        assert!(std::ptr::eq(path[0], &tasks[0]));
        assert!(std::ptr::eq(path[1], &tasks[1]));
    }
}
