//! Circular dependency detection
//!
//! Depth-first search over the `dependencies` relation (an edge `A -> B`
//! means "A depends on B"). A global visited set keeps every task from being
//! expanded twice; the current path tells "mid-traversal" apart from "fully
//! explored". Reaching a task that is on the current path closes a cycle.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::id::TaskId;
use super::task::Task;

struct CycleSearch<'a> {
    tasks: HashMap<&'a str, &'a Task>,
    visited: HashSet<&'a str>,
    on_path: HashMap<&'a str, usize>,
    path: Vec<&'a str>,
    seen: HashSet<Vec<&'a str>>,
    cycles: Vec<Vec<TaskId>>,
}

impl<'a> CycleSearch<'a> {
    fn new(tasks: &'a [Task]) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for task in tasks {
            by_id.entry(task.id.as_str()).or_insert(task);
        }

        Self {
            tasks: by_id,
            visited: HashSet::new(),
            on_path: HashMap::new(),
            path: Vec::new(),
            seen: HashSet::new(),
            cycles: Vec::new(),
        }
    }

    fn visit(&mut self, id: &'a str) {
        self.visited.insert(id);
        self.on_path.insert(id, self.path.len());
        self.path.push(id);

        if let Some(task) = self.tasks.get(id).copied() {
            for dep in &task.dependencies {
                let dep = dep.as_str();
                if let Some(&start) = self.on_path.get(dep) {
                    self.record(start);
                } else if !self.visited.contains(dep) && self.tasks.contains_key(dep) {
                    self.visit(dep);
                }
            }
        }

        self.path.pop();
        self.on_path.remove(id);
    }

    /// Records `path[start..]` unless the same cycle was already reported
    fn record(&mut self, start: usize) {
        let members = &self.path[start..];

        // Rotate so the smallest ID leads; any rotation is the same cycle
        let lead = members
            .iter()
            .enumerate()
            .min_by_key(|(_, id)| **id)
            .map(|(pos, _)| pos)
            .unwrap_or(0);
        let mut canonical = Vec::with_capacity(members.len());
        canonical.extend_from_slice(&members[lead..]);
        canonical.extend_from_slice(&members[..lead]);

        if self.seen.insert(canonical) {
            self.cycles
                .push(members.iter().map(|id| self.tasks[id].id.clone()).collect());
        }
    }
}

/// Finds every cycle reachable by the depth-first search
///
/// Each cycle lists task IDs in traversal order: every entry depends on the
/// next one, and the last depends on the first. A self-dependency is reported
/// as a one-element cycle. Returns an empty list for an acyclic snapshot.
///
/// The list is not exhaustive. A cycle is reported when the search closes
/// it, so a cycle that only runs through already visited tasks is left out.
pub fn detect_circular_dependencies(tasks: &[Task]) -> Vec<Vec<TaskId>> {
    let mut search = CycleSearch::new(tasks);

    for task in tasks {
        let id = task.id.as_str();
        if !search.visited.contains(id) {
            search.visit(id);
        }
    }

    debug!(cycles = search.cycles.len(), "cycle detection finished");
    search.cycles
}

/// Formats a cycle as `a -> b -> a`
pub fn format_cycle(cycle: &[TaskId]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(TaskId::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first.as_str());
    }
    parts.join(" -> ")
}
