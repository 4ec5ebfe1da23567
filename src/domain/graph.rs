//! Dependency graph for tasks
//!
//! Projects a task snapshot into nodes (with resolved dependencies, reverse
//! edges and blocked/available status) plus a flat edge list. The graph
//! borrows from the snapshot and is rebuilt from scratch on every call.
//!
//! Cycles, self-references and dangling IDs are all representable: nodes are
//! stored in a vector and looked up by ID, so a cycle is just data.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;
use tracing::debug;

use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Dependency cycle detected at task: {0}")]
    CycleDetected(TaskId),
}

/// A directed edge from a dependency to the task that requires it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyEdge {
    /// The required task. May not resolve to any task in the snapshot.
    pub from: TaskId,
    /// The task listing `from` in its dependencies
    pub to: TaskId,
}

/// A task plus everything derived about it from the rest of the snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode<'a> {
    /// The original task
    pub task: &'a Task,
    /// Dependencies that resolve to tasks in the snapshot
    pub dependencies: Vec<&'a Task>,
    /// Tasks that list this one as a dependency
    pub dependents: Vec<&'a Task>,
    /// Not completed and at least one resolved dependency is not completed
    pub is_blocked: bool,
    /// Not completed and not blocked
    pub is_available: bool,
}

impl<'a> GraphNode<'a> {
    pub fn id(&self) -> &'a TaskId {
        let task: &'a Task = self.task;
        &task.id
    }
}

/// A dependency graph built from a task snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph<'a> {
    /// Nodes in snapshot order
    nodes: Vec<GraphNode<'a>>,

    /// Map from task ID to position in `nodes`
    index: HashMap<&'a str, usize>,

    /// One edge per distinct (task, dependency) pair
    edges: Vec<DependencyEdge>,
}

impl<'a> DependencyGraph<'a> {
    /// Builds a graph from a task snapshot
    ///
    /// When an ID appears more than once the first task owns it and later
    /// duplicates are left out of the graph.
    pub fn build(tasks: &'a [Task]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::with_capacity(tasks.len());
        let mut owners: Vec<&'a Task> = Vec::with_capacity(tasks.len());

        for task in tasks {
            if index.contains_key(task.id.as_str()) {
                debug!(task = %task.id, "skipping duplicate task id");
                continue;
            }
            index.insert(task.id.as_str(), owners.len());
            owners.push(task);
        }

        // First pass: resolve dependencies, record edges, classify
        let mut edges = Vec::new();
        let mut nodes: Vec<GraphNode<'a>> = Vec::with_capacity(owners.len());

        for &task in &owners {
            let mut dependencies: Vec<&'a Task> = Vec::with_capacity(task.dependencies.len());

            let mut seen: HashSet<&str> = HashSet::with_capacity(task.dependencies.len());
            for dep_id in &task.dependencies {
                if !seen.insert(dep_id.as_str()) {
                    continue;
                }

                edges.push(DependencyEdge {
                    from: dep_id.clone(),
                    to: task.id.clone(),
                });

                if let Some(&dep_idx) = index.get(dep_id.as_str()) {
                    dependencies.push(owners[dep_idx]);
                }
            }

            let done = task.status.is_complete();
            let is_blocked = !done && dependencies.iter().any(|d| !d.status.is_complete());

            nodes.push(GraphNode {
                task,
                dependencies,
                dependents: Vec::new(),
                is_blocked,
                is_available: !done && !is_blocked,
            });
        }

        // Second pass: reverse edges
        for &task in &owners {
            for dep_id in &task.dependencies {
                let Some(&dep_idx) = index.get(dep_id.as_str()) else {
                    continue;
                };
                let dependents = &mut nodes[dep_idx].dependents;
                // All pushes for `task` happen in this loop, so a repeat is always last
                if dependents.last().is_some_and(|t| std::ptr::eq(*t, task)) {
                    continue;
                }
                dependents.push(task);
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "built dependency graph"
        );

        Self {
            nodes,
            index,
            edges,
        }
    }

    /// Returns the node for a task ID
    pub fn node(&self, task_id: &str) -> Option<&GraphNode<'a>> {
        self.index.get(task_id).map(|&idx| &self.nodes[idx])
    }

    /// Returns the task owning an ID, if it is part of the snapshot
    pub fn task(&self, task_id: &str) -> Option<&'a Task> {
        self.node(task_id).map(|node| node.task)
    }

    /// Iterates over nodes in snapshot order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode<'a>> {
        self.nodes.iter()
    }

    /// Returns all edges, including those whose `from` does not resolve
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    /// Returns tasks that are blocked, in node order
    pub fn blocked_tasks(&self) -> Vec<&'a Task> {
        self.nodes
            .iter()
            .filter(|node| node.is_blocked)
            .map(|node| node.task)
            .collect()
    }

    /// Returns tasks that are available to work on, in node order
    pub fn available_tasks(&self) -> Vec<&'a Task> {
        self.nodes
            .iter()
            .filter(|node| node.is_available)
            .map(|node| node.task)
            .collect()
    }

    /// Returns all tasks in topological order (dependencies before dependents)
    ///
    /// Only resolved edges take part. Fails if the resolved edges contain a
    /// cycle (including a self-dependency).
    pub fn topological_order(&self) -> Result<Vec<&'a Task>, GraphError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<NodeIndex> = (0..self.nodes.len()).map(|i| graph.add_node(i)).collect();

        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (
                self.index.get(edge.from.as_str()),
                self.index.get(edge.to.as_str()),
            ) {
                graph.add_edge(indices[from], indices[to], ());
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order
                .into_iter()
                .map(|idx| self.nodes[graph[idx]].task)
                .collect()),
            Err(cycle) => Err(GraphError::CycleDetected(
                self.nodes[graph[cycle.node_id()]].task.id.clone(),
            )),
        }
    }

    /// Shortest chain of resolved dependencies leading from `from` to `to`
    ///
    /// The result starts with `from` and ends with `to`; every entry depends
    /// on the next. `None` if `to` is not reachable.
    pub fn dependency_path(&self, from: &str, to: &str) -> Option<Vec<&'a TaskId>> {
        let start = *self.index.get(from)?;
        let target = *self.index.get(to)?;

        let mut parent: HashMap<usize, usize> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::from([start]);

        while let Some(idx) = queue.pop_front() {
            if idx == target {
                let mut path = vec![self.nodes[idx].id()];
                let mut cursor = idx;
                while let Some(&prev) = parent.get(&cursor) {
                    path.push(self.nodes[prev].id());
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }

            for dep in &self.nodes[idx].dependencies {
                let Some(&next) = self.index.get(dep.id.as_str()) else {
                    continue;
                };
                if seen.insert(next) {
                    parent.insert(next, idx);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: &str) -> bool {
        self.index.contains_key(task_id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds the dependency graph for a task snapshot
pub fn build_dependency_graph(tasks: &[Task]) -> DependencyGraph<'_> {
    DependencyGraph::build(tasks)
}

/// Returns the blocked tasks of a built graph
pub fn blocked_tasks_from_graph<'a>(graph: &DependencyGraph<'a>) -> Vec<&'a Task> {
    graph.blocked_tasks()
}

/// Returns the available tasks of a built graph
pub fn available_tasks_from_graph<'a>(graph: &DependencyGraph<'a>) -> Vec<&'a Task> {
    graph.available_tasks()
}
