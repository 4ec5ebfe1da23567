//! taskgraph - dependency analysis for task lists
//!
//! Given a snapshot of tasks that reference each other by ID, taskgraph
//! derives the dependency graph, separates blocked from available work,
//! detects cycles, finds the critical path, ranks available tasks, and
//! validates the structure. Tasks are persisted as JSONL inside a
//! `.taskgraph/` project directory and driven through the `taskgraph` CLI.

pub mod domain;
pub mod storage;
pub mod cli;
pub mod logging;

pub use domain::{
    build_dependency_graph, calculate_critical_path, detect_circular_dependencies,
    suggested_task_order, task_dependency_stats, validate_dependencies, DependencyGraph, Priority,
    Task, TaskId, TaskStatus,
};
