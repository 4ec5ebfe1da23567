//! Domain models and the task dependency engine
//!
//! Contains the core logic without any I/O concerns. Every engine function
//! takes an immutable task snapshot and returns a freshly derived view.

mod id;
mod task;
mod graph;
mod cycles;
mod critical_path;
mod ranking;
mod stats;
mod validate;

pub use id::{IdError, TaskId};
pub use task::{Priority, Task, TaskStatus};
pub use graph::{
    available_tasks_from_graph, blocked_tasks_from_graph, build_dependency_graph, DependencyEdge,
    DependencyGraph, GraphError, GraphNode,
};
pub use cycles::{detect_circular_dependencies, format_cycle};
pub use critical_path::calculate_critical_path;
pub use ranking::{
    score_tasks, suggested_task_order, suggested_task_order_with, RankingWeights, ScoreBreakdown,
    ScoredTask,
};
pub use stats::{stats_from_graph, task_dependency_stats, DependencyStats};
pub use validate::{
    validate_dependencies, validate_dependencies_with, DependencyError, DependencyWarning,
    ValidationResult, ValidationThresholds,
};
