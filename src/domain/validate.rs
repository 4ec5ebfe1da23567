//! Structural validation of a task snapshot
//!
//! Every check runs independently, so one malformed task can produce several
//! findings. Only errors make a snapshot invalid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::cycles::{detect_circular_dependencies, format_cycle};
use super::graph::DependencyGraph;
use super::id::TaskId;
use super::task::Task;

/// Limits that trigger validation warnings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// Warn when a task has more dependencies than this
    pub max_dependencies: usize,

    /// Warn when more than this fraction of tasks is blocked
    pub blocked_ratio: f64,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_dependencies: 10,
            blocked_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyError {
    #[error("Task \"{task}\" has non-existent dependency \"{dependency}\"")]
    MissingDependency { task: TaskId, dependency: TaskId },

    #[error("Task \"{task}\" depends on itself")]
    SelfDependency { task: TaskId },

    #[error("Circular dependency detected: {}", format_cycle(.cycle))]
    CircularDependency { cycle: Vec<TaskId> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DependencyWarning {
    ManyDependencies { task: TaskId, count: usize },
    HighBlockedRatio { blocked: usize, total: usize },
    DuplicateTaskId { task: TaskId },
}

impl fmt::Display for DependencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyWarning::ManyDependencies { task, count } => {
                write!(f, "Task \"{}\" has many dependencies ({})", task, count)
            }
            DependencyWarning::HighBlockedRatio { blocked, total } => {
                let percent = *blocked as f64 * 100.0 / *total as f64;
                write!(f, "High percentage of tasks are blocked ({:.0}%)", percent)
            }
            DependencyWarning::DuplicateTaskId { task } => {
                write!(f, "Task ID \"{}\" appears more than once", task)
            }
        }
    }
}

/// Outcome of validating a snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub is_valid: bool,
    pub errors: Vec<DependencyError>,
    pub warnings: Vec<DependencyWarning>,
}

/// Validates a snapshot with explicit thresholds
pub fn validate_dependencies_with(
    tasks: &[Task],
    thresholds: &ValidationThresholds,
) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut known: HashSet<&str> = HashSet::with_capacity(tasks.len());
    let mut duplicates: HashSet<&str> = HashSet::new();
    for task in tasks {
        let id = task.id.as_str();
        if !known.insert(id) && duplicates.insert(id) {
            warnings.push(DependencyWarning::DuplicateTaskId {
                task: task.id.clone(),
            });
        }
    }

    for task in tasks {
        let mut seen: HashSet<&str> = HashSet::with_capacity(task.dependencies.len());
        for dep in &task.dependencies {
            if dep == &task.id || !seen.insert(dep.as_str()) {
                continue;
            }
            if !known.contains(dep.as_str()) {
                errors.push(DependencyError::MissingDependency {
                    task: task.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        if task.depends_on_itself() {
            errors.push(DependencyError::SelfDependency {
                task: task.id.clone(),
            });
        }

        if task.dependencies.len() > thresholds.max_dependencies {
            warnings.push(DependencyWarning::ManyDependencies {
                task: task.id.clone(),
                count: task.dependencies.len(),
            });
        }
    }

    errors.extend(
        detect_circular_dependencies(tasks)
            .into_iter()
            .map(|cycle| DependencyError::CircularDependency { cycle }),
    );

    let graph = DependencyGraph::build(tasks);
    let total = graph.len();
    let blocked = graph.blocked_tasks().len();
    if total > 0 && blocked as f64 / total as f64 > thresholds.blocked_ratio {
        warnings.push(DependencyWarning::HighBlockedRatio { blocked, total });
    }

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "dependency validation finished"
    );

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Validates a snapshot with the default thresholds
pub fn validate_dependencies(tasks: &[Task]) -> ValidationResult {
    validate_dependencies_with(tasks, &ValidationThresholds::default())
}
