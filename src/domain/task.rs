//! Task domain model
//!
//! Tasks are owned by the surrounding application. The dependency engine only
//! ever reads `id`, `status`, `priority`, `dependencies` and `due_date`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::id::TaskId;

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(alias = "in_progress")]
    InProgress,
    #[serde(alias = "done")]
    Completed,
}

impl TaskStatus {
    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    /// Returns true if this task is currently being worked on
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::InProgress)
    }

    /// Returns the wire label (`todo`, `in-progress`, `completed`)
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Default base score used by the suggested-order ranking
    pub fn base_score(&self) -> u32 {
        match self {
            Priority::Urgent => 100,
            Priority::High => 75,
            Priority::Medium => 50,
            Priority::Low => 25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            other => Err(format!(
                "unknown priority '{}' (expected low, medium, high or urgent)",
                other
            )),
        }
    }
}

/// A unit of work that may depend on other tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Human-readable title
    #[serde(default)]
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Current priority
    #[serde(default)]
    pub priority: Priority,

    /// Tasks that must be completed before this one can start.
    ///
    /// May name tasks that do not exist, the task itself, or tasks that
    /// participate in a cycle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,

    /// Optional deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the task was created
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,

    /// When the task was completed (if completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new `todo` task with the given ID and title
    pub fn new(id: TaskId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            status: TaskStatus::Todo,
            priority: Priority::default(),
            dependencies: Vec::new(),
            due_date: None,
            description: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Returns true if this task lists itself as a dependency
    pub fn depends_on_itself(&self) -> bool {
        self.dependencies.contains(&self.id)
    }

    /// Transitions to in-progress status
    pub fn start(&mut self) {
        if self.status == TaskStatus::Todo {
            self.status = TaskStatus::InProgress;
            self.updated_at = Utc::now();
        }
    }

    /// Transitions to completed status
    pub fn complete(&mut self) {
        if !self.status.is_complete() {
            self.status = TaskStatus::Completed;
            let now = Utc::now();
            self.updated_at = now;
            self.completed_at = Some(now);
        }
    }

    /// Transitions back to todo status
    pub fn reopen(&mut self) {
        if self.status.is_complete() {
            self.status = TaskStatus::Todo;
            self.updated_at = Utc::now();
            self.completed_at = None;
        }
    }

    /// Adds a dependency on another task. Returns false if already present.
    pub fn add_dependency(&mut self, task_id: TaskId) -> bool {
        if self.dependencies.contains(&task_id) {
            return false;
        }
        self.dependencies.push(task_id);
        self.updated_at = Utc::now();
        true
    }

    /// Removes every occurrence of a dependency. Returns false if absent.
    pub fn remove_dependency(&mut self, task_id: &TaskId) -> bool {
        let len_before = self.dependencies.len();
        self.dependencies.retain(|d| d != task_id);
        let removed = self.dependencies.len() != len_before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
        self.updated_at = Utc::now();
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
        self.updated_at = Utc::now();
    }
}
