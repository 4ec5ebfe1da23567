//! Suggested work order for available tasks
//!
//! Each available task gets an additive score:
//!
//! `score = priority base + due-date pressure + dependents * dependent_weight`
//!
//! Due-date pressure is the full `due_date_weight` when the task is overdue
//! or due today, decays linearly to zero across `due_date_horizon_days`, and
//! is zero without a due date. Blocked and completed tasks are never ranked.
//! Equal scores keep snapshot order.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::graph::DependencyGraph;
use super::task::{Priority, Task};

/// Tunable weights for the suggested-order score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub urgent: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,

    /// Bonus for a task that is overdue or due today
    pub due_date_weight: f64,

    /// Days ahead at which due-date pressure reaches zero
    pub due_date_horizon_days: u32,

    /// Bonus per task that directly depends on this one
    pub dependent_weight: f64,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            urgent: f64::from(Priority::Urgent.base_score()),
            high: f64::from(Priority::High.base_score()),
            medium: f64::from(Priority::Medium.base_score()),
            low: f64::from(Priority::Low.base_score()),
            due_date_weight: 50.0,
            due_date_horizon_days: 14,
            dependent_weight: 10.0,
        }
    }
}

impl RankingWeights {
    pub fn priority_score(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn due_date_score(&self, due_date: Option<NaiveDate>, today: NaiveDate) -> f64 {
        let Some(due) = due_date else {
            return 0.0;
        };

        let days = (due - today).num_days();
        if days <= 0 {
            return self.due_date_weight;
        }

        let horizon = i64::from(self.due_date_horizon_days);
        if days >= horizon {
            return 0.0;
        }

        self.due_date_weight * (horizon - days) as f64 / horizon as f64
    }

    pub fn dependents_score(&self, dependents: usize) -> f64 {
        self.dependent_weight * dependents as f64
    }
}

/// Per-component contributions to a task's score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub priority: f64,
    pub due_date: f64,
    pub dependents: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.priority + self.due_date + self.dependents
    }
}

/// An available task with its composite score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask<'a> {
    pub task: &'a Task,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Scores every available task and sorts highest first
///
/// The sort is stable, so tasks with equal scores keep snapshot order.
pub fn score_tasks<'a>(
    tasks: &'a [Task],
    weights: &RankingWeights,
    today: NaiveDate,
) -> Vec<ScoredTask<'a>> {
    let graph = DependencyGraph::build(tasks);

    let mut scored: Vec<ScoredTask<'a>> = graph
        .nodes()
        .filter(|node| node.is_available)
        .map(|node| {
            let breakdown = ScoreBreakdown {
                priority: weights.priority_score(node.task.priority),
                due_date: weights.due_date_score(node.task.due_date, today),
                dependents: weights.dependents_score(node.dependents.len()),
            };
            ScoredTask {
                task: node.task,
                score: breakdown.total(),
                breakdown,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(ranked = scored.len(), "suggested order computed");
    scored
}

/// Returns available tasks in suggested work order using explicit weights
pub fn suggested_task_order_with<'a>(
    tasks: &'a [Task],
    weights: &RankingWeights,
    today: NaiveDate,
) -> Vec<&'a Task> {
    score_tasks(tasks, weights, today)
        .into_iter()
        .map(|scored| scored.task)
        .collect()
}

/// Returns available tasks in suggested work order
///
/// Uses the default weights and today's date (UTC).
pub fn suggested_task_order(tasks: &[Task]) -> Vec<&Task> {
    suggested_task_order_with(tasks, &RankingWeights::default(), Utc::now().date_naive())
}
