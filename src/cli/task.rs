//! Task CLI commands

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use tracing::debug;

use super::output::Output;
use crate::domain::{
    format_cycle, task_dependency_stats, DependencyGraph, Priority, Task, TaskId,
};
use crate::storage::{Project, TaskStore};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    ///
    /// Examples:
    ///   taskgraph task add "Write parser"
    ///   taskgraph task add "Ship it" --priority urgent --after t-1a2b3c4
    Add {
        /// Task title
        title: String,

        /// Explicit task ID (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Priority (low, medium, high, urgent)
        #[arg(long, short)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Longer description
        #[arg(long, short)]
        description: Option<String>,

        /// Task that must be completed first (repeatable)
        #[arg(long = "after", value_name = "ID")]
        after: Vec<String>,
    },

    /// List all tasks in store order
    List,

    /// Show task details and dependency stats
    Show {
        /// Task ID
        id: String,
    },

    /// Change priority, due date, or description
    Set {
        /// Task ID
        id: String,

        /// New priority
        #[arg(long, short)]
        priority: Option<Priority>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        /// New description
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Mark task as in progress
    Start {
        /// Task ID
        id: String,
    },

    /// Mark task as completed
    Done {
        /// Task ID
        id: String,
    },

    /// Move a completed task back to todo
    Reopen {
        /// Task ID
        id: String,
    },

    /// Add a dependency between tasks
    Dep {
        /// Task that will be blocked
        task: String,

        /// Task that must be completed first
        depends_on: String,
    },

    /// Remove a dependency
    Undep {
        /// Task to unblock
        task: String,

        /// Dependency to remove
        depends_on: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            title,
            id,
            priority,
            due,
            description,
            after,
        } => add_task(
            output,
            NewTask {
                title,
                id,
                priority,
                due,
                description,
                after,
            },
        ),
        TaskCommands::List => list_tasks(output),
        TaskCommands::Show { id } => show_task(output, &id),
        TaskCommands::Set {
            id,
            priority,
            due,
            clear_due,
            description,
        } => set_fields(output, &id, priority, due, clear_due, description),
        TaskCommands::Start { id } => change_status(output, &id, Transition::Start),
        TaskCommands::Done { id } => change_status(output, &id, Transition::Complete),
        TaskCommands::Reopen { id } => change_status(output, &id, Transition::Reopen),
        TaskCommands::Dep { task, depends_on } => add_dependency(output, &task, &depends_on),
        TaskCommands::Undep { task, depends_on } => remove_dependency(output, &task, &depends_on),
    }
}

struct NewTask {
    title: String,
    id: Option<String>,
    priority: Option<Priority>,
    due: Option<NaiveDate>,
    description: Option<String>,
    after: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum Transition {
    Start,
    Complete,
    Reopen,
}

/// Position of the task owning `id` (first occurrence wins)
fn position(tasks: &[Task], id: &TaskId) -> Result<usize> {
    tasks
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))
}

fn load(project: &Project) -> Result<(TaskStore, Vec<Task>)> {
    let store = project.task_store();
    let tasks = store.read_all()?;
    debug!(count = tasks.len(), path = %store.path().display(), "loaded tasks");
    Ok((store, tasks))
}

fn add_task(output: &Output, new: NewTask) -> Result<()> {
    let project = Project::open_current()?;
    let (store, tasks) = load(&project)?;

    let task_id = match &new.id {
        Some(id) => id.parse::<TaskId>()?,
        None => TaskId::generate(&new.title, Utc::now()),
    };
    if tasks.iter().any(|t| t.id == task_id) {
        anyhow::bail!("Task already exists: {}", task_id);
    }

    let mut task = Task::new(task_id, new.title);
    if let Some(priority) = new.priority {
        task.set_priority(priority);
    }
    if new.due.is_some() {
        task.set_due_date(new.due);
    }
    if let Some(description) = new.description {
        task.set_description(description);
    }
    for dep in &new.after {
        let dep_id: TaskId = dep.parse()?;
        if dep_id == task.id {
            anyhow::bail!("Task cannot depend on itself: {}", dep_id);
        }
        position(&tasks, &dep_id)
            .map_err(|_| anyhow::anyhow!("Dependency task not found: {}", dep_id))?;
        task.add_dependency(dep_id);
    }

    store.append(&task)?;
    debug!(id = %task.id, deps = task.dependencies.len(), "task added");

    if output.is_json() {
        output.data(&task);
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.title));
    }

    Ok(())
}

fn list_tasks(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let (_, tasks) = load(&project)?;

    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        println!("No tasks");
    } else {
        println!("{:<16} {:<12} {:<8} TITLE", "ID", "STATUS", "PRIORITY");
        println!("{}", "-".repeat(60));
        for task in &tasks {
            println!(
                "{:<16} {:<12} {:<8} {}",
                task.id,
                task.status.label(),
                task.priority.label(),
                task.title
            );
        }
    }

    Ok(())
}

fn show_task(output: &Output, id_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (_, tasks) = load(&project)?;

    let id: TaskId = id_str.parse()?;
    let task = &tasks[position(&tasks, &id)?];
    let stats = task_dependency_stats(id.as_str(), &tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task,
            "stats": {
                "direct_dependencies": stats.direct_dependencies,
                "total_dependencies": stats.total_dependencies,
                "direct_dependents": stats.direct_dependents,
                "total_dependents": stats.total_dependents,
                "is_blocked": stats.is_blocked,
                "blocking_tasks": stats.blocking_tasks.iter().map(|t| &t.id).collect::<Vec<_>>(),
            },
        }));
        return Ok(());
    }

    println!("Task: {}", task.id);
    println!("Title: {}", task.title);
    println!("Status: {}", task.status.label());
    println!("Priority: {}", task.priority.label());
    if let Some(due) = task.due_date {
        println!("Due: {}", due);
    }
    println!("Created: {}", task.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(completed) = task.completed_at {
        println!("Completed: {}", completed.format("%Y-%m-%d %H:%M"));
    }

    if !task.dependencies.is_empty() {
        println!("\nDepends on:");
        for dep in &task.dependencies {
            let dep_status = tasks
                .iter()
                .find(|t| &t.id == dep)
                .map(|t| t.status.label())
                .unwrap_or("missing");
            println!("  {} ({})", dep, dep_status);
        }
    }

    if let Some(desc) = &task.description {
        println!("\nDescription:");
        println!("{}", desc);
    }

    println!();
    println!(
        "Dependencies: {} direct, {} total",
        stats.direct_dependencies, stats.total_dependencies
    );
    println!(
        "Dependents:   {} direct, {} total",
        stats.direct_dependents, stats.total_dependents
    );
    if task.status.is_complete() {
        println!("State: COMPLETED");
    } else if stats.is_blocked {
        let blockers: Vec<&str> = stats.blocking_tasks.iter().map(|t| t.id.as_str()).collect();
        println!("State: BLOCKED by {}", blockers.join(", "));
    } else {
        println!("State: READY");
    }

    Ok(())
}

fn set_fields(
    output: &Output,
    id_str: &str,
    priority: Option<Priority>,
    due: Option<NaiveDate>,
    clear_due: bool,
    description: Option<String>,
) -> Result<()> {
    let project = Project::open_current()?;
    let (store, mut tasks) = load(&project)?;

    let id: TaskId = id_str.parse()?;
    let idx = position(&tasks, &id)?;
    let task = &mut tasks[idx];

    if let Some(priority) = priority {
        task.set_priority(priority);
    }
    if clear_due {
        task.set_due_date(None);
    } else if due.is_some() {
        task.set_due_date(due);
    }
    if let Some(description) = description {
        task.set_description(description);
    }

    store.update(task)?;

    if output.is_json() {
        output.data(&*task);
    } else {
        output.success(&format!("Updated task: {}", task.id));
    }

    Ok(())
}

fn change_status(output: &Output, id_str: &str, transition: Transition) -> Result<()> {
    let project = Project::open_current()?;
    let (store, mut tasks) = load(&project)?;

    let id: TaskId = id_str.parse()?;
    let idx = position(&tasks, &id)?;
    let task = &mut tasks[idx];

    let verb = match transition {
        Transition::Start => {
            task.start();
            "Started"
        }
        Transition::Complete => {
            task.complete();
            "Completed"
        }
        Transition::Reopen => {
            task.reopen();
            "Reopened"
        }
    };
    store.update(task)?;
    debug!(id = %task.id, status = task.status.label(), "status changed");

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id,
            "status": task.status,
            "completed_at": task.completed_at,
        }));
    } else {
        output.success(&format!("{} task: {}", verb, task.id));
    }

    Ok(())
}

fn add_dependency(output: &Output, task_str: &str, depends_on_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (store, mut tasks) = load(&project)?;

    let task_id: TaskId = task_str.parse()?;
    let depends_on_id: TaskId = depends_on_str.parse()?;

    let idx = position(&tasks, &task_id)?;
    position(&tasks, &depends_on_id)
        .map_err(|_| anyhow::anyhow!("Dependency task not found: {}", depends_on_id))?;

    if task_id == depends_on_id {
        anyhow::bail!("Task cannot depend on itself: {}", task_id);
    }

    // The new edge closes a cycle iff the dependency already reaches the task
    let cycle = {
        let graph = DependencyGraph::build(&tasks);
        graph
            .dependency_path(depends_on_id.as_str(), task_id.as_str())
            .map(|path| {
                let mut cycle = vec![task_id.clone()];
                cycle.extend(path[..path.len() - 1].iter().map(|id| (*id).clone()));
                cycle
            })
    };
    if let Some(cycle) = cycle {
        anyhow::bail!(
            "Adding this dependency would create a cycle: {}",
            format_cycle(&cycle)
        );
    }

    let task = &mut tasks[idx];
    if !task.add_dependency(depends_on_id.clone()) {
        output.success(&format!("{} already depends on {}", task_id, depends_on_id));
        return Ok(());
    }
    store.update(task)?;
    debug!(task = %task_id, depends_on = %depends_on_id, "dependency added");

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id,
            "depends_on": depends_on_id,
            "added": true,
        }));
    } else {
        output.success(&format!("{} now depends on {}", task_id, depends_on_id));
    }

    Ok(())
}

fn remove_dependency(output: &Output, task_str: &str, depends_on_str: &str) -> Result<()> {
    let project = Project::open_current()?;
    let (store, mut tasks) = load(&project)?;

    let task_id: TaskId = task_str.parse()?;
    let depends_on_id: TaskId = depends_on_str.parse()?;

    let idx = position(&tasks, &task_id)?;
    let task = &mut tasks[idx];

    if !task.remove_dependency(&depends_on_id) {
        anyhow::bail!("{} does not depend on {}", task_id, depends_on_id);
    }
    store.update(task)?;
    debug!(task = %task_id, depends_on = %depends_on_id, "dependency removed");

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id,
            "depends_on": depends_on_id,
            "removed": true,
        }));
    } else {
        output.success(&format!("Removed dependency: {} -> {}", task_id, depends_on_id));
    }

    Ok(())
}
