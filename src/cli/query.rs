//! Query commands over the dependency engine
//!
//! Every command reads the whole task store and derives a fresh view; nothing
//! is cached between runs.

use anyhow::Result;
use chrono::Utc;
use tracing::debug;

use super::output::Output;
use crate::domain::{
    calculate_critical_path, detect_circular_dependencies, format_cycle, score_tasks,
    stats_from_graph, validate_dependencies_with, DependencyGraph, Task, TaskId, TaskStatus,
};
use crate::storage::Project;

fn load() -> Result<(Project, Vec<Task>)> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;
    debug!(
        root = %project.root().display(),
        count = tasks.len(),
        "loaded task snapshot"
    );
    Ok((project, tasks))
}

fn id_list<'a>(tasks: &[&'a Task]) -> Vec<&'a TaskId> {
    tasks.iter().map(|t| &t.id).collect()
}

/// Show tasks ready to work on
pub fn ready(output: &Output) -> Result<()> {
    let (_, tasks) = load()?;
    let graph = DependencyGraph::build(&tasks);
    let ready_tasks = graph.available_tasks();

    debug!(ready = ready_tasks.len(), "available tasks computed");

    if output.is_json() {
        output.data(&ready_tasks);
    } else if ready_tasks.is_empty() {
        println!("No tasks ready to work on.");
    } else {
        println!("Ready tasks ({}):", ready_tasks.len());
        println!("{:<16} {:<8} TITLE", "ID", "PRIORITY");
        println!("{}", "-".repeat(60));
        for task in ready_tasks {
            println!("{:<16} {:<8} {}", task.id, task.priority.label(), task.title);
        }
    }

    Ok(())
}

/// Show blocked tasks
pub fn blocked(output: &Output) -> Result<()> {
    let (_, tasks) = load()?;
    let graph = DependencyGraph::build(&tasks);

    let blocked: Vec<(&Task, Vec<&TaskId>)> = graph
        .nodes()
        .filter(|node| node.is_blocked)
        .map(|node| {
            let blockers = node
                .dependencies
                .iter()
                .filter(|dep| !dep.status.is_complete())
                .map(|dep| &dep.id)
                .collect();
            (node.task, blockers)
        })
        .collect();

    debug!(blocked = blocked.len(), "blocked tasks computed");

    if output.is_json() {
        let items: Vec<_> = blocked
            .iter()
            .map(|(task, blockers)| {
                serde_json::json!({
                    "id": task.id,
                    "title": task.title,
                    "status": task.status,
                    "blocked_by": blockers,
                })
            })
            .collect();
        output.data(&items);
    } else if blocked.is_empty() {
        println!("No blocked tasks.");
    } else {
        println!("Blocked tasks ({}):", blocked.len());
        println!("{:<16} {:<30} BLOCKED BY", "ID", "TITLE");
        println!("{}", "-".repeat(70));
        for (task, blockers) in blocked {
            let blockers: Vec<&str> = blockers.iter().map(|id| id.as_str()).collect();
            println!("{:<16} {:<30} {}", task.id, task.title, blockers.join(", "));
        }
    }

    Ok(())
}

/// Show available tasks in suggested work order
pub fn order(output: &Output) -> Result<()> {
    let (project, tasks) = load()?;
    let weights = &project.config().project.ranking;
    let scored = score_tasks(&tasks, weights, Utc::now().date_naive());

    if output.is_json() {
        let items: Vec<_> = scored
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.task.id,
                    "title": s.task.title,
                    "score": s.score,
                    "breakdown": s.breakdown,
                })
            })
            .collect();
        output.data(&items);
    } else if scored.is_empty() {
        println!("No tasks ready to work on.");
    } else {
        println!(
            "{:<4} {:<16} {:>7} {:>9} {:>6} {:>6} TITLE",
            "#", "ID", "SCORE", "PRIORITY", "DUE", "DEPS"
        );
        println!("{}", "-".repeat(72));
        for (rank, s) in scored.iter().enumerate() {
            println!(
                "{:<4} {:<16} {:>7.1} {:>9.1} {:>6.1} {:>6.1} {}",
                rank + 1,
                s.task.id,
                s.score,
                s.breakdown.priority,
                s.breakdown.due_date,
                s.breakdown.dependents,
                s.task.title
            );
        }
    }

    Ok(())
}

/// Show the longest dependency chain
pub fn critical_path(output: &Output) -> Result<()> {
    let (_, tasks) = load()?;
    let path = calculate_critical_path(&tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "length": path.len(),
            "tasks": path,
        }));
    } else if path.is_empty() {
        println!("No tasks.");
    } else {
        println!("Critical path ({} tasks):", path.len());
        for (step, task) in path.iter().enumerate() {
            println!(
                "  {}. {} [{}] {}",
                step + 1,
                task.id,
                task.status.label(),
                task.title
            );
        }
    }

    Ok(())
}

/// List circular dependencies
pub fn cycles(output: &Output) -> Result<()> {
    let (_, tasks) = load()?;
    let cycles = detect_circular_dependencies(&tasks);

    if output.is_json() {
        output.data(&cycles);
    } else if cycles.is_empty() {
        println!("No circular dependencies.");
    } else {
        println!("Circular dependencies ({}):", cycles.len());
        for cycle in &cycles {
            println!("  {}", format_cycle(cycle));
        }
    }

    Ok(())
}

/// Show dependency statistics for a task
pub fn stats(output: &Output, id_str: &str) -> Result<()> {
    let (_, tasks) = load()?;
    let id: TaskId = id_str.parse()?;
    let graph = DependencyGraph::build(&tasks);

    if !graph.contains(id.as_str()) {
        anyhow::bail!("Task not found: {}", id);
    }
    let stats = stats_from_graph(id.as_str(), &graph);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "direct_dependencies": stats.direct_dependencies,
            "total_dependencies": stats.total_dependencies,
            "direct_dependents": stats.direct_dependents,
            "total_dependents": stats.total_dependents,
            "is_blocked": stats.is_blocked,
            "blocking_tasks": id_list(&stats.blocking_tasks),
        }));
    } else {
        println!("Task: {}", id);
        println!("  Direct dependencies: {}", stats.direct_dependencies);
        println!("  Total dependencies:  {}", stats.total_dependencies);
        println!("  Direct dependents:   {}", stats.direct_dependents);
        println!("  Total dependents:    {}", stats.total_dependents);
        println!("  Blocked:             {}", if stats.is_blocked { "yes" } else { "no" });
        if !stats.blocking_tasks.is_empty() {
            let blockers: Vec<&str> = stats.blocking_tasks.iter().map(|t| t.id.as_str()).collect();
            println!("  Blocked by:          {}", blockers.join(", "));
        }
    }

    Ok(())
}

/// Check dependencies for structural problems
///
/// Fails when the snapshot has validation errors, after printing the report.
pub fn validate(output: &Output) -> Result<()> {
    let (project, tasks) = load()?;
    let thresholds = &project.config().project.validation;
    let result = validate_dependencies_with(&tasks, thresholds);

    if output.is_json() {
        output.data(&result);
    } else {
        for error in &result.errors {
            println!("error: {}", error);
        }
        for warning in &result.warnings {
            println!("warning: {}", warning);
        }
        if result.is_valid {
            println!(
                "Dependencies are valid ({} tasks, {} warnings)",
                tasks.len(),
                result.warnings.len()
            );
        }
    }

    if !result.is_valid {
        anyhow::bail!(
            "Dependency validation failed with {} error(s)",
            result.errors.len()
        );
    }

    Ok(())
}

/// Dump the dependency graph
pub fn graph(output: &Output) -> Result<()> {
    let (_, tasks) = load()?;
    let graph = DependencyGraph::build(&tasks);
    let topo = graph.topological_order().ok();

    if output.is_json() {
        let nodes: Vec<_> = graph
            .nodes()
            .map(|node| {
                serde_json::json!({
                    "id": node.id(),
                    "title": node.task.title,
                    "status": node.task.status,
                    "dependencies": id_list(&node.dependencies),
                    "dependents": id_list(&node.dependents),
                    "is_blocked": node.is_blocked,
                    "is_available": node.is_available,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "nodes": nodes,
            "edges": graph.edges(),
            "topological_order": topo.as_ref().map(|order| id_list(order)),
        }));
        return Ok(());
    }

    if graph.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    println!("Nodes ({}):", graph.len());
    for node in graph.nodes() {
        let state = if node.task.status.is_complete() {
            "done"
        } else if node.is_blocked {
            "blocked"
        } else {
            "available"
        };
        println!("  {:<16} {:<10} {}", node.id(), state, node.task.title);
    }

    println!();
    println!("Edges ({}):", graph.edges().len());
    for edge in graph.edges() {
        let marker = if graph.contains(edge.from.as_str()) {
            ""
        } else {
            " (missing)"
        };
        println!("  {} -> {}{}", edge.from, edge.to, marker);
    }

    println!();
    match topo {
        Some(order) => {
            let ids: Vec<&str> = order.iter().map(|t| t.id.as_str()).collect();
            println!("Topological order: {}", ids.join(", "));
        }
        None => println!("Topological order: unavailable (graph has cycles)"),
    }

    Ok(())
}

/// Show project status overview
pub fn status(output: &Output) -> Result<()> {
    let (project, tasks) = load()?;
    let graph = DependencyGraph::build(&tasks);

    let count = |status: TaskStatus| graph.nodes().filter(|n| n.task.status == status).count();
    let todo = count(TaskStatus::Todo);
    let in_progress = count(TaskStatus::InProgress);
    let completed = count(TaskStatus::Completed);
    let ready = graph.available_tasks().len();
    let blocked = graph.blocked_tasks().len();
    let cycles = detect_circular_dependencies(&tasks).len();
    let critical = calculate_critical_path(&tasks).len();

    if output.is_json() {
        output.data(&serde_json::json!({
            "root": project.root(),
            "tasks": {
                "total": graph.len(),
                "todo": todo,
                "in_progress": in_progress,
                "completed": completed,
                "ready": ready,
                "blocked": blocked,
            },
            "cycles": cycles,
            "critical_path_length": critical,
        }));
    } else {
        println!("Project Status");
        println!("{}", "=".repeat(40));
        println!();
        println!("Tasks: {} total", graph.len());
        println!("  [ ] Todo:        {}", todo);
        println!("  [~] In Progress: {}", in_progress);
        println!("  [x] Completed:   {}", completed);
        println!();
        println!("  Ready to work:   {}", ready);
        println!("  Blocked:         {}", blocked);
        println!();
        println!("Critical path:     {} tasks", critical);
        if cycles > 0 {
            println!("Cycles:            {} (run 'taskgraph cycles')", cycles);
        }
    }

    Ok(())
}
