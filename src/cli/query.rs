//! Read-only project queries: ready, blocked, status.

use anyhow::Result;
use chrono::Local;

use super::output::Output;
use crate::domain::{Task, TaskId};
use crate::storage::Project;

/// Lists incomplete tasks whose prerequisites are all satisfied.
pub fn ready(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    let mut ready: Vec<&Task> = tasks
        .values()
        .filter(|t| !t.completed && !t.is_blocked(&tasks))
        .collect();
    ready.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    if output.is_json() {
        let items: Vec<_> = ready
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "description": t.description,
                })
            })
            .collect();
        output.data(&items);
    } else if ready.is_empty() {
        println!("No tasks ready to work on");
    } else {
        for task in ready {
            println!("{}  {}", task.id, task.description);
        }
    }

    Ok(())
}

/// Lists incomplete tasks held back by incomplete prerequisites,
/// with the blockers that hold each one.
pub fn blocked(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    let mut blocked: Vec<(&Task, Vec<TaskId>)> = tasks
        .values()
        .filter(|t| !t.completed)
        .filter_map(|t| {
            let blockers = t.incomplete_prerequisites(&tasks);
            if blockers.is_empty() {
                None
            } else {
                Some((t, blockers))
            }
        })
        .collect();
    blocked.sort_by(|a, b| a.0.id.cmp(&b.0.id));

    if output.is_json() {
        let items: Vec<_> = blocked
            .iter()
            .map(|(t, blockers)| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "description": t.description,
                    "blocked_by": blockers.iter().map(ToString::to_string).collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&items);
    } else if blocked.is_empty() {
        println!("No blocked tasks");
    } else {
        for (task, blockers) in blocked {
            let names: Vec<String> = blockers.iter().map(ToString::to_string).collect();
            println!("{}  {}", task.id, task.description);
            println!("    blocked by: {}", names.join(", "));
        }
    }

    Ok(())
}

/// Summarizes the project: task counts and today's focus sessions.
pub fn status(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let tasks = project.task_store().read_all()?;

    let total = tasks.len();
    let completed = tasks.values().filter(|t| t.completed).count();
    let blocked = tasks
        .values()
        .filter(|t| !t.completed && t.is_blocked(&tasks))
        .count();
    let ready = total - completed - blocked;

    let today = Local::now().date_naive();
    let history = project.history_store();
    let sessions_today = history.count_on(today)?;
    let sessions_total = history.total_sessions()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "tasks": {
                "total": total,
                "ready": ready,
                "blocked": blocked,
                "completed": completed,
            },
            "pomodoro": {
                "sessions_today": sessions_today,
                "sessions_total": sessions_total,
            },
        }));
    } else {
        println!("Tasks: {} total", total);
        println!("  ready:     {}", ready);
        println!("  blocked:   {}", blocked);
        println!("  completed: {}", completed);
        println!();
        println!(
            "Focus sessions: {} today, {} all time",
            sessions_today, sessions_total
        );
    }

    Ok(())
}
