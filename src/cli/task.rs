//! Task CLI commands

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;

use super::output::Output;
use crate::domain::{Task, TaskEngine, TaskId};
use crate::storage::{Project, TaskStore};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task description
        description: String,

        /// Prerequisite task IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        requires: Vec<String>,

        /// Priority label
        #[arg(long)]
        priority: Option<String>,

        /// Category label
        #[arg(long)]
        category: Option<String>,

        /// Due date
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },

    /// Show task details
    Show {
        /// Task ID
        id: String,
    },

    /// Mark task as completed
    Done {
        /// Task ID
        id: String,
    },

    /// Mark a completed task as incomplete again
    Undone {
        /// Task ID
        id: String,
    },

    /// Delete a task (dependents lose it as a prerequisite)
    Delete {
        /// Task ID
        id: String,
    },

    /// Add a prerequisite: TASK cannot complete until REQUIRES is done
    Dep {
        /// Task that will be blocked
        task: String,

        /// Task that must be completed first
        requires: String,
    },

    /// Show a task's prerequisites and dependents
    Deps {
        /// Task ID
        id: String,
    },

    /// Remove a prerequisite
    Undep {
        /// Task to unblock
        task: String,

        /// Prerequisite to remove
        requires: String,
    },
}

pub fn run(cmd: TaskCommands, output: &Output) -> Result<()> {
    match cmd {
        TaskCommands::Add {
            description,
            requires,
            priority,
            category,
            due,
        } => add_task(output, &description, &requires, priority, category, due),
        TaskCommands::List { all } => list_tasks(output, all),
        TaskCommands::Show { id } => show_task(output, &id),
        TaskCommands::Done { id } => complete_task(output, &id),
        TaskCommands::Undone { id } => reopen_task(output, &id),
        TaskCommands::Delete { id } => delete_task(output, &id),
        TaskCommands::Dep { task, requires } => add_prerequisite(output, &task, &requires),
        TaskCommands::Deps { id } => show_dependencies(output, &id),
        TaskCommands::Undep { task, requires } => remove_prerequisite(output, &task, &requires),
    }
}

fn open_engine() -> Result<TaskEngine<TaskStore>> {
    let project = Project::open_current()?;
    Ok(TaskEngine::new(project.task_store()))
}

fn parse_ids(ids: &[String]) -> Result<BTreeSet<TaskId>> {
    ids.iter()
        .map(|s| s.parse::<TaskId>().map_err(Into::into))
        .collect()
}

fn add_task(
    output: &Output,
    description: &str,
    requires: &[String],
    priority: Option<String>,
    category: Option<String>,
    due: Option<String>,
) -> Result<()> {
    if description.trim().is_empty() {
        anyhow::bail!("Task description must not be empty");
    }

    let engine = open_engine()?;
    let prerequisites = parse_ids(requires)?;

    let mut task = Task::new(TaskId::new(description, Utc::now()), description);
    task.priority = priority;
    task.category = category;
    task.due_date = due;

    let task = engine.create(task, prerequisites)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "description": task.description,
            "prerequisites": task.prerequisites.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        output.success(&format!("Created task: {} - {}", task.id, task.description));
    }

    Ok(())
}

fn list_tasks(output: &Output, all: bool) -> Result<()> {
    let engine = open_engine()?;
    let tasks = engine.tasks()?;

    let mut sorted: Vec<_> = tasks
        .values()
        .filter(|t| all || !t.completed)
        .collect();
    sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    if output.is_json() {
        let items: Vec<_> = sorted
            .iter()
            .map(|t| {
                serde_json::json!({
                    "id": t.id.to_string(),
                    "description": t.description,
                    "completed": t.completed,
                    "blocked": t.is_blocked(&tasks),
                    "prerequisites": t.prerequisites.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&items);
    } else if sorted.is_empty() {
        println!("No tasks");
    } else {
        println!("{:<12} {:<10} DESCRIPTION", "ID", "STATE");
        println!("{}", "-".repeat(60));

        for task in sorted {
            let state = if task.completed {
                "done"
            } else if task.is_blocked(&tasks) {
                "blocked"
            } else {
                "open"
            };
            println!("{:<12} {:<10} {}", task.id, state, task.description);
        }
    }

    Ok(())
}

fn show_task(output: &Output, id_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let tasks = engine.tasks()?;

    let id: TaskId = id_str.parse()?;
    let task = tasks
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    let blocked = task.is_blocked(&tasks);

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": task.id.to_string(),
            "description": task.description,
            "completed": task.completed,
            "completed_at": task.completed_at,
            "blocked": blocked,
            "prerequisites": task.prerequisites.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "priority": task.priority,
            "category": task.category,
            "due_date": task.due_date,
            "created_at": task.created_at,
            "updated_at": task.updated_at,
        }));
    } else {
        println!("Task: {}", task.id);
        println!("Description: {}", task.description);
        println!(
            "State: {}",
            if task.completed {
                "done"
            } else if blocked {
                "blocked"
            } else {
                "open"
            }
        );
        if let Some(completed) = task.completed_at {
            println!("Completed: {}", completed.format("%Y-%m-%d %H:%M"));
        }
        if let Some(priority) = &task.priority {
            println!("Priority: {}", priority);
        }
        if let Some(category) = &task.category {
            println!("Category: {}", category);
        }
        if let Some(due) = &task.due_date {
            println!("Due: {}", due);
        }

        if !task.prerequisites.is_empty() {
            println!("\nRequires:");
            for prereq in &task.prerequisites {
                let state = tasks
                    .get(prereq)
                    .map(|t| if t.completed { "done" } else { "incomplete" })
                    .unwrap_or("missing");
                println!("  {} ({})", prereq, state);
            }
        }
    }

    Ok(())
}

fn complete_task(output: &Output, id_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let id: TaskId = id_str.parse()?;

    let outcome = engine.set_completion(&id, true)?;

    for pruned in &outcome.pruned {
        output.verbose_ctx(
            "done",
            &format!("Dropped stale prerequisite {} from {}", pruned, id),
        );
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "completed": true,
            "unblocked": outcome.unblocked.iter().map(|u| u.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        output.success(&format!("Completed task: {}", id));
        if !outcome.unblocked.is_empty() {
            output.notice(&format!(
                "Unblocked {} dependent task(s): {}",
                outcome.unblocked.len(),
                outcome
                    .unblocked
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }

    Ok(())
}

fn reopen_task(output: &Output, id_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let id: TaskId = id_str.parse()?;

    engine.set_completion(&id, false)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "completed": false,
        }));
    } else {
        output.success(&format!("Reopened task: {}", id));
    }

    Ok(())
}

fn delete_task(output: &Output, id_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let id: TaskId = id_str.parse()?;

    let outcome = engine.delete(&id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "deleted": true,
            "removed_dependents": outcome.removed_dependents.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        output.success(&format!("Deleted task: {}", id));
        for dependent in &outcome.removed_dependents {
            output.notice(&format!("{} no longer requires {}", dependent, id));
        }
    }

    Ok(())
}

fn add_prerequisite(output: &Output, task_str: &str, requires_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let task_id: TaskId = task_str.parse()?;
    let requires_id: TaskId = requires_str.parse()?;

    let tasks = engine.tasks()?;
    let mut prerequisites = tasks
        .get(&task_id)
        .map(|t| t.prerequisites.clone())
        .unwrap_or_default();
    prerequisites.insert(requires_id.clone());

    engine.set_prerequisites(&task_id, prerequisites)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id.to_string(),
            "requires": requires_id.to_string(),
        }));
    } else {
        output.success(&format!("{} now requires {}", task_id, requires_id));
    }

    Ok(())
}

fn show_dependencies(output: &Output, id_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let tasks = engine.tasks()?;

    let id: TaskId = id_str.parse()?;
    let task = tasks
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Task not found: {}", id))?;

    let mut dependents: Vec<&Task> = tasks
        .values()
        .filter(|t| t.prerequisites.contains(&id))
        .collect();
    dependents.sort_by(|a, b| a.id.cmp(&b.id));

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id.to_string(),
            "prerequisites": task.prerequisites.iter().map(|p| p.to_string()).collect::<Vec<_>>(),
            "dependents": dependents.iter().map(|t| t.id.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        println!("Task: {} - {}", task.id, task.description);

        if task.prerequisites.is_empty() {
            println!("Requires: nothing");
        } else {
            println!("Requires:");
            for prereq in &task.prerequisites {
                let state = tasks
                    .get(prereq)
                    .map(|t| if t.completed { "done" } else { "incomplete" })
                    .unwrap_or("missing");
                println!("  {} ({})", prereq, state);
            }
        }

        if dependents.is_empty() {
            println!("Required by: nothing");
        } else {
            println!("Required by:");
            for dependent in dependents {
                println!("  {} - {}", dependent.id, dependent.description);
            }
        }
    }

    Ok(())
}

fn remove_prerequisite(output: &Output, task_str: &str, requires_str: &str) -> Result<()> {
    let engine = open_engine()?;
    let task_id: TaskId = task_str.parse()?;
    let requires_id: TaskId = requires_str.parse()?;

    let tasks = engine.tasks()?;
    let mut prerequisites = tasks
        .get(&task_id)
        .map(|t| t.prerequisites.clone())
        .unwrap_or_default();
    prerequisites.remove(&requires_id);

    engine.set_prerequisites(&task_id, prerequisites)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "task": task_id.to_string(),
            "removed": requires_id.to_string(),
        }));
    } else {
        output.success(&format!(
            "{} no longer requires {}",
            task_id, requires_id
        ));
    }

    Ok(())
}
