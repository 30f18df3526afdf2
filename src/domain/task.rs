//! Task domain model
//!
//! A task carries a completion flag and a set of prerequisite task IDs.
//! A task may not be marked complete while any prerequisite is incomplete;
//! that gate is enforced by the engine, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use super::id::TaskId;

/// A task in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned at creation
    pub id: TaskId,

    /// Human-readable description (non-empty)
    pub description: String,

    /// Whether the task is completed
    #[serde(default)]
    pub completed: bool,

    /// When the task was completed; present iff `completed` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// IDs of tasks that must be completed before this one can be
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub prerequisites: BTreeSet<TaskId>,

    /// Opaque priority label, not interpreted by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Opaque category label, not interpreted by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Opaque due date, not interpreted by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new incomplete task with the given ID and description
    pub fn new(id: TaskId, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            description: description.into(),
            completed: false,
            completed_at: None,
            prerequisites: BTreeSet::new(),
            priority: None,
            category: None,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if any prerequisite refers to an incomplete task.
    ///
    /// A prerequisite ID that is missing from the collection is treated as
    /// non-blocking; stale references are pruned on the next write.
    pub fn is_blocked(&self, tasks: &HashMap<TaskId, Task>) -> bool {
        self.prerequisites
            .iter()
            .any(|p| tasks.get(p).map(|t| !t.completed).unwrap_or(false))
    }

    /// Returns the prerequisite IDs that are currently incomplete
    pub fn incomplete_prerequisites(&self, tasks: &HashMap<TaskId, Task>) -> Vec<TaskId> {
        self.prerequisites
            .iter()
            .filter(|p| tasks.get(p).map(|t| !t.completed).unwrap_or(false))
            .cloned()
            .collect()
    }

    /// Marks the task complete, stamping `completed_at`.
    ///
    /// A no-op if already complete, so the original completion timestamp
    /// is preserved.
    pub fn complete(&mut self) {
        if !self.completed {
            let now = Utc::now();
            self.completed = true;
            self.completed_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Marks the task incomplete, clearing `completed_at`
    pub fn reopen(&mut self) {
        if self.completed {
            self.completed = false;
            self.completed_at = None;
            self.updated_at = Utc::now();
        }
    }

    /// Removes a prerequisite, returning true if it was present
    pub fn remove_prerequisite(&mut self, task_id: &TaskId) -> bool {
        let removed = self.prerequisites.remove(task_id);
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Replaces the prerequisite set
    pub fn set_prerequisites(&mut self, prerequisites: BTreeSet<TaskId>) {
        if self.prerequisites != prerequisites {
            self.prerequisites = prerequisites;
            self.updated_at = Utc::now();
        }
    }

    /// Drops prerequisite IDs that no longer exist in the collection,
    /// returning the pruned IDs
    pub fn prune_missing_prerequisites(&mut self, tasks: &HashMap<TaskId, Task>) -> Vec<TaskId> {
        let stale: Vec<TaskId> = self
            .prerequisites
            .iter()
            .filter(|p| !tasks.contains_key(*p))
            .cloned()
            .collect();

        for id in &stale {
            self.prerequisites.remove(id);
        }
        if !stale.is_empty() {
            self.updated_at = Utc::now();
        }
        stale
    }
}
