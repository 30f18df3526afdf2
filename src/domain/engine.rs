//! Task engine
//!
//! Binds the prerequisite graph to the persisted task collection. Every
//! operation loads the current collection, validates fully, mutates in
//! memory, and persists once: validate-then-commit, so an error never
//! leaves a partial write behind.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use super::graph::{DependencyGraph, GraphError};
use super::id::TaskId;
use super::propagate::newly_unblocked;
use super::task::Task;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Persistence surface the engine operates over: a named collection of
/// task records with get-all/set-all semantics.
pub trait TaskRepository {
    fn load(&self) -> anyhow::Result<HashMap<TaskId, Task>>;
    fn save(&self, tasks: &HashMap<TaskId, Task>) -> anyhow::Result<()>;
}

/// Result of a successful completion toggle
#[derive(Debug, Default, PartialEq)]
pub struct CompletionOutcome {
    /// Dependents whose last incomplete prerequisite was this task
    pub unblocked: Vec<TaskId>,
    /// Stale prerequisite IDs dropped from the task during the write
    pub pruned: Vec<TaskId>,
}

/// Result of a successful deletion
#[derive(Debug, PartialEq)]
pub struct DeletionOutcome {
    /// Tasks that listed the deleted task as a prerequisite
    pub removed_dependents: Vec<TaskId>,
}

/// The dependency graph engine: all task mutation goes through here.
pub struct TaskEngine<S> {
    store: S,
}

impl<S: TaskRepository> TaskEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the full task collection
    pub fn tasks(&self) -> Result<HashMap<TaskId, Task>, EngineError> {
        Ok(self.store.load()?)
    }

    /// Creates a task with an optional initial prerequisite set.
    ///
    /// A fresh task cannot close a cycle (nothing depends on it yet), so
    /// only existence and self-reference need checking.
    pub fn create(
        &self,
        task: Task,
        prerequisites: BTreeSet<TaskId>,
    ) -> Result<Task, EngineError> {
        let mut tasks = self.store.load()?;

        for prereq_id in &prerequisites {
            if *prereq_id == task.id {
                return Err(GraphError::SelfDependency(task.id).into());
            }
            if !tasks.contains_key(prereq_id) {
                return Err(GraphError::UnknownTask(prereq_id.clone()).into());
            }
        }

        let mut task = task;
        task.set_prerequisites(prerequisites);
        tasks.insert(task.id.clone(), task.clone());
        self.store.save(&tasks)?;
        Ok(task)
    }

    /// Replaces a task's prerequisite set.
    ///
    /// Rejects unknown IDs, self-dependencies, and cycles; nothing is
    /// persisted on any error path.
    pub fn set_prerequisites(
        &self,
        task_id: &TaskId,
        prerequisite_ids: BTreeSet<TaskId>,
    ) -> Result<(), EngineError> {
        let mut tasks = self.store.load()?;

        if !tasks.contains_key(task_id) {
            return Err(GraphError::UnknownTask(task_id.clone()).into());
        }
        for prereq_id in &prerequisite_ids {
            if prereq_id == task_id {
                return Err(GraphError::SelfDependency(task_id.clone()).into());
            }
            if !tasks.contains_key(prereq_id) {
                return Err(GraphError::UnknownTask(prereq_id.clone()).into());
            }
        }

        // Candidate graph: all existing edges except this task's old
        // incoming set, then the new set edge by edge for precise errors.
        let mut candidate: Vec<Task> = tasks.values().cloned().collect();
        for t in &mut candidate {
            if &t.id == task_id {
                t.prerequisites.clear();
            }
        }
        let mut graph = DependencyGraph::from_tasks(candidate.iter())?;
        for prereq_id in &prerequisite_ids {
            graph.add_prerequisite(task_id, prereq_id)?;
        }

        let task = tasks.get_mut(task_id).ok_or_else(|| {
            GraphError::UnknownTask(task_id.clone())
        })?;
        task.set_prerequisites(prerequisite_ids);
        self.store.save(&tasks)?;
        Ok(())
    }

    /// Returns true if any of the task's prerequisites is incomplete
    pub fn is_blocked(&self, task_id: &TaskId) -> Result<bool, EngineError> {
        let tasks = self.store.load()?;
        let task = tasks
            .get(task_id)
            .ok_or_else(|| GraphError::UnknownTask(task_id.clone()))?;
        Ok(task.is_blocked(&tasks))
    }

    /// Toggles a task's completion state.
    ///
    /// Completing a blocked task fails with `BlockedByPrerequisites` and
    /// writes nothing. Completing an already-complete task is a no-op
    /// that preserves the original `completed_at`. Un-completing is
    /// always allowed. On a fresh completion, returns the dependents
    /// that became unblocked.
    pub fn set_completion(
        &self,
        task_id: &TaskId,
        completed: bool,
    ) -> Result<CompletionOutcome, EngineError> {
        let mut tasks = self.store.load()?;

        let task = tasks
            .get(task_id)
            .ok_or_else(|| GraphError::UnknownTask(task_id.clone()))?;

        if !completed {
            if !task.completed {
                return Ok(CompletionOutcome::default());
            }
            if let Some(task) = tasks.get_mut(task_id) {
                task.reopen();
            }
            self.store.save(&tasks)?;
            return Ok(CompletionOutcome::default());
        }

        if task.completed {
            return Ok(CompletionOutcome::default());
        }

        let incomplete = task.incomplete_prerequisites(&tasks);
        if !incomplete.is_empty() {
            return Err(GraphError::BlockedByPrerequisites {
                task: task_id.clone(),
                incomplete: incomplete.len(),
            }
            .into());
        }

        // Commit: stale references are pruned as part of this write
        let snapshot = tasks.clone();
        let pruned = match tasks.get_mut(task_id) {
            Some(task) => {
                let pruned = task.prune_missing_prerequisites(&snapshot);
                task.complete();
                pruned
            }
            None => Vec::new(),
        };
        self.store.save(&tasks)?;

        Ok(CompletionOutcome {
            unblocked: newly_unblocked(task_id, &tasks),
            pruned,
        })
    }

    /// Deletes a task, cascading its removal from every dependent's
    /// prerequisite set. Returns the affected dependent IDs so the
    /// caller can surface a notice.
    pub fn delete(&self, task_id: &TaskId) -> Result<DeletionOutcome, EngineError> {
        let mut tasks = self.store.load()?;

        if !tasks.contains_key(task_id) {
            return Err(GraphError::UnknownTask(task_id.clone()).into());
        }

        let mut removed_dependents = Vec::new();
        for task in tasks.values_mut() {
            if task.remove_prerequisite(task_id) {
                removed_dependents.push(task.id.clone());
            }
        }
        removed_dependents.sort();

        tasks.remove(task_id);
        self.store.save(&tasks)?;

        Ok(DeletionOutcome { removed_dependents })
    }
}
