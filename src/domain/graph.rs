//! Prerequisite graph for tasks
//!
//! Maintains directed prerequisite edges with cycle detection. Uses
//! petgraph for graph operations; the cycle check walks the whole graph
//! iteratively, so pathological chains cannot blow the stack.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use thiserror::Error;

use super::id::TaskId;
use super::task::Task;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Task not found: {0}")]
    UnknownTask(TaskId),

    #[error("Self-dependency not allowed: {0}")]
    SelfDependency(TaskId),

    #[error("Prerequisite would create a cycle: {0} -> {1}")]
    CycleDetected(TaskId, TaskId),

    #[error("Cannot complete {task}: {incomplete} prerequisite(s) incomplete")]
    BlockedByPrerequisites { task: TaskId, incomplete: usize },
}

/// A prerequisite graph over task IDs.
///
/// Edge direction is `prerequisite -> dependent`: the prerequisite must be
/// completed before the dependent can be.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TaskId, ()>,
    node_map: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from a collection of tasks.
    ///
    /// Prerequisite IDs that reference missing tasks are skipped rather
    /// than treated as errors; a stale reference is non-blocking data to
    /// prune, not a fatal condition.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Result<Self, GraphError> {
        let mut graph = Self::new();

        let tasks: Vec<_> = tasks.into_iter().collect();
        for task in &tasks {
            graph.add_task(task.id.clone());
        }

        for task in &tasks {
            for prereq_id in &task.prerequisites {
                if !graph.contains(prereq_id) {
                    continue;
                }
                graph.add_prerequisite(&task.id, prereq_id)?;
            }
        }

        Ok(graph)
    }

    /// Adds a task node to the graph
    pub fn add_task(&mut self, task_id: TaskId) {
        if !self.node_map.contains_key(&task_id) {
            let idx = self.graph.add_node(task_id.clone());
            self.node_map.insert(task_id, idx);
        }
    }

    /// Removes a task and all its edges
    pub fn remove_task(&mut self, task_id: &TaskId) -> bool {
        if let Some(idx) = self.node_map.remove(task_id) {
            self.graph.remove_node(idx);
            // petgraph may reuse indices, so the map must be rebuilt
            self.rebuild_node_map();
            true
        } else {
            false
        }
    }

    fn rebuild_node_map(&mut self) {
        self.node_map.clear();
        for idx in self.graph.node_indices() {
            if let Some(task_id) = self.graph.node_weight(idx) {
                self.node_map.insert(task_id.clone(), idx);
            }
        }
    }

    /// Adds an edge: `task` requires `prerequisite` to be completed first.
    ///
    /// Rejects self-dependencies, unknown IDs, and any edge that would
    /// make the graph cyclic. On rejection the graph is unchanged.
    pub fn add_prerequisite(
        &mut self,
        task: &TaskId,
        prerequisite: &TaskId,
    ) -> Result<(), GraphError> {
        if task == prerequisite {
            return Err(GraphError::SelfDependency(task.clone()));
        }

        let task_idx = self
            .node_map
            .get(task)
            .ok_or_else(|| GraphError::UnknownTask(task.clone()))?;

        let prereq_idx = self
            .node_map
            .get(prerequisite)
            .ok_or_else(|| GraphError::UnknownTask(prerequisite.clone()))?;

        if self.graph.find_edge(*prereq_idx, *task_idx).is_some() {
            return Ok(());
        }

        // Probe: add the edge, check, roll back on cycle
        self.graph.add_edge(*prereq_idx, *task_idx, ());

        if is_cyclic_directed(&self.graph) {
            if let Some(edge) = self.graph.find_edge(*prereq_idx, *task_idx) {
                self.graph.remove_edge(edge);
            }
            return Err(GraphError::CycleDetected(
                task.clone(),
                prerequisite.clone(),
            ));
        }

        Ok(())
    }

    /// Removes a prerequisite edge, returning true if it existed
    pub fn remove_prerequisite(&mut self, task: &TaskId, prerequisite: &TaskId) -> bool {
        let task_idx = match self.node_map.get(task) {
            Some(idx) => *idx,
            None => return false,
        };

        let prereq_idx = match self.node_map.get(prerequisite) {
            Some(idx) => *idx,
            None => return false,
        };

        if let Some(edge) = self.graph.find_edge(prereq_idx, task_idx) {
            self.graph.remove_edge(edge);
            true
        } else {
            false
        }
    }

    /// Returns the direct prerequisites of a task
    pub fn prerequisites_of(&self, task_id: &TaskId) -> Vec<TaskId> {
        let task_idx = match self.node_map.get(task_id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(task_idx, petgraph::Direction::Incoming)
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Returns the direct dependents of a task (tasks listing it as a
    /// prerequisite)
    pub fn dependents_of(&self, task_id: &TaskId) -> Vec<TaskId> {
        let task_idx = match self.node_map.get(task_id) {
            Some(idx) => *idx,
            None => return vec![],
        };

        self.graph
            .neighbors_directed(task_idx, petgraph::Direction::Outgoing)
            .filter_map(|idx| self.graph.node_weight(idx).cloned())
            .collect()
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.node_map.contains_key(task_id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }
}
