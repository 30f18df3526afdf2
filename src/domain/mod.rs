//! Domain models for Focus CLI
//!
//! Contains the core business logic without any I/O concerns, except for
//! the engine which binds graph validation to the task store.

mod id;
mod task;
mod graph;
mod engine;
mod propagate;
mod pomodoro;

pub use id::{IdError, TaskId};
pub use task::Task;
pub use graph::{DependencyGraph, GraphError};
pub use engine::{CompletionOutcome, DeletionOutcome, EngineError, TaskEngine, TaskRepository};
pub use propagate::newly_unblocked;
pub use pomodoro::{Phase, PhaseEvent, PomodoroConfig, PomodoroError, PomodoroTimer};
