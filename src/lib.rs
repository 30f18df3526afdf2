//! Focus CLI - A local-first productivity tracker
//!
//! Focus organizes work as tasks with prerequisite relationships: a task
//! cannot be completed until every task it lists as a prerequisite is
//! done. Completing a task reports which dependents became unblocked.
//! A pomodoro timer with work/break phase cycling rounds out the tool.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{
    DependencyGraph, GraphError, Phase, PomodoroConfig, PomodoroTimer, Task, TaskEngine, TaskId,
};
