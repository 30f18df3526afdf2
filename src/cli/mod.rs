//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status` |
//! | Task | Work item management | `task add`, `task done`, `task dep` |
//! | Query | Task state queries | `ready`, `blocked` |
//! | Pomodoro | Timer | `pomodoro run`, `pomodoro status` |
//!
//! All commands support `--format text|json` and `--verbose` for debug
//! output on stderr. Call [`run()`] to parse arguments and execute.

mod app;
mod output;
mod task;
mod query;
mod pomodoro_cmd;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
