//! # Storage Layer
//!
//! Persistence layer for Focus CLI with git-friendly file formats.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.focus/tasks.jsonl` |
//! | Pomodoro history | JSON (`YYYY-MM-DD` -> count) | `.focus/pomodoro_history.json` |
//! | Config | TOML | `.focus/config.toml` |
//!
//! [`TaskStore`] uses file locking (`fs2`) for concurrent access and all
//! writes are atomic (temp file + rename). Cross-process writers beyond
//! that are last-write-wins.
//!
//! [`Project`] is the entry point for accessing a Focus project.

mod jsonl;
mod history;
mod config;
mod project;

pub use jsonl::TaskStore;
pub use history::HistoryStore;
pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, PomodoroSettings, ProjectConfig};
pub use project::{Project, ProjectError};
