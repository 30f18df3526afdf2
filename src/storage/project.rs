//! Project management
//!
//! Handles project initialization and provides access to stores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, HistoryStore, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a focus project. Run 'focus init' first.")]
    NotInProject,
}

/// A Focus project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let focus_dir = root.join(".focus");

        if !focus_dir.is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;
        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let focus_dir = root.join(".focus");

        fs::create_dir_all(&focus_dir).with_context(|| {
            format!("Failed to create .focus directory: {}", focus_dir.display())
        })?;

        let config_path = focus_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# Focus CLI configuration

[pomodoro]
# Durations in seconds
work_duration = 1500
short_break_duration = 300
long_break_duration = 900

# Work sessions between long breaks
long_break_interval = 4

# Start the next phase without waiting for 'focus pomodoro run'
auto_start_breaks = false
auto_start_work = false
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.focus` directory
    pub fn focus_dir(&self) -> PathBuf {
        self.root.join(".focus")
    }

    /// Returns the project configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store for this project
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }

    /// Returns the pomodoro history store for this project
    pub fn history_store(&self) -> HistoryStore {
        HistoryStore::for_project(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.focus_dir().is_dir());
        assert!(project.focus_dir().join("config.toml").exists());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();
        let project = Project::init(dir.path()).unwrap();
        assert!(project.focus_dir().is_dir());
    }

    #[test]
    fn open_missing_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn default_config_parses() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let settings = &project.config().project.pomodoro;
        assert_eq!(settings.work_duration, 1500);
        assert_eq!(settings.long_break_interval, 4);
    }

    #[test]
    fn stores_live_under_focus_dir() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert!(project.task_store().path().starts_with(project.focus_dir()));
        assert!(project
            .history_store()
            .path()
            .starts_with(project.focus_dir()));
    }
}
