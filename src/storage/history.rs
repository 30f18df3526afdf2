//! Pomodoro history storage
//!
//! Daily work-session counts stored as a JSON map from `YYYY-MM-DD` to
//! count at `.focus/pomodoro_history.json`. Same temp-file + rename
//! discipline as the task store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Store for daily pomodoro session counts
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the default store for a project
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".focus").join("pomodoro_history.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full history map
    pub fn read_all(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history: {}", self.path.display()))
    }

    fn write_all(&self, history: &BTreeMap<String, u32>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content =
            serde_json::to_string_pretty(history).context("Failed to serialize history")?;
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write history: {}", temp_path.display()))?;

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Increments the session count for the given date, returning the
    /// new count for that date
    pub fn record_session(&self, date: NaiveDate) -> Result<u32> {
        let mut history = self.read_all()?;
        let key = date.format("%Y-%m-%d").to_string();
        let count = history.entry(key).or_insert(0);
        *count += 1;
        let count = *count;
        self.write_all(&history)?;
        Ok(count)
    }

    /// Returns the session count for the given date
    pub fn count_on(&self, date: NaiveDate) -> Result<u32> {
        let history = self.read_all()?;
        let key = date.format("%Y-%m-%d").to_string();
        Ok(history.get(&key).copied().unwrap_or(0))
    }

    /// Returns the all-time session count
    pub fn total_sessions(&self) -> Result<u32> {
        Ok(self.read_all()?.values().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_history() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.count_on(date("2026-08-30")).unwrap(), 0);
        assert_eq!(store.total_sessions().unwrap(), 0);
    }

    #[test]
    fn record_increments_per_day() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        assert_eq!(store.record_session(date("2026-08-30")).unwrap(), 1);
        assert_eq!(store.record_session(date("2026-08-30")).unwrap(), 2);
        assert_eq!(store.record_session(date("2026-08-31")).unwrap(), 1);

        assert_eq!(store.count_on(date("2026-08-30")).unwrap(), 2);
        assert_eq!(store.count_on(date("2026-08-31")).unwrap(), 1);
        assert_eq!(store.total_sessions().unwrap(), 3);
    }

    #[test]
    fn keys_are_iso_dates() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        store.record_session(date("2026-01-05")).unwrap();

        let history = store.read_all().unwrap();
        assert!(history.contains_key("2026-01-05"));
    }

    #[test]
    fn persists_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        HistoryStore::new(&path).record_session(date("2026-08-30")).unwrap();
        assert_eq!(
            HistoryStore::new(&path).count_on(date("2026-08-30")).unwrap(),
            1
        );
    }
}
