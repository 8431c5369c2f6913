//! Rolling stress history and its JSON persistence
//!
//! The history keeps a bounded window of closed days plus the "Today"
//! record being edited. Recomputing today replaces that record instead of
//! stacking duplicates; closing the day commits it into the window and
//! evicts the oldest entry when the window is full.

use crate::models::{HistoricalDayRecord, TODAY_LABEL};
use crate::scoring::{MAX_SCORE, MIN_SCORE};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Closed days retained by default
pub const DEFAULT_HISTORY_WINDOW: usize = 7;

/// History storage errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse history file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("Failed to serialize history for {path}: {reason}")]
    Serialize { path: PathBuf, reason: String },
    #[error("Invalid stress score {score} for day '{label}'")]
    InvalidRecord { label: String, score: u8 },
    #[error("History window must hold at least one day")]
    ZeroCapacity,
    #[error("No record for today to close")]
    NothingToClose,
}

/// Bounded window of past days plus today's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressHistory {
    capacity: usize,
    past: VecDeque<HistoricalDayRecord>,
    today: Option<HistoricalDayRecord>,
}

impl Default for StressHistory {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_WINDOW,
            past: VecDeque::with_capacity(DEFAULT_HISTORY_WINDOW),
            today: None,
        }
    }
}

impl StressHistory {
    /// Empty history keeping at most `capacity` closed days
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            past: VecDeque::with_capacity(capacity),
            today: None,
        })
    }

    /// History seeded with closed days, oldest first
    ///
    /// Only the newest `capacity` records are kept.
    pub fn with_records(
        capacity: usize,
        records: impl IntoIterator<Item = HistoricalDayRecord>,
    ) -> Result<Self, HistoryError> {
        let mut history = Self::new(capacity)?;
        for record in records {
            history.push(record)?;
        }
        Ok(history)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Closed days, oldest first
    pub fn past(&self) -> impl Iterator<Item = &HistoricalDayRecord> {
        self.past.iter()
    }

    /// Today's record, if computed
    pub fn today(&self) -> Option<&HistoricalDayRecord> {
        self.today.as_ref()
    }

    /// Closed days followed by today, oldest first
    pub fn records(&self) -> Vec<HistoricalDayRecord> {
        self.past.iter().chain(self.today.iter()).cloned().collect()
    }

    /// Number of records including today
    pub fn len(&self) -> usize {
        self.past.len() + usize::from(self.today.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a closed day, evicting the oldest when full
    pub fn push(&mut self, record: HistoricalDayRecord) -> Result<(), HistoryError> {
        validate_record(&record)?;
        while self.past.len() >= self.capacity {
            match self.past.pop_front() {
                Some(evicted) => tracing::debug!(label = %evicted.label, "Evicted oldest history day"),
                None => break,
            }
        }
        self.past.push_back(record);
        Ok(())
    }

    /// Replace today's record
    pub fn set_today(&mut self, record: HistoricalDayRecord) -> Result<(), HistoryError> {
        validate_record(&record)?;
        self.today = Some(HistoricalDayRecord {
            label: TODAY_LABEL.to_string(),
            ..record
        });
        Ok(())
    }

    /// Commit today's record into the window under its final label
    pub fn close_day(&mut self, label: impl Into<String>) -> Result<HistoricalDayRecord, HistoryError> {
        let today = self.today.take().ok_or(HistoryError::NothingToClose)?;
        let closed = today.relabeled(label);
        self.push(closed.clone())?;
        tracing::info!(label = %closed.label, score = closed.stress_score, "Closed stress day");
        Ok(closed)
    }

    /// Forget every record
    pub fn clear(&mut self) {
        self.past.clear();
        self.today = None;
    }

    /// Re-check invariants after deserialization
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.capacity == 0 {
            return Err(HistoryError::ZeroCapacity);
        }
        self.past.iter().chain(self.today.iter()).try_for_each(validate_record)
    }

    /// Copy with a different window size, keeping the newest days
    pub fn with_capacity(&self, capacity: usize) -> Result<Self, HistoryError> {
        let mut resized = Self::with_records(capacity, self.past.iter().cloned())?;
        resized.today = self.today.clone();
        Ok(resized)
    }
}

fn validate_record(record: &HistoricalDayRecord) -> Result<(), HistoryError> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&record.stress_score) {
        return Err(HistoryError::InvalidRecord {
            label: record.label.clone(),
            score: record.stress_score,
        });
    }
    Ok(())
}

/// JSON file holding the stress history between sessions
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's local data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stresscast")
            .join("history.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the history, or an empty window of `capacity` if no file exists
    pub fn load_or_empty(&self, capacity: usize) -> Result<StressHistory, HistoryError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No history file, starting empty");
            return StressHistory::new(capacity);
        }
        let history = self.load()?;
        if history.capacity() == capacity {
            Ok(history)
        } else {
            history.with_capacity(capacity)
        }
    }

    /// Load and validate the history file
    pub fn load(&self) -> Result<StressHistory, HistoryError> {
        let content = fs::read_to_string(&self.path).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        let mut history: StressHistory =
            serde_json::from_str(&content).map_err(|e| HistoryError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;
        history.validate()?;

        // Hand-edited files may hold more days than the window allows
        if history.past.len() > history.capacity {
            tracing::warn!(
                path = %self.path.display(),
                days = history.past.len(),
                capacity = history.capacity,
                "History file exceeds its window, dropping oldest days"
            );
            history = history.with_capacity(history.capacity)?;
        }

        tracing::info!(path = %self.path.display(), days = history.len(), "Loaded stress history");
        Ok(history)
    }

    /// Write the history, creating parent directories as needed
    pub fn save(&self, history: &StressHistory) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(history).map_err(|e| HistoryError::Serialize {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(path = %self.path.display(), days = history.len(), "Saved stress history");
        Ok(())
    }

    /// Remove the history file if present
    pub fn clear(&self) -> Result<(), HistoryError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|source| HistoryError::Io {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(label: &str, score: u8) -> HistoricalDayRecord {
        HistoricalDayRecord {
            label: label.to_string(),
            stress_score: score,
            sleep_hours: 7.0,
            exercise_sessions: 3.0,
            work_hours: 8.0,
        }
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut history = StressHistory::new(3).unwrap();
        for (i, score) in [4, 5, 6, 7].into_iter().enumerate() {
            history.push(record(&format!("d{}", i), score)).unwrap();
        }

        let labels: Vec<String> = history.past().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec!["d1", "d2", "d3"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_today_is_replaced_not_stacked() {
        let mut history = StressHistory::with_records(7, vec![record("Mon", 4)]).unwrap();
        history.set_today(record("whatever", 5)).unwrap();
        history.set_today(record("whatever", 8)).unwrap();

        let records = history.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].label, TODAY_LABEL);
        assert_eq!(records[1].stress_score, 8);
    }

    #[test]
    fn test_close_day_commits_today() {
        let mut history = StressHistory::with_records(2, vec![record("Mon", 4), record("Tue", 5)]).unwrap();
        history.set_today(record(TODAY_LABEL, 6)).unwrap();

        let closed = history.close_day("Wed").unwrap();
        assert_eq!(closed.label, "Wed");
        assert!(history.today().is_none());

        let labels: Vec<String> = history.past().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec!["Tue", "Wed"]);

        assert!(matches!(history.close_day("Thu"), Err(HistoryError::NothingToClose)));
    }

    #[test]
    fn test_rejects_invalid_records() {
        let mut history = StressHistory::default();
        assert!(matches!(
            history.push(record("bad", 0)),
            Err(HistoryError::InvalidRecord { score: 0, .. })
        ));
        assert!(history.set_today(record("bad", 11)).is_err());
        assert!(history.is_empty());
        assert!(matches!(StressHistory::new(0), Err(HistoryError::ZeroCapacity)));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("history.json"));

        let mut history = StressHistory::with_records(7, vec![record("Mon", 3), record("Tue", 6)]).unwrap();
        history.set_today(record(TODAY_LABEL, 7)).unwrap();
        store.save(&history).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let history = store.load_or_empty(5).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 5);
    }

    #[test]
    fn test_store_resizes_window_on_load() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let history = StressHistory::with_records(
            7,
            (1..=6).map(|i| record(&format!("d{}", i), i as u8)),
        )
        .unwrap();
        store.save(&history).unwrap();

        let resized = store.load_or_empty(3).unwrap();
        let scores: Vec<u8> = resized.past().map(|r| r.stress_score).collect();
        assert_eq!(scores, vec![4, 5, 6]);
    }

    #[test]
    fn test_store_rejects_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = HistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HistoryError::Parse { .. }));
    }

    #[test]
    fn test_store_rejects_out_of_range_scores() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"{"capacity": 7, "past": [{"label": "Mon", "stress_score": 12, "sleep_hours": 7.0, "exercise_sessions": 3.0, "work_hours": 8.0}], "today": null}"#,
        )
        .unwrap();

        let err = HistoryStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HistoryError::InvalidRecord { score: 12, .. }));
    }

    #[test]
    fn test_store_trims_oversized_window() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let past: Vec<String> = (1..=10)
            .map(|i| {
                format!(
                    r#"{{"label": "d{}", "stress_score": {}, "sleep_hours": 7.0, "exercise_sessions": 3.0, "work_hours": 8.0}}"#,
                    i, i
                )
            })
            .collect();
        std::fs::write(
            &path,
            format!(r#"{{"capacity": 7, "past": [{}], "today": null}}"#, past.join(",")),
        )
        .unwrap();

        let mut history = HistoryStore::new(&path).load_or_empty(7).unwrap();
        let scores: Vec<u8> = history.past().map(|r| r.stress_score).collect();
        assert_eq!(scores, vec![4, 5, 6, 7, 8, 9, 10]);

        history.push(record("d11", 5)).unwrap();
        assert_eq!(history.past().count(), 7);
        assert_eq!(history.past().next().unwrap().label, "d5");
    }

    #[test]
    fn test_serialize_error_message() {
        let err = HistoryError::Serialize {
            path: PathBuf::from("history.json"),
            reason: "bad float".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to serialize history for history.json: bad float");
    }

    #[test]
    fn test_push_evicts_down_to_capacity() {
        let mut history = StressHistory {
            capacity: 2,
            past: (1..=5).map(|i| record(&format!("d{}", i), i as u8)).collect(),
            today: None,
        };
        history.push(record("d6", 6)).unwrap();

        let labels: Vec<String> = history.past().map(|r| r.label.clone()).collect();
        assert_eq!(labels, vec!["d5", "d6"]);
    }

    #[test]
    fn test_store_clear() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        store.save(&StressHistory::default()).unwrap();
        assert!(store.path().exists());
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }
}
