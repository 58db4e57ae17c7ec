//! Best survival times
//!
//! Persisted as JSON next to the settings file, tracks the top 10 sessions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::DeathCause;

/// Maximum number of records to keep
pub const MAX_RECORDS: usize = 10;

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("failed to read/write records file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("records file {path} is invalid: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalEntry {
    /// Session length in ms
    pub survival_ms: f64,
    /// Which death ended it (1-based)
    pub death_number: u32,
    pub cause: DeathCause,
    /// Level seed
    pub seed: u64,
}

/// Leaderboard, longest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurvivalRecords {
    pub entries: Vec<SurvivalEntry>,
}

impl SurvivalRecords {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a survival time makes the board
    pub fn qualifies(&self, survival_ms: f64) -> bool {
        if !(survival_ms > 0.0) {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries.last().is_none_or(|e| survival_ms > e.survival_ms)
    }

    /// Insert a session if it qualifies. Returns the rank achieved (1-indexed).
    pub fn add(&mut self, entry: SurvivalEntry) -> Option<usize> {
        if !self.qualifies(entry.survival_ms) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| entry.survival_ms > e.survival_ms);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest survival (ms), if any
    pub fn best(&self) -> Option<f64> {
        self.entries.first().map(|e| e.survival_ms)
    }

    pub fn load(path: &Path) -> Result<Self, RecordsError> {
        let json = std::fs::read_to_string(path).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Self = serde_json::from_str(&json).map_err(|source| RecordsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded {} survival records", records.entries.len());
        Ok(records)
    }

    /// Load, or start fresh if the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(records) => records,
            Err(RecordsError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No survival records found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("{e}; starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), RecordsError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| RecordsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Survival records saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Format a survival time as `m:ss.t`
pub fn format_survival(ms: f64) -> String {
    let tenths = (ms.max(0.0) / 100.0).floor() as u64;
    let minutes = tenths / 600;
    let seconds = (tenths / 10) % 60;
    format!("{}:{:02}.{}", minutes, seconds, tenths % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ms: f64) -> SurvivalEntry {
        SurvivalEntry {
            survival_ms: ms,
            death_number: 1,
            cause: DeathCause::Spike,
            seed: 0,
        }
    }

    #[test]
    fn test_ranks_longest_first() {
        let mut records = SurvivalRecords::new();
        assert_eq!(records.add(entry(1000.0)), Some(1));
        assert_eq!(records.add(entry(3000.0)), Some(1));
        assert_eq!(records.add(entry(2000.0)), Some(2));
        assert_eq!(records.best(), Some(3000.0));
        let times: Vec<f64> = records.entries.iter().map(|e| e.survival_ms).collect();
        assert_eq!(times, vec![3000.0, 2000.0, 1000.0]);
    }

    #[test]
    fn test_full_board_only_takes_better_times() {
        let mut records = SurvivalRecords::new();
        for i in 1..=MAX_RECORDS {
            records.add(entry(i as f64 * 100.0));
        }
        assert!(!records.qualifies(100.0));
        assert!(!records.qualifies(50.0));
        assert_eq!(records.add(entry(150.0)), Some(10));
        assert_eq!(records.entries.len(), MAX_RECORDS);
        assert_eq!(records.entries.last().map(|e| e.survival_ms), Some(150.0));
    }

    #[test]
    fn test_zero_and_nan_never_qualify() {
        let records = SurvivalRecords::new();
        assert!(!records.qualifies(0.0));
        assert!(!records.qualifies(f64::NAN));
    }

    #[test]
    fn test_format_survival() {
        assert_eq!(format_survival(0.0), "0:00.0");
        assert_eq!(format_survival(61_250.0), "1:01.2");
        assert_eq!(format_survival(9_999.0), "0:09.9");
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("spike-gauntlet-records-{}.json", std::process::id()));
        let mut records = SurvivalRecords::new();
        records.add(entry(1234.0));
        records.save(&path).unwrap();
        let loaded = SurvivalRecords::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.entries, records.entries);
    }

    #[test]
    fn test_missing_file_starts_fresh() {
        let records = SurvivalRecords::load_or_default(Path::new("/nope/records.json"));
        assert!(records.is_empty());
    }
}
