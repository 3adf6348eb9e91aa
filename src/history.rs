//! Generation leaderboard
//!
//! Keeps the best generations of a run, ranked by best fitness, and persists
//! them as JSON between runs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::episode::EpisodeReport;

/// Maximum number of generations to keep
pub const MAX_RECORDS: usize = 10;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("history JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of one finished generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: u32,
    pub score: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub ticks: u64,
}

impl GenerationRecord {
    pub fn from_report(report: &EpisodeReport) -> Self {
        Self {
            generation: report.generation,
            score: report.score,
            best_fitness: report.best_fitness().unwrap_or(0.0),
            mean_fitness: report.mean_fitness(),
            ticks: report.ticks,
        }
    }
}

/// Top generations, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationHistory {
    pub records: Vec<GenerationRecord>,
}

impl GenerationHistory {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Check if a fitness would make the board
    pub fn qualifies(&self, best_fitness: f64) -> bool {
        if self.records.len() < MAX_RECORDS {
            return true;
        }
        self.records
            .last()
            .map(|r| best_fitness > r.best_fitness)
            .unwrap_or(true)
    }

    /// Rank a fitness would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, best_fitness: f64) -> Option<usize> {
        if !self.qualifies(best_fitness) {
            return None;
        }
        let rank = self.records.iter().position(|r| best_fitness > r.best_fitness);
        Some(rank.unwrap_or(self.records.len()) + 1)
    }

    /// Insert a record if it qualifies; returns the rank achieved
    pub fn add_record(&mut self, record: GenerationRecord) -> Option<usize> {
        let rank = self.potential_rank(record.best_fitness)?;
        self.records.insert(rank - 1, record);
        self.records.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn best(&self) -> Option<&GenerationRecord> {
        self.records.first()
    }

    /// Load from a JSON file; a missing file is an empty history
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No history at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let history: Self = serde_json::from_str(&json)?;
        log::info!("Loaded {} generation records", history.records.len());
        Ok(history)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("History saved ({} records)", self.records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(generation: u32, best_fitness: f64) -> GenerationRecord {
        GenerationRecord {
            generation,
            score: 0,
            best_fitness,
            mean_fitness: best_fitness / 2.0,
            ticks: 100,
        }
    }

    #[test]
    fn test_records_sorted_best_first() {
        let mut history = GenerationHistory::new();
        assert_eq!(history.add_record(record(1, 5.0)), Some(1));
        assert_eq!(history.add_record(record(2, 9.0)), Some(1));
        assert_eq!(history.add_record(record(3, 7.0)), Some(2));
        let order: Vec<u32> = history.records.iter().map(|r| r.generation).collect();
        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(history.best().map(|r| r.generation), Some(2));
    }

    #[test]
    fn test_full_board_rejects_worse() {
        let mut history = GenerationHistory::new();
        for g in 0..MAX_RECORDS as u32 {
            history.add_record(record(g, 10.0 + g as f64));
        }
        assert!(!history.qualifies(5.0));
        assert_eq!(history.add_record(record(99, 5.0)), None);
        assert_eq!(history.potential_rank(100.0), Some(1));
        assert_eq!(history.add_record(record(100, 100.0)), Some(1));
        assert_eq!(history.records.len(), MAX_RECORDS);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("flappy_evo_history_{}.json", std::process::id()));
        let mut history = GenerationHistory::new();
        history.add_record(record(4, 12.5));
        history.save(&path).unwrap();
        let loaded = GenerationHistory::load(&path).unwrap();
        assert_eq!(loaded.records, history.records);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("flappy_evo_history_does_not_exist.json");
        let loaded = GenerationHistory::load(&path).unwrap();
        assert!(loaded.is_empty());
    }
}
