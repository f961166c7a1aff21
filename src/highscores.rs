//! Run leaderboard
//!
//! Top 10 runs by distance, persisted through the progression store.

use serde::{Deserialize, Serialize};

use crate::persistence::{ProgressionStore, keys, load_json, save_json};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Meters run
    pub distance: u64,
    /// Gold earned during the run
    pub gold: u64,
    /// Unix timestamp (s) when achieved
    pub timestamp: u64,
}

/// Run leaderboard, sorted by distance (best first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run distance qualifies for the leaderboard
    pub fn qualifies(&self, distance: u64) -> bool {
        if distance == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| distance > e.distance)
    }

    /// Rank a distance would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, distance: u64) -> Option<usize> {
        if !self.qualifies(distance) {
            return None;
        }
        let rank = self.entries.iter().position(|e| distance > e.distance);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a run. Returns the rank achieved (1-indexed) if it qualified.
    pub fn add_run(&mut self, distance: u64, gold: u64, timestamp: u64) -> Option<usize> {
        let rank = self.potential_rank(distance)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                distance,
                gold,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best distance on the board (if any)
    pub fn best_distance(&self) -> Option<u64> {
        self.entries.first().map(|e| e.distance)
    }

    pub fn load(store: &dyn ProgressionStore) -> Self {
        let mut scores: HighScores = load_json(store, keys::LEADERBOARD);
        // Hand-edited saves may be unsorted or oversized
        scores.entries.sort_by(|a, b| b.distance.cmp(&a.distance));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::debug!("Loaded {} leaderboard entries", scores.entries.len());
        scores
    }

    pub fn save(&self, store: &mut dyn ProgressionStore) {
        save_json(store, keys::LEADERBOARD, self);
    }
}
