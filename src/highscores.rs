//! High score leaderboard system
//!
//! Top 10 runs with three-character initials, plus the all-time best score.
//! Both are persisted through a [`Storage`] backend.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::persistence::{self, Storage};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Characters a name-entry slot cycles through
pub const INITIALS_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Storage key for the leaderboard list
pub const LEADERBOARD_KEY: &str = "leaderboard";
/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "bestScore";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Exactly three characters from `INITIALS_CHARSET`
    pub initials: String,
    pub score: u64,
}

/// Map arbitrary text onto three valid initials, padding with 'A'
pub fn normalize_initials(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii() && INITIALS_CHARSET.contains(&(*c as u8)))
        .take(3)
        .collect();
    while out.len() < 3 {
        out.push('A');
    }
    out
}

/// High score leaderboard, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table
    ///
    /// Any score qualifies while the table has free slots, zero included.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score. Returns the 0-based rank, or None if it didn't qualify.
    ///
    /// Ties rank below existing entries with the same score.
    pub fn add(&mut self, initials: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            initials: normalize_initials(initials),
            score,
        };
        let rank = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and limits on data that came from outside
    fn sanitize(&mut self) {
        for entry in &mut self.entries {
            entry.initials = normalize_initials(&entry.initials);
        }
        // Stable, so equal scores keep their stored order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load the leaderboard, falling back to an empty one
    pub fn load(storage: &dyn Storage) -> Self {
        let mut scores: HighScores = persistence::load_or_default(storage, LEADERBOARD_KEY);
        scores.sanitize();
        if scores.is_empty() {
            log::info!("No high scores found, starting fresh");
        } else {
            log::info!("Loaded {} high scores", scores.len());
        }
        scores
    }

    /// Save the leaderboard
    pub fn save(&self, storage: &mut dyn Storage) -> Result<()> {
        persistence::save_json(storage, LEADERBOARD_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Load the all-time best score (0 if absent)
pub fn load_best_score(storage: &dyn Storage) -> u64 {
    persistence::load_or_default(storage, BEST_SCORE_KEY)
}

pub fn save_best_score(storage: &mut dyn Storage, score: u64) -> Result<()> {
    persistence::save_json(storage, BEST_SCORE_KEY, &score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn full_board() -> HighScores {
        let mut scores = HighScores::new();
        for score in (1..=10).map(|i| i * 10) {
            scores.add("AAA", score);
        }
        scores
    }

    #[test]
    fn test_zero_qualifies_on_short_board() {
        let scores = HighScores::new();
        assert!(scores.qualifies(0));
        assert!(!full_board().qualifies(0));
    }

    #[test]
    fn test_must_beat_last_entry_when_full() {
        let scores = full_board();
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert!(!scores.qualifies(10));
        assert!(scores.qualifies(11));
    }

    #[test]
    fn test_add_keeps_descending_order() {
        let mut scores = full_board();
        assert_eq!(scores.add("ZED", 55), Some(5));
        assert_eq!(scores.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[5].initials, "ZED");
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut scores = HighScores::new();
        scores.add("AAA", 5);
        assert_eq!(scores.add("BBB", 5), Some(1));
    }

    #[test]
    fn test_normalize_initials() {
        assert_eq!(normalize_initials("ab"), "ABA");
        assert_eq!(normalize_initials("x-9yz"), "X9Y");
        assert_eq!(normalize_initials(""), "AAA");
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut scores = HighScores::new();
        scores.add("BOB", 12);
        scores.add("AMY", 30);
        scores.save(&mut storage).unwrap();

        let loaded = HighScores::load(&storage);
        assert_eq!(loaded, scores);
        assert_eq!(loaded.top_score(), Some(30));
    }

    #[test]
    fn test_load_repairs_stored_list() {
        let mut storage = MemoryStorage::new();
        let raw = r#"[{"initials":"lo","score":3},{"initials":"HI","score":9}]"#;
        storage.set(LEADERBOARD_KEY, raw).unwrap();

        let loaded = HighScores::load(&storage);
        assert_eq!(loaded.entries[0].score, 9);
        assert_eq!(loaded.entries[0].initials, "HIA");
        assert_eq!(loaded.entries[1].initials, "LOA");
    }

    #[test]
    fn test_best_score_persistence() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_best_score(&storage), 0);
        save_best_score(&mut storage, 99).unwrap();
        assert_eq!(load_best_score(&storage), 99);
    }
}
