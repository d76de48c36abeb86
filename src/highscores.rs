//! High score board
//!
//! Best score per profile for the lifetime of the page. Nothing is written
//! to storage.

use serde::{Deserialize, Serialize};

/// Best result for one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Profile name
    pub profile: String,
    /// Best score achieved
    pub score: u64,
    /// Runs finished on this profile
    pub runs: u32,
}

/// Per-profile high scores, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty board
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a finished run. Returns true if it set a new best for the
    /// profile.
    pub fn record(&mut self, profile: &str, score: u64) -> bool {
        let improved = match self.entries.iter_mut().find(|e| e.profile == profile) {
            Some(entry) => {
                entry.runs += 1;
                if score > entry.score {
                    entry.score = score;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.push(HighScoreEntry {
                    profile: profile.to_string(),
                    score,
                    runs: 1,
                });
                score > 0
            }
        };

        // Stable sort keeps first-recorded order among ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));

        if improved {
            log::info!("New {} high score: {}", profile, score);
        }
        improved
    }

    /// Best score for a profile (if it has been played)
    pub fn best(&self, profile: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.profile == profile)
            .map(|e| e.score)
    }

    /// Check if the board is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score across all profiles (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_best_per_profile() {
        let mut scores = HighScores::new();
        assert!(scores.is_empty());

        assert!(scores.record("Easy", 10));
        assert!(!scores.record("Easy", 4));
        assert!(scores.record("Easy", 25));
        assert_eq!(scores.best("Easy"), Some(25));
        assert_eq!(scores.entries[0].runs, 3);
        assert_eq!(scores.best("Medium"), None);
    }

    #[test]
    fn test_sorted_by_score() {
        let mut scores = HighScores::new();
        scores.record("Easy", 10);
        scores.record("Extreme", 40);
        scores.record("Medium", 20);
        let order: Vec<_> = scores.entries.iter().map(|e| e.profile.as_str()).collect();
        assert_eq!(order, ["Extreme", "Medium", "Easy"]);
        assert_eq!(scores.top_score(), Some(40));
    }

    #[test]
    fn test_zero_first_run_is_not_a_record() {
        let mut scores = HighScores::new();
        assert!(!scores.record("Easy", 0));
        assert_eq!(scores.best("Easy"), Some(0));
    }
}
