//! The score persistence contract, plus an in-memory implementation for
//! offline play and tests. Wire field names match the leaderboard backend.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::score::layout::LetterPlacement;
use crate::Result;

/// A score as the caller submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub score: f32,
    pub letters: Vec<LetterPlacement>,
}

/// A score as the store returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub score: f32,
    pub letters: Vec<LetterPlacement>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Where scores go. The shipped backend is an HTTP service; this trait is
/// the stable seam, implemented in memory here and remotely elsewhere.
pub trait ScoreStore {
    fn submit(&mut self, submission: ScoreSubmission) -> Result<ScoreRecord>;

    /// The top `n` scores, best first.
    fn top(&self, n: usize) -> Result<Vec<ScoreRecord>>;
}

/// In-memory store, ordered by score descending with ties kept in
/// submission order.
#[derive(Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
    next_id: u64,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn now_millis() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl ScoreStore for MemoryScoreStore {
    fn submit(&mut self, submission: ScoreSubmission) -> Result<ScoreRecord> {
        let record = ScoreRecord {
            id: format!("local-{}", self.next_id),
            player_name: submission.player_name,
            score: submission.score,
            letters: submission.letters,
            timestamp: Self::now_millis(),
        };
        self.next_id += 1;
        log::info!(
            "score stored: {} by {} ({} letters)",
            record.score,
            record.player_name,
            record.letters.len()
        );
        self.records.push(record.clone());
        Ok(record)
    }

    fn top(&self, n: usize) -> Result<Vec<ScoreRecord>> {
        let mut sorted: Vec<ScoreRecord> = self.records.clone();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        sorted.truncate(n);
        Ok(sorted)
    }
}
