//! Leaderboard system
//!
//! The remote leaderboard is authoritative when reachable. A local copy in
//! storage (top 50, one entry per player name) backs it up and is shown when
//! the remote fetch comes back empty or fails.

pub mod auth;
pub mod client;
pub mod sync;
pub mod transport;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{KeyValueStore, load_or_default, write_json};

pub use auth::AnonymousAuth;
pub use client::{ConfiguredLeaderboard, GraphqlLeaderboard, LeaderboardClient, OfflineLeaderboard};
pub use sync::{load_leaderboard, submit_score};
pub use transport::Transport;

/// Maximum number of entries kept locally
pub const MAX_LOCAL_ENTRIES: usize = 50;

/// Entries shown on the leaderboard screen
pub const DISPLAYED_ENTRIES: usize = 10;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub score: u64,
    pub max_level: u32,
    pub accuracy: u32,
    /// ISO-8601 date the score was set
    #[serde(default)]
    pub date: String,
}

/// Final numbers of a run, ready to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
    pub max_level: u32,
    pub accuracy: u32,
}

impl ScoreSubmission {
    /// Stamp with a fresh id and the given date
    pub fn into_entry(self, date: String) -> LeaderboardEntry {
        LeaderboardEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: self.name,
            score: self.score,
            max_level: self.max_level,
            accuracy: self.accuracy,
            date,
        }
    }
}

/// Locally cached leaderboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    /// Storage key for the cached list
    pub const STORAGE_KEY: &'static str = "target_master_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `entry`, replacing any earlier entry with the same name
    ///
    /// Returns the rank achieved (1-indexed), or None if it fell off the end.
    pub fn upsert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.entries.retain(|e| e.name != entry.name);
        let id = entry.id.clone();
        let name = entry.name.clone();
        self.entries.push(entry);

        // Stable sort keeps earlier entries ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_LOCAL_ENTRIES);

        self.entries
            .iter()
            .position(|e| e.name == name && e.id == id)
            .map(|i| i + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from storage; missing or malformed data reads as empty
    pub fn load(store: &impl KeyValueStore) -> Self {
        let board: Self = load_or_default(store, Self::STORAGE_KEY);
        log::info!("Loaded {} local leaderboard entries", board.entries.len());
        board
    }

    /// Persist to storage
    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        write_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Local leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}
