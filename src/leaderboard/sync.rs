//! Remote-first submission and loading with a local fallback

use super::client::LeaderboardClient;
use super::{LeaderboardEntry, LocalLeaderboard, ScoreSubmission};
use crate::persistence::KeyValueStore;

/// Record a finished run remotely and in the local cache
///
/// The local write happens whether or not the remote call succeeds. Returns
/// the updated local board.
pub async fn submit_score(
    client: &impl LeaderboardClient,
    store: &impl KeyValueStore,
    submission: ScoreSubmission,
    date: String,
) -> LocalLeaderboard {
    let entry = submission.into_entry(date);
    if !client.submit(&entry).await {
        log::warn!("Remote submit failed, keeping score for '{}' locally", entry.name);
    }

    let mut board = LocalLeaderboard::load(store);
    match board.upsert(entry) {
        Some(rank) => log::info!("Local leaderboard rank {}", rank),
        None => log::info!("Score did not place on the local leaderboard"),
    }
    if let Err(e) = board.save(store) {
        log::error!("Failed to save local leaderboard: {}", e);
    }
    board
}

/// Top entries, remote first, falling back to the local cache
pub async fn load_leaderboard(
    client: &impl LeaderboardClient,
    store: &impl KeyValueStore,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let remote = client.fetch_top(limit).await;
    if !remote.is_empty() {
        return remote;
    }
    log::info!("Global leaderboard unavailable, showing local scores");
    let mut local = LocalLeaderboard::load(store).entries;
    local.truncate(limit);
    local
}
