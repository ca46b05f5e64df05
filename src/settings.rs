//! Game settings and preferences
//!
//! Persisted separately from the leaderboard under its own storage key.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{KeyValueStore, load_or_default, write_json};

/// Volume change per +/- key press
pub const VOLUME_STEP: f32 = 0.1;

/// Remote leaderboard endpoints and credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// GraphQL endpoint; empty means play offline
    pub graphql_endpoint: String,
    /// User-pool auth endpoint used for anonymous sign-up/sign-in
    pub auth_endpoint: String,
    /// User-pool app client id
    pub client_id: String,
    /// Mixed into generated guest passwords
    pub guest_password_salt: String,
    /// Entries requested from the remote leaderboard
    pub fetch_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            graphql_endpoint: String::new(),
            auth_endpoint: String::new(),
            client_id: String::new(),
            guest_password_salt: "target-master".to_string(),
            fetch_limit: crate::leaderboard::MAX_LOCAL_ENTRIES,
        }
    }
}

impl LeaderboardConfig {
    /// True when there is somewhere to send scores
    pub fn is_configured(&self) -> bool {
        !self.graphql_endpoint.is_empty()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Gunshot volume (0.0 - 1.0)
    pub volume: f32,
    /// Mute all sound
    pub muted: bool,

    // === Visual Effects ===
    /// Hit particle bursts
    pub particles: bool,
    /// Rain streaks, fog wash and wind lines
    pub weather_effects: bool,
    /// Crosshair wobble (grows with wind)
    pub crosshair_sway: bool,

    // === Online ===
    pub leaderboard: LeaderboardConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            muted: false,

            particles: true,
            weather_effects: true,
            crosshair_sway: true,

            leaderboard: LeaderboardConfig::default(),
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "target_master_settings";

    /// Step volume up or down, clamped to 0-1
    pub fn adjust_volume(&mut self, steps: i32) {
        let volume = self.volume + steps as f32 * VOLUME_STEP;
        // Snap to tenths so repeated steps don't drift
        self.volume = ((volume * 10.0).round() / 10.0).clamp(0.0, 1.0);
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Volume actually applied to sounds
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Load settings from storage, defaulting on missing or malformed data
    pub fn load(store: &impl KeyValueStore) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    /// Save settings to storage
    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        write_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_volume_steps_clamp() {
        let mut s = Settings::default();
        for _ in 0..8 {
            s.adjust_volume(1);
        }
        assert_eq!(s.volume, 1.0);
        for _ in 0..15 {
            s.adjust_volume(-1);
        }
        assert_eq!(s.volume, 0.0);
        s.adjust_volume(1);
        assert!((s.volume - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_mute_zeroes_volume() {
        let mut s = Settings::default();
        assert_eq!(s.effective_volume(), 0.5);
        s.toggle_mute();
        assert_eq!(s.effective_volume(), 0.0);
        assert_eq!(s.volume, 0.5);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"volume":0.3,"leaderboard":{"client_id":"abc"}}"#)
            .unwrap();
        let s = Settings::load(&store);
        assert_eq!(s.volume, 0.3);
        assert!(!s.muted);
        assert_eq!(s.leaderboard.client_id, "abc");
        assert_eq!(s.leaderboard.fetch_limit, 50);
        assert!(!s.leaderboard.is_configured());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut s = Settings::default();
        s.muted = true;
        s.save(&store).unwrap();
        assert_eq!(Settings::load(&store), s);
    }
}
