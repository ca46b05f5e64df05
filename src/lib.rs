//! Target Master - A cannon-and-targets arcade shooter
//!
//! Core modules:
//! - `sim`: Per-run simulation (kinematics, collisions, level progression)
//! - `session`: Menu/game flow state machine that gates the simulation
//! - `leaderboard`: Local cache plus remote leaderboard with anonymous auth
//! - `persistence`: Key-value storage abstraction (LocalStorage on web)
//! - `platform`: Browser/native adapters (storage, time, HTTP)
//! - `renderer`: Themes and Canvas 2D drawing

pub mod error;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use error::{RemoteError, StorageError};
pub use leaderboard::{LeaderboardEntry, LocalLeaderboard};
pub use session::{Effect, Screen, Session};
pub use settings::Settings;

/// Game configuration constants
///
/// All distances are in canvas pixels and all rates are per simulation tick.
pub mod consts {
    /// Fixed simulation timestep (one display frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Cannon sits this far above the bottom edge, horizontally centered
    pub const CANNON_OFFSET_Y: f32 = 100.0;
    /// Muzzle flash duration after a shot
    pub const MUZZLE_FLASH_TICKS: u32 = 15;

    /// Projectile launch speed
    pub const PROJECTILE_SPEED: f32 = 12.0;
    /// Downward acceleration applied each tick
    pub const GRAVITY: f32 = 0.08;
    /// Positions kept for the projectile trail
    pub const TRAIL_LENGTH: usize = 12;
    /// Projectiles further than this outside the viewport count as gone
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Launch-time wind compensation factor
    pub const WIND_LAUNCH_FACTOR: f32 = 0.1;
    /// Per-tick wind drift factor under Wind weather
    pub const WIND_DRIFT_FACTOR: f32 = 0.01;
    /// Half-width of the horizontal launch jitter under Rain
    pub const RAIN_JITTER: f32 = 0.05;

    /// Hit radius around a target center
    pub const HIT_RADIUS: f32 = 45.0;
    /// Points for any hit
    pub const BASE_HIT_SCORE: u64 = 100;
    /// Maximum proximity bonus (dead center)
    pub const MAX_ACCURACY_BONUS: f32 = 100.0;
    /// Bonus per level number on level clear
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 50;

    /// Particles spawned per target hit
    pub const PARTICLE_BURST: usize = 15;
    /// Particle lifetime
    pub const PARTICLE_LIFE: u32 = 40;
    /// Max absolute particle velocity component
    pub const PARTICLE_SPEED: f32 = 3.0;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u32 = 10;
    /// Lives cap after bonus restoration
    pub const MAX_LIVES: u32 = 15;
    /// A life is restored on every level divisible by this
    pub const LIFE_BONUS_EVERY: u32 = 3;

    /// Delay between clearing a level and advancing (~800 ms)
    pub const LEVEL_ADVANCE_DELAY_TICKS: u32 = 48;
    /// Delay between advancing and generating the new level (~200 ms)
    pub const LEVEL_REGEN_DELAY_TICKS: u32 = 12;
    /// Delay between starting a run and generating level 1 (~100 ms)
    pub const RUN_START_DELAY_TICKS: u32 = 6;

    /// Longest accepted player name, in characters
    pub const MAX_NAME_LEN: usize = 20;
}
