//! Per-run simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - One tick per call, positions in canvas pixels per tick
//! - Seeded RNG only (owned by `GameState`)
//! - Stable iteration order (targets are scanned in generation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod generate;
pub mod kinematics;
pub mod progression;
pub mod state;
pub mod tick;

pub use collision::{find_hit, hit_points};
pub use generate::{initialize_level, target_count};
pub use kinematics::{advance, launch_velocity};
pub use state::{
    Environment, GameEvent, GameState, LevelTransition, Particle, Projectile, ShotOutcome, Target,
    TargetMotion, Viewport, Weather, accuracy_percent,
};
pub use tick::{TickInput, fire, tick};
