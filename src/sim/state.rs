//! Game state and core simulation types
//!
//! Everything a single run owns lives here. A new `GameState` is built for
//! every run and thrown away on restart.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Weather condition for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
    Wind,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Rain => "Rain",
            Weather::Fog => "Fog",
            Weather::Wind => "Wind",
        }
    }
}

/// Environmental conditions, set once per level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Environment {
    pub weather: Weather,
    /// Signed wind strength (positive blows right)
    pub wind: f32,
}

impl Environment {
    pub fn clear() -> Self {
        Self::default()
    }

    /// Wind that actually pushes projectiles mid-flight
    pub fn drift(&self) -> f32 {
        if self.weather == Weather::Wind {
            self.wind
        } else {
            0.0
        }
    }
}

/// Resolution of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    InFlight,
    Hit,
    Missed,
}

/// A cannonball in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    /// Recent positions for rendering (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
    outcome: ShotOutcome,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, gravity: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            gravity,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            outcome: ShotOutcome::InFlight,
        }
    }

    pub fn outcome(&self) -> ShotOutcome {
        self.outcome
    }

    pub fn is_hit(&self) -> bool {
        self.outcome == ShotOutcome::Hit
    }

    pub fn is_missed(&self) -> bool {
        self.outcome == ShotOutcome::Missed
    }

    pub fn in_flight(&self) -> bool {
        self.outcome == ShotOutcome::InFlight
    }

    /// Mark as hit. No-op once resolved.
    pub fn mark_hit(&mut self) {
        if self.in_flight() {
            self.outcome = ShotOutcome::Hit;
        }
    }

    /// Mark as missed. No-op once resolved.
    pub fn mark_missed(&mut self) {
        if self.in_flight() {
            self.outcome = ShotOutcome::Missed;
        }
    }

    /// Record current position to trail, evicting the oldest
    pub fn record_trail(&mut self) {
        if self.trail.len() == TRAIL_LENGTH {
            self.trail.pop_front();
        }
        self.trail.push_back(self.pos);
    }
}

/// Target movement pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetMotion {
    #[default]
    Static,
    Horizontal,
    Vertical,
}

/// A bullseye target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    /// Anchor the oscillation is measured from
    pub origin: Vec2,
    pub motion: TargetMotion,
    pub speed: f32,
    pub range: f32,
    /// +1.0 or -1.0
    pub direction: f32,
    hit: bool,
}

impl Target {
    pub fn new(
        id: u32,
        pos: Vec2,
        motion: TargetMotion,
        speed: f32,
        range: f32,
        direction: f32,
    ) -> Self {
        Self {
            id,
            pos,
            origin: pos,
            motion,
            speed,
            range,
            direction,
            hit: false,
        }
    }

    /// Static target at `pos`
    pub fn fixed(id: u32, pos: Vec2) -> Self {
        Self::new(id, pos, TargetMotion::Static, 0.0, 0.0, 1.0)
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Hits are terminal
    pub fn mark_hit(&mut self) {
        self.hit = true;
    }

    /// Move one tick along the oscillation axis, bouncing at the range edge
    pub fn step(&mut self) {
        let (pos, origin) = match self.motion {
            TargetMotion::Static => return,
            TargetMotion::Horizontal => (&mut self.pos.x, self.origin.x),
            TargetMotion::Vertical => (&mut self.pos.y, self.origin.y),
        };
        *pos += self.speed * self.direction;
        if *pos > origin + self.range || *pos < origin - self.range {
            self.direction = -self.direction;
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Fade alpha in 0-1
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Pending level change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelTransition {
    /// Level is live
    Idle,
    /// Level cleared, showing the banner before advancing
    Celebrating { ticks: u32 },
    /// Waiting to generate targets for the current level
    Regenerating { ticks: u32 },
}

/// Notable things that happened during a tick (drained by the session)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Fired { pos: Vec2, vel: Vec2 },
    TargetHit { target_id: u32, points: u64 },
    ProjectileMissed { lives_left: u32 },
    LevelCleared { level: u32, bonus: u64 },
    LevelAdvanced { level: u32 },
    LifeRestored { lives: u32 },
    LevelStarted { level: u32, weather: Weather },
    RunOver { score: u64, accuracy: u32 },
}

/// Canvas size the run is played on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Where projectiles are launched from
    pub fn cannon(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - CANNON_OFFSET_Y)
    }

    /// True once a point is beyond the viewport plus margin
    pub fn is_outside(&self, pos: Vec2) -> bool {
        pos.x < -OFFSCREEN_MARGIN
            || pos.x > self.width + OFFSCREEN_MARGIN
            || pos.y < -OFFSCREEN_MARGIN
            || pos.y > self.height + OFFSCREEN_MARGIN
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub viewport: Viewport,
    /// Current level (1-based)
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    pub shots_fired: u32,
    pub targets_hit: u32,
    pub environment: Environment,
    pub transition: LevelTransition,
    /// Simulation suspended (rendering continues)
    pub paused: bool,
    /// Lives ran out
    pub run_over: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Last pointer position
    pub aim: Vec2,
    pub muzzle_flash: u32,
    /// Active projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Targets of the current level (scan order is hit priority)
    pub targets: Vec<Target>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Start a fresh run. Level 1 is generated after the start delay.
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            shots_fired: 0,
            targets_hit: 0,
            environment: Environment::clear(),
            transition: LevelTransition::Regenerating {
                ticks: RUN_START_DELAY_TICKS,
            },
            paused: false,
            run_over: false,
            time_ticks: 0,
            aim: viewport.cannon() - Vec2::new(0.0, 200.0),
            muzzle_flash: 0,
            projectiles: Vec::new(),
            targets: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Hit percentage, rounded; 0 before the first shot
    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.targets_hit, self.shots_fired)
    }

    /// A level change is pending (firing is locked out)
    pub fn in_transition(&self) -> bool {
        self.transition != LevelTransition::Idle
    }

    /// Angle from the cannon to the aim point
    pub fn cannon_angle(&self) -> f32 {
        let d = self.aim - self.viewport.cannon();
        d.y.atan2(d.x)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// round(hits / shots * 100), 0 when nothing has been fired
pub fn accuracy_percent(hits: u32, shots: u32) -> u32 {
    if shots == 0 {
        return 0;
    }
    (hits as f64 / shots as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_trail_keeps_last_twelve() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::X, 0.0);
        for i in 0..20 {
            p.pos = Vec2::new(i as f32, 0.0);
            p.record_trail();
        }
        assert_eq!(p.trail.len(), TRAIL_LENGTH);
        assert_eq!(p.trail.front().map(|v| v.x), Some(8.0));
        assert_eq!(p.trail.back().map(|v| v.x), Some(19.0));
    }

    #[test]
    fn test_projectile_resolution_is_final() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, 0.0);
        assert!(p.in_flight());
        p.mark_hit();
        p.mark_missed();
        assert!(p.is_hit());
        assert!(!p.is_missed());

        let mut q = Projectile::new(2, Vec2::ZERO, Vec2::ZERO, 0.0);
        q.mark_missed();
        q.mark_hit();
        assert_eq!(q.outcome(), ShotOutcome::Missed);
    }

    #[test]
    fn test_horizontal_target_bounces() {
        let mut t = Target::new(
            1,
            Vec2::new(100.0, 50.0),
            TargetMotion::Horizontal,
            2.0,
            10.0,
            1.0,
        );
        for _ in 0..200 {
            t.step();
            // One step of overshoot at most
            assert!((t.pos.x - t.origin.x).abs() <= t.range + t.speed);
            assert_eq!(t.pos.y, 50.0);
        }
    }

    #[test]
    fn test_vertical_target_moves_on_y_only() {
        let mut t = Target::new(1, Vec2::new(100.0, 50.0), TargetMotion::Vertical, 1.0, 80.0, -1.0);
        t.step();
        assert_eq!(t.pos, Vec2::new(100.0, 49.0));
    }

    #[test]
    fn test_static_target_stays_put() {
        let mut t = Target::fixed(1, Vec2::new(3.0, 4.0));
        t.step();
        assert_eq!(t.pos, t.origin);
    }

    #[test]
    fn test_accuracy_without_shots_is_zero() {
        let state = GameState::new(1, Viewport::default());
        assert_eq!(state.shots_fired, 0);
        assert_eq!(state.accuracy(), 0);
    }

    #[test]
    fn test_new_run_waits_before_level_one() {
        let state = GameState::new(1, Viewport::default());
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.targets.is_empty());
        assert!(state.in_transition());
    }

    #[test]
    fn test_viewport_bounds_use_margin() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!vp.is_outside(Vec2::new(-49.0, 300.0)));
        assert!(vp.is_outside(Vec2::new(-51.0, 300.0)));
        assert!(vp.is_outside(Vec2::new(400.0, 651.0)));
        assert_eq!(vp.cannon(), Vec2::new(400.0, 500.0));
    }

    proptest! {
        #[test]
        fn prop_accuracy_matches_ratio(shots in 1u32..10_000, hits_frac in 0.0f64..=1.0) {
            let hits = (shots as f64 * hits_frac) as u32;
            let expected = ((hits as f64 / shots as f64) * 100.0).round() as u32;
            prop_assert_eq!(accuracy_percent(hits, shots), expected);
            prop_assert!(accuracy_percent(hits, shots) <= 100);
        }
    }
}
