//! Fixed timestep simulation tick
//!
//! Core game loop that advances one run by a single frame.

use glam::Vec2;

use super::collision::{update_particles, update_projectiles};
use super::kinematics::{launch_velocity, precipitation_jitter};
use super::progression;
use super::state::{GameEvent, GameState, Projectile};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position
    pub aim: Option<Vec2>,
    /// Fire toward this point (click)
    pub fire: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Launch a projectile from the cannon toward `point`
///
/// Returns false when firing is locked out (paused, between levels, or the
/// run is over).
pub fn fire(state: &mut GameState, point: Vec2) -> bool {
    if state.paused || state.run_over || state.in_transition() {
        return false;
    }

    let origin = state.viewport.cannon();
    let jitter = precipitation_jitter(state.environment.weather, &mut state.rng);
    let vel = launch_velocity(
        origin,
        point,
        PROJECTILE_SPEED,
        GRAVITY,
        state.environment.wind,
        jitter,
    );

    let id = state.next_entity_id();
    state.projectiles.push(Projectile::new(id, origin, vel, GRAVITY));
    state.shots_fired += 1;
    state.muzzle_flash = MUZZLE_FLASH_TICKS;
    log::debug!("Shot {} fired toward ({:.0}, {:.0})", id, point.x, point.y);
    state.push_event(GameEvent::Fired { pos: origin, vel });
    true
}

/// Advance the run by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if let Some(aim) = input.aim {
        state.aim = aim;
    }

    if state.paused || state.run_over {
        return;
    }

    state.time_ticks += 1;

    if let Some(point) = input.fire {
        fire(state, point);
    }

    for target in state.targets.iter_mut() {
        target.step();
    }
    update_projectiles(state);
    update_particles(&mut state.particles);
    if state.run_over {
        return;
    }
    progression::update(state);

    state.muzzle_flash = state.muzzle_flash.saturating_sub(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{LevelTransition, Target, Viewport};

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Viewport::new(800.0, 600.0));
        for _ in 0..RUN_START_DELAY_TICKS {
            tick(&mut state, &TickInput::default());
        }
        state
    }

    #[test]
    fn test_level_one_appears_after_start_delay() {
        let mut state = GameState::new(12345, Viewport::new(800.0, 600.0));
        for _ in 0..RUN_START_DELAY_TICKS - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.targets.is_empty());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.targets.len(), 2);
        assert_eq!(state.transition, LevelTransition::Idle);
    }

    #[test]
    fn test_fire_locked_during_transition() {
        let mut state = GameState::new(1, Viewport::default());
        assert!(!fire(&mut state, Vec2::new(100.0, 100.0)));
        assert_eq!(state.shots_fired, 0);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = started(12345);
        let ticks = state.time_ticks;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert!(state.paused);
        assert_eq!(state.time_ticks, ticks);

        // Clicks while paused are ignored
        let click = TickInput {
            fire: Some(Vec2::new(400.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &click);
        assert_eq!(state.shots_fired, 0);

        tick(&mut state, &pause);
        assert!(!state.paused);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_aimed_shot_hits_static_target() {
        let mut state = started(7);
        state.targets = vec![Target::fixed(100, Vec2::new(400.0, 250.0))];

        let click = TickInput {
            fire: Some(Vec2::new(400.0, 250.0)),
            ..Default::default()
        };
        tick(&mut state, &click);
        assert_eq!(state.shots_fired, 1);
        assert_eq!(state.muzzle_flash, MUZZLE_FLASH_TICKS - 1);

        for _ in 0..60 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.targets_hit, 1);
        assert!(state.score >= 100);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.accuracy(), 100);
    }

    #[test]
    fn test_run_ends_on_last_miss() {
        let mut state = started(3);
        state.lives = 1;
        // Straight down, away from every target
        let click = TickInput {
            fire: Some(Vec2::new(400.0, 590.0)),
            ..Default::default()
        };
        tick(&mut state, &click);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.run_over);
        assert_eq!(state.lives, 0);
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_accuracy_invariant_every_tick() {
        let mut state = started(2024);
        for i in 0..600u32 {
            let mut input = TickInput::default();
            if i % 20 == 0 {
                input.fire = state.targets.iter().find(|t| !t.is_hit()).map(|t| t.pos);
            }
            tick(&mut state, &input);
            let expected = if state.shots_fired == 0 {
                0
            } else {
                (state.targets_hit as f64 / state.shots_fired as f64 * 100.0).round() as u32
            };
            assert_eq!(state.accuracy(), expected);
            for p in &state.projectiles {
                assert!(!(p.is_hit() && p.is_missed()));
            }
            assert!(state.lives <= MAX_LIVES);
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = started(99999);
        let mut state2 = started(99999);

        let inputs = [
            TickInput {
                aim: Some(Vec2::new(300.0, 200.0)),
                ..Default::default()
            },
            TickInput {
                fire: Some(Vec2::new(300.0, 200.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for input in inputs.iter().cycle().take(90) {
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.projectiles.len(), state2.projectiles.len());
        assert_eq!(
            state1.targets.iter().map(|t| t.pos).collect::<Vec<_>>(),
            state2.targets.iter().map(|t| t.pos).collect::<Vec<_>>()
        );
    }
}
