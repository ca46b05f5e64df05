//! Level generation: targets and weather
//!
//! Difficulty ramps with the level number. Levels 1-2 are a warm-up (static
//! targets, clear skies); moving targets and weather phase in after that.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Environment, GameEvent, GameState, LevelTransition, Target, TargetMotion, Weather,
};

/// Targets on screen for `level`
pub fn target_count(level: u32) -> usize {
    if level <= 1 {
        2
    } else {
        (2 + level / 3).min(6) as usize
    }
}

/// Chance a target on `level` stays still
pub fn static_chance(level: u32) -> f32 {
    (0.8 - level as f32 * 0.1).max(0.4)
}

/// Oscillation half-width for `level`
pub fn oscillation_range(level: u32) -> f32 {
    (120.0 - level as f32 * 5.0).max(80.0)
}

/// Upper bound of the oscillator speed for `level`
pub fn max_target_speed(level: u32) -> f32 {
    1.0 + (level as f32 * 0.3).min(2.0)
}

/// Chance the weather rolls away from Clear on `level`
pub fn weather_chance(level: u32) -> f32 {
    if level <= 2 {
        0.0
    } else {
        ((level - 2) as f32 * 0.15).min(0.7)
    }
}

/// Largest wind magnitude for `level`
pub fn max_wind(level: u32) -> f32 {
    (level as f32 * 0.5).min(4.0)
}

/// Pick a motion pattern for one target
pub fn roll_motion(level: u32, rng: &mut impl Rng) -> TargetMotion {
    if level <= 2 {
        return TargetMotion::Static;
    }
    if rng.random::<f32>() <= static_chance(level) {
        return TargetMotion::Static;
    }
    if level >= 5 && rng.random_bool(0.5) {
        TargetMotion::Vertical
    } else {
        TargetMotion::Horizontal
    }
}

/// Pick the weather for `level`
pub fn roll_weather(level: u32, rng: &mut impl Rng) -> Environment {
    if level <= 2 || rng.random::<f32>() >= weather_chance(level) {
        return Environment::clear();
    }

    let choices: &[Weather] = if level > 5 {
        &[Weather::Clear, Weather::Rain, Weather::Fog, Weather::Wind]
    } else {
        &[Weather::Clear, Weather::Rain, Weather::Wind]
    };
    let weather = choices[rng.random_range(0..choices.len())];
    let wind = if weather == Weather::Wind {
        rng.random_range(-1.0f32..1.0) * max_wind(level)
    } else {
        0.0
    };
    Environment { weather, wind }
}

/// Uniform sample in [lo, hi), or `lo` when the range is empty
fn span(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Build the target set for the current level
pub fn generate_targets(state: &mut GameState) -> Vec<Target> {
    let level = state.level;
    let vp = state.viewport;
    let count = target_count(level);
    let range = oscillation_range(level);
    let max_speed = max_target_speed(level);

    let mut targets = Vec::with_capacity(count);
    for _ in 0..count {
        let x = span(&mut state.rng, 200.0, vp.width - 200.0);
        let y = span(&mut state.rng, 80.0, vp.height - 220.0);
        let motion = roll_motion(level, &mut state.rng);
        let speed = span(&mut state.rng, 1.0, max_speed).max(0.5);
        let direction = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };

        let id = state.next_entity_id();
        targets.push(Target::new(id, Vec2::new(x, y), motion, speed, range, direction));
    }
    targets
}

/// Reset the playfield and generate targets and weather for `state.level`
pub fn initialize_level(state: &mut GameState) {
    state.projectiles.clear();
    state.particles.clear();
    state.targets = generate_targets(state);
    state.environment = roll_weather(state.level, &mut state.rng);
    state.transition = LevelTransition::Idle;

    log::info!(
        "Level {}: {} targets, weather {} (wind {:.2})",
        state.level,
        state.targets.len(),
        state.environment.weather.as_str(),
        state.environment.wind
    );
    state.push_event(GameEvent::LevelStarted {
        level: state.level,
        weather: state.environment.weather,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_one_layout() {
        let mut state = GameState::new(42, Viewport::default());
        initialize_level(&mut state);
        assert_eq!(state.targets.len(), 2);
        assert_eq!(state.environment.weather, Weather::Clear);
        assert_eq!(state.environment.wind, 0.0);
        assert!(state.targets.iter().all(|t| t.motion == TargetMotion::Static));
        assert!(!state.in_transition());
    }

    #[test]
    fn test_target_counts() {
        assert_eq!(target_count(1), 2);
        assert_eq!(target_count(2), 2);
        assert_eq!(target_count(3), 3);
        assert_eq!(target_count(6), 4);
        assert_eq!(target_count(12), 6);
        assert_eq!(target_count(100), 6);
    }

    #[test]
    fn test_difficulty_curves() {
        assert_eq!(oscillation_range(1), 115.0);
        assert_eq!(oscillation_range(20), 80.0);
        assert!((static_chance(3) - 0.5).abs() < 1e-6);
        assert_eq!(static_chance(10), 0.4);
        assert_eq!(weather_chance(2), 0.0);
        assert!((weather_chance(4) - 0.3).abs() < 1e-6);
        assert_eq!(weather_chance(50), 0.7);
        assert_eq!(max_wind(20), 4.0);
    }

    #[test]
    fn test_tiny_viewport_still_generates() {
        let mut state = GameState::new(3, Viewport::new(100.0, 100.0));
        initialize_level(&mut state);
        assert_eq!(state.targets.len(), 2);
        assert!(state.targets.iter().all(|t| t.pos == Vec2::new(200.0, 80.0)));
    }

    #[test]
    fn test_initialize_clears_leftovers() {
        let mut state = GameState::new(9, Viewport::default());
        state.projectiles.push(crate::sim::Projectile::new(99, Vec2::ZERO, Vec2::ZERO, 0.0));
        initialize_level(&mut state);
        assert!(state.projectiles.is_empty());
        assert!(state.particles.is_empty());
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::LevelStarted { level: 1, .. }]
        ));
    }

    proptest! {
        #[test]
        fn prop_early_levels_are_calm(level in 1u32..=2, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_eq!(roll_weather(level, &mut rng), Environment::clear());
            prop_assert_eq!(roll_motion(level, &mut rng), TargetMotion::Static);
        }

        #[test]
        fn prop_weather_respects_level_gates(level in 3u32..40, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let env = roll_weather(level, &mut rng);
            if level <= 5 {
                prop_assert_ne!(env.weather, Weather::Fog);
            }
            if env.weather == Weather::Wind {
                prop_assert!(env.wind.abs() <= max_wind(level));
            } else {
                prop_assert_eq!(env.wind, 0.0);
            }
        }

        #[test]
        fn prop_vertical_needs_level_five(level in 3u32..5, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert_ne!(roll_motion(level, &mut rng), TargetMotion::Vertical);
        }

        #[test]
        fn prop_targets_within_bounds(level in 1u32..30, seed in any::<u64>()) {
            let mut state = GameState::new(seed, Viewport::new(1024.0, 768.0));
            state.level = level;
            let targets = generate_targets(&mut state);
            prop_assert_eq!(targets.len(), target_count(level));
            for t in &targets {
                prop_assert!(t.speed >= 0.5 && t.speed <= max_target_speed(level));
                prop_assert_eq!(t.range, oscillation_range(level));
                prop_assert!(t.direction == 1.0 || t.direction == -1.0);
                prop_assert!(t.pos.x >= 200.0 && t.pos.x < 824.0);
                prop_assert!(t.pos.y >= 80.0 && t.pos.y < 548.0);
                prop_assert!(!t.is_hit());
            }
        }
    }
}
