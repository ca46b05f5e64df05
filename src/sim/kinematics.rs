//! Projectile kinematics
//!
//! Launch velocities are a closed-form aim assist, not a ballistic solver:
//! the shot is given enough extra lift to cancel the gravity drop over the
//! straight-line flight time, so a calm-weather shot lands close to the aim
//! point without being exact.

use glam::Vec2;
use rand::Rng;

use super::state::{Environment, Projectile, Weather};
use crate::consts::*;

/// Initial velocity for a shot from `origin` toward `target`
///
/// `wind` shifts the horizontal velocity by `wind * WIND_LAUNCH_FACTOR` and
/// `jitter` is added on top of that (see [`precipitation_jitter`]).
pub fn launch_velocity(
    origin: Vec2,
    target: Vec2,
    speed: f32,
    gravity: f32,
    wind: f32,
    jitter: f32,
) -> Vec2 {
    let delta = target - origin;
    // Floor at one tick so a point-blank shot stays finite
    let time = (delta.length() / speed).max(1.0);

    let vx = delta.x / time + wind * WIND_LAUNCH_FACTOR + jitter;
    let vy = delta.y / time - 0.5 * gravity * time;
    Vec2::new(vx, vy)
}

/// Random horizontal nudge while it rains, zero otherwise
pub fn precipitation_jitter(weather: Weather, rng: &mut impl Rng) -> f32 {
    if weather == Weather::Rain {
        rng.random_range(-RAIN_JITTER..RAIN_JITTER)
    } else {
        0.0
    }
}

/// Advance a projectile by one tick
pub fn advance(projectile: &mut Projectile, environment: &Environment) {
    projectile.vel.x += environment.drift() * WIND_DRIFT_FACTOR;
    projectile.pos += projectile.vel;
    projectile.vel.y += projectile.gravity;
    projectile.record_trail();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_straight_up_shot() {
        let origin = Vec2::new(400.0, 500.0);
        let target = Vec2::new(400.0, 300.0);
        let vel = launch_velocity(origin, target, 12.0, 0.08, 0.0, 0.0);

        assert!(vel.y < 0.0, "shot should go up, got {}", vel.y);
        assert!(vel.x.abs() < 1e-6);

        // Flight time is distance / speed
        let flight_time: f32 = 200.0 / 12.0;
        let mut p = Projectile::new(1, origin, vel, 0.08);
        let env = Environment::clear();
        let mut ticks = 0u32;
        while p.pos.y > 300.0 && ticks < 100 {
            advance(&mut p, &env);
            ticks += 1;
        }
        let ticks = ticks as f32;
        assert!(
            ticks >= flight_time.floor() - 1.0 && ticks <= flight_time.ceil() + 1.0,
            "crossed y=300 after {} ticks, expected ~{}",
            ticks,
            flight_time
        );
    }

    #[test]
    fn test_wind_shifts_launch() {
        let origin = Vec2::new(0.0, 0.0);
        let target = Vec2::new(0.0, -120.0);
        let calm = launch_velocity(origin, target, 12.0, 0.08, 0.0, 0.0);
        let windy = launch_velocity(origin, target, 12.0, 0.08, 2.0, 0.0);
        assert!((windy.x - calm.x - 0.2).abs() < 1e-5);
        assert_eq!(windy.y, calm.y);
    }

    #[test]
    fn test_point_blank_is_finite() {
        let p = Vec2::new(10.0, 10.0);
        let vel = launch_velocity(p, p, 12.0, 0.08, 0.0, 0.0);
        assert!(vel.is_finite());
    }

    #[test]
    fn test_jitter_only_in_rain() {
        let mut rng = Pcg32::seed_from_u64(7);
        for weather in [Weather::Clear, Weather::Fog, Weather::Wind] {
            assert_eq!(precipitation_jitter(weather, &mut rng), 0.0);
        }
        for _ in 0..100 {
            let j = precipitation_jitter(Weather::Rain, &mut rng);
            assert!((-RAIN_JITTER..RAIN_JITTER).contains(&j));
        }
    }

    #[test]
    fn test_wind_drift_accumulates_only_under_wind() {
        let mut windy = Projectile::new(1, Vec2::ZERO, Vec2::ZERO, 0.0);
        let mut foggy = Projectile::new(2, Vec2::ZERO, Vec2::ZERO, 0.0);
        let wind = Environment {
            weather: Weather::Wind,
            wind: 2.0,
        };
        let fog = Environment {
            weather: Weather::Fog,
            wind: 2.0,
        };
        for _ in 0..10 {
            advance(&mut windy, &wind);
            advance(&mut foggy, &fog);
        }
        assert!((windy.vel.x - 0.2).abs() < 1e-5);
        assert_eq!(foggy.vel.x, 0.0);
    }

    #[test]
    fn test_gravity_applies_after_move() {
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::new(1.0, -2.0), 0.5);
        advance(&mut p, &Environment::clear());
        assert_eq!(p.pos, Vec2::new(1.0, -2.0));
        assert_eq!(p.vel.y, -1.5);
        assert_eq!(p.trail.len(), 1);
    }
}
