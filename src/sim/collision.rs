//! Collision detection and scoring
//!
//! Projectiles are points, targets are discs of `HIT_RADIUS`. Targets are
//! scanned in order and the first one in range wins, so when two targets
//! overlap the earlier one takes the hit even if the later one is closer.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GameState, Particle, Projectile, Target};
use crate::consts::*;

/// Points for a hit `distance` from the target center
pub fn hit_points(distance: f32) -> u64 {
    let clamped = distance.min(HIT_RADIUS);
    let bonus = ((HIT_RADIUS - clamped) / HIT_RADIUS * MAX_ACCURACY_BONUS).floor();
    BASE_HIT_SCORE + bonus as u64
}

/// First un-hit target within range of `pos`, with its distance
pub fn find_hit(pos: Vec2, targets: &[Target]) -> Option<(usize, f32)> {
    targets
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.is_hit())
        .map(|(i, t)| (i, pos.distance(t.pos)))
        .find(|&(_, d)| d < HIT_RADIUS)
}

/// Spawn a hit burst at `pos`
pub fn spawn_burst(particles: &mut Vec<Particle>, pos: Vec2, rng: &mut impl Rng) {
    particles.reserve(PARTICLE_BURST);
    for _ in 0..PARTICLE_BURST {
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_SPEED..PARTICLE_SPEED),
            rng.random_range(-PARTICLE_SPEED..PARTICLE_SPEED),
        );
        particles.push(Particle {
            pos,
            vel,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        });
    }
}

/// Resolve a single in-flight projectile against the current targets
///
/// Returns the points scored, if any.
fn resolve_projectile(state: &mut GameState, projectile: &mut Projectile) -> Option<u64> {
    if !projectile.in_flight() {
        return None;
    }
    let (index, distance) = find_hit(projectile.pos, &state.targets)?;

    let points = hit_points(distance);
    let target = &mut state.targets[index];
    target.mark_hit();
    projectile.mark_hit();
    let (target_id, target_pos) = (target.id, target.pos);

    state.score += points;
    state.targets_hit += 1;
    spawn_burst(&mut state.particles, target_pos, &mut state.rng);

    log::debug!(
        "Target {} hit at distance {:.1} for {} points (accuracy {}%)",
        target_id,
        distance,
        points,
        state.accuracy()
    );
    state.push_event(GameEvent::TargetHit { target_id, points });
    Some(points)
}

/// Apply a projectile leaving the playfield without a hit
fn resolve_miss(state: &mut GameState, projectile: &mut Projectile) {
    if !projectile.in_flight() {
        return;
    }
    projectile.mark_missed();
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::ProjectileMissed {
        lives_left: state.lives,
    });

    if state.lives == 0 && !state.run_over {
        state.run_over = true;
        log::info!(
            "Run over: score {}, level {}, accuracy {}%",
            state.score,
            state.level,
            state.accuracy()
        );
        state.push_event(GameEvent::RunOver {
            score: state.score,
            accuracy: state.accuracy(),
        });
    }
}

/// Move every projectile, test hits, and retire finished shots
pub fn update_projectiles(state: &mut GameState) {
    let mut projectiles = std::mem::take(&mut state.projectiles);
    let environment = state.environment;

    for projectile in projectiles.iter_mut() {
        if state.run_over {
            break;
        }
        super::kinematics::advance(projectile, &environment);
        resolve_projectile(state, projectile);
        if state.viewport.is_outside(projectile.pos) {
            resolve_miss(state, projectile);
        }
    }

    // Hit shots are spent; off-screen ones are gone either way
    let viewport = state.viewport;
    projectiles.retain(|p| p.in_flight() && !viewport.is_outside(p.pos));
    state.projectiles = projectiles;
}

/// Age particles and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    particles.retain(|p| p.life > 0);
}
