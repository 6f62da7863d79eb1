//! Enemy spawning
//!
//! Runs on a fixed wall-clock timer in the platform layer, independent of the
//! frame loop. Each spawn places one enemy just off a random screen edge,
//! aimed at the player, with speed scaled by the current level.

use glam::Vec2;
use rand::Rng;

use crate::aim;
use crate::consts::*;

use super::state::{Enemy, GamePhase, GameState};

/// Velocity aimed from `from` toward `target`: a unit vector at level 1,
/// scaled by `1 + 0.1 * (level - 1)` above that.
pub fn approach_velocity(from: Vec2, target: Vec2, level: u32) -> Vec2 {
    let dir = aim(from, target);
    if level > 1 {
        dir * (1.0 + LEVEL_SPEED_STEP * (level - 1) as f32)
    } else {
        dir
    }
}

/// Synthesize one enemy and append it to the live collection.
/// No-op once the session has ended (a stale timer tick must not mutate).
pub fn spawn_enemy(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    let id = state.next_entity_id();
    let color = state.random_enemy_color();
    let bounds = state.bounds;
    let radius = state
        .rng
        .random_range(ENEMY_MIN_RADIUS..ENEMY_MAX_RADIUS);

    // Pick one of the four edges, offset off-screen by the enemy's own radius
    let pos = if state.rng.random::<bool>() {
        let x = if state.rng.random::<bool>() {
            -radius
        } else {
            bounds.x + radius
        };
        Vec2::new(x, state.rng.random_range(0.0..bounds.y))
    } else {
        let y = if state.rng.random::<bool>() {
            -radius
        } else {
            bounds.y + radius
        };
        Vec2::new(state.rng.random_range(0.0..bounds.x), y)
    };

    let vel = approach_velocity(pos, state.player.pos, state.level);
    state.enemies.push(Enemy::new(id, pos, radius, color, vel));
}
