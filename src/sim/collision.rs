//! Circle-circle collision predicate
//!
//! Positions are sampled once per frame, so contact is tested against a
//! small tolerance instead of exact tangency.

use glam::Vec2;

use crate::consts::COLLISION_EPSILON;

/// Two circles collide iff the gap between their boundaries is below the
/// frame-sampling tolerance: `d - r1 - r2 < 1`.
#[inline]
pub fn circles_collide(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) - a_radius - b_radius < COLLISION_EPSILON
}
