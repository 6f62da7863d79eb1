//! Nova Siege - a canvas arcade shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, collisions, scoring, session state)
//! - `renderer`: Abstract 2D surface + draw pass (Canvas 2D backend on wasm)
//! - `audio`: Procedural Web Audio cues (wasm only)
//! - `settings`: User preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Player avatar radius (fixed at screen center)
    pub const PLAYER_RADIUS: f32 = 20.0;

    /// Projectile radius
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    /// Projectile speed in units per frame
    pub const PROJECTILE_SPEED: f32 = 5.0;

    /// Enemy spawn radius range (uniform)
    pub const ENEMY_MIN_RADIUS: f32 = 5.0;
    pub const ENEMY_MAX_RADIUS: f32 = 30.0;
    /// Radius lost per projectile hit
    pub const ENEMY_SHRINK_STEP: f32 = 10.0;
    /// An enemy whose post-hit radius would be at or below this is destroyed outright
    pub const ENEMY_DESTROY_THRESHOLD: f32 = 5.0;
    /// Per-frame easing factor for the animated radius shrink
    pub const ENEMY_SHRINK_RATE: f32 = 0.2;
    /// Per-level speed multiplier increment above level 1
    pub const LEVEL_SPEED_STEP: f32 = 0.1;

    /// Burst particle defaults
    pub const BURST_MAX_RADIUS: f32 = 2.0;
    pub const BURST_FRICTION: f32 = 0.99;
    pub const BURST_ALPHA_DECAY: f32 = 0.01;
    pub const BURST_SPEED_SPREAD: f32 = 5.0;

    /// Scoring
    pub const SCORE_HIT: u64 = 50;
    pub const SCORE_DESTROY: u64 = 125;
    /// Cumulative score step per level (leaving level L costs L * this)
    pub const LEVEL_SCORE_STEP: u64 = 10_000;

    /// Collision tolerance for discrete per-frame position sampling
    pub const COLLISION_EPSILON: f32 = 1.0;

    /// Wall-clock period between enemy spawns
    pub const SPAWN_INTERVAL_MS: i32 = 1_000;

    /// Alpha of the per-frame black repaint (trail fade, not a hard clear)
    pub const TRAIL_FADE_ALPHA: f32 = 0.1;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
/// (avoids propagating NaN into position updates).
#[inline]
pub fn aim(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
