//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Per-frame updates only (velocities are units per frame)
//! - Seeded RNG owned by the state
//! - Collection membership changes only by append and end-of-pass retain
//! - No rendering, DOM, or audio dependencies (effects surface as `GameEvent`s)

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::circles_collide;
pub use spawn::{approach_velocity, spawn_enemy};
pub use state::{Burst, Color, Enemy, GameEvent, GamePhase, GameState, Player, Projectile};
pub use tick::{FrameInput, level_threshold, tick};
