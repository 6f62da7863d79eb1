//! Session state and entity types
//!
//! Everything the loop driver owns for the duration of a session lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::aim;
use crate::consts::*;

/// HSL color tag for an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        hue: 0.0,
        saturation: 0.0,
        lightness: 100.0,
    };

    /// Enemy palette: random hue at half saturation/lightness
    pub fn from_hue(hue: f32) -> Self {
        Self {
            hue,
            saturation: 50.0,
            lightness: 50.0,
        }
    }

    /// CSS color string for the canvas backend
    pub fn to_css(&self) -> String {
        format!(
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Pre-game or post-game-over: no frame loop, no spawner
    #[default]
    Idle,
    /// Frame loop and spawn timer active
    Running,
}

/// Effects the simulation surfaces to the platform layer
/// (audio cues, overlay transitions). Drained by the loop driver each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An enemy was fully destroyed (explosion cue)
    EnemyDestroyed,
    /// The difficulty level increased
    LevelUp,
    /// Player-enemy collision ended the session
    GameOver,
}

/// The player avatar, fixed at screen center
#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            color: Color::WHITE,
        }
    }
}

/// A fired projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub vel: Vec2,
}

impl Projectile {
    pub fn update(&mut self) {
        self.pos += self.vel;
    }

    /// True once the projectile is fully outside the playfield
    pub fn off_screen(&self, bounds: Vec2) -> bool {
        self.pos.x + self.radius < 0.0
            || self.pos.x - self.radius > bounds.x
            || self.pos.y + self.radius < 0.0
            || self.pos.y - self.radius > bounds.y
    }
}

/// An inward-moving enemy circle
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Drawn/collided radius, eased toward `target_radius`
    pub radius: f32,
    /// Logical radius after pending shrink animation completes
    pub target_radius: f32,
    pub color: Color,
    pub vel: Vec2,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, radius: f32, color: Color, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            radius,
            target_radius: radius,
            color,
            vel,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        // Animated shrink: ease the drawn radius toward the post-hit value
        let diff = self.target_radius - self.radius;
        if diff.abs() < 0.1 {
            self.radius = self.target_radius;
        } else {
            self.radius += diff * ENEMY_SHRINK_RATE;
        }
    }

    /// Apply a hit's radius loss. The drawn radius catches up over
    /// subsequent updates.
    pub fn shrink(&mut self, amount: f32) {
        self.target_radius -= amount;
    }
}

/// A short-lived impact particle, fading via alpha decay
#[derive(Debug, Clone)]
pub struct Burst {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub vel: Vec2,
    pub alpha: f32,
}

impl Burst {
    pub fn new(pos: Vec2, radius: f32, color: Color, vel: Vec2) -> Self {
        Self {
            pos,
            radius,
            color,
            vel,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.vel *= BURST_FRICTION;
        self.pos += self.vel;
        self.alpha -= BURST_ALPHA_DECAY;
    }

    /// Eligible for removal at the end of the frame pass.
    /// Accumulated f32 decrements don't land exactly on zero, so the
    /// comparison allows half a step of slack.
    pub fn expired(&self) -> bool {
        self.alpha < BURST_ALPHA_DECAY / 2.0
    }
}

/// Complete session state, owned by the loop driver
#[derive(Debug, Clone)]
pub struct GameState {
    /// Playfield dimensions
    pub bounds: Vec2,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub bursts: Vec<Burst>,
    pub score: u64,
    pub level: u32,
    pub phase: GamePhase,
    /// Frames elapsed since the session started
    pub frame: u64,
    /// Effects pending pickup by the platform layer
    pub events: Vec<GameEvent>,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle session for the given playfield, player at center
    pub fn new(bounds: Vec2, seed: u64) -> Self {
        Self {
            bounds,
            player: Player::new(bounds / 2.0),
            projectiles: Vec::new(),
            enemies: Vec::new(),
            bursts: Vec::new(),
            score: 0,
            level: 1,
            phase: GamePhase::Idle,
            frame: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset score, level, and collections to their initial values.
    /// The player stays (recentered on current bounds).
    pub fn reset(&mut self) {
        self.player = Player::new(self.bounds / 2.0);
        self.projectiles.clear();
        self.enemies.clear();
        self.bursts.clear();
        self.score = 0;
        self.level = 1;
        self.frame = 0;
        self.events.clear();
    }

    /// Idle -> Running: reset and activate the session
    pub fn start(&mut self) {
        self.reset();
        self.phase = GamePhase::Running;
    }

    /// Running -> Idle. Score and level stay visible until the next start.
    pub fn stop(&mut self) {
        self.phase = GamePhase::Idle;
    }

    /// Fire one projectile from the player center toward `target`.
    /// A click on the player itself yields a zero velocity.
    pub fn fire_projectile(&mut self, target: Vec2) {
        let id = self.next_entity_id();
        let origin = self.player.pos;
        self.projectiles.push(Projectile {
            id,
            pos: origin,
            radius: PROJECTILE_RADIUS,
            color: Color::WHITE,
            vel: aim(origin, target) * PROJECTILE_SPEED,
        });
    }

    /// Random enemy color from the session RNG
    pub fn random_enemy_color(&mut self) -> Color {
        Color::from_hue(self.rng.random_range(0.0..360.0))
    }
}
