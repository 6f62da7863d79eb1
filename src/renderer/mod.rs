//! Rendering: abstract 2D surface and the per-frame draw pass
//!
//! The draw pass reads simulation state without mutating it. The surface
//! must keep its compositing buffer between frames: the motion-trail effect
//! comes from a low-alpha repaint, never a hard clear.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::Settings;
use crate::consts::TRAIL_FADE_ALPHA;
use crate::sim::{Color, GameState};

/// An abstract 2D drawing target with a persistent buffer
pub trait Surface {
    fn size(&self) -> Vec2;
    /// Repaint the whole surface black at the given alpha
    fn fade(&mut self, alpha: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);
}

/// Draw one frame: fading repaint, then player, bursts, projectiles, enemies.
pub fn render(state: &GameState, surface: &mut impl Surface, settings: &Settings) {
    surface.fade(TRAIL_FADE_ALPHA);

    let player = &state.player;
    surface.fill_circle(player.pos, player.radius, player.color, 1.0);

    if settings.particles {
        for burst in &state.bursts {
            surface.fill_circle(burst.pos, burst.radius, burst.color, burst.alpha.max(0.0));
        }
    }

    for projectile in &state.projectiles {
        surface.fill_circle(projectile.pos, projectile.radius, projectile.color, 1.0);
    }

    for enemy in &state.enemies {
        surface.fill_circle(enemy.pos, enemy.radius, enemy.color, 1.0);
    }
}
