//! Per-frame simulation tick
//!
//! The loop driver: advances every live entity once per frame, retires
//! expired ones, and resolves collisions with end-of-pass removals so a
//! collection is never mutated while it is being traversed.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

use super::collision::circles_collide;
use super::state::{Burst, GameEvent, GamePhase, GameState};

/// Input gathered by the platform layer for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Click targets since the last frame; each fires one projectile
    /// from the player center
    pub fire_at: Vec<Vec2>,
}

/// Cumulative score required to leave the given level
pub fn level_threshold(level: u32) -> u64 {
    (1..=level as u64).map(|i| i * LEVEL_SCORE_STEP).sum()
}

/// Advance the session by one display frame. No-op while idle.
pub fn tick(state: &mut GameState, input: &FrameInput) {
    if state.phase != GamePhase::Running {
        return;
    }
    state.frame += 1;

    for target in &input.fire_at {
        state.fire_projectile(*target);
    }

    // Level progression: at most one step per frame. Score only grows in
    // +50/+125 increments, so a frame can never cross two thresholds.
    if state.score >= level_threshold(state.level) {
        state.level += 1;
        state.events.push(GameEvent::LevelUp);
    }

    for burst in &mut state.bursts {
        burst.update();
    }
    state.bursts.retain(|b| !b.expired());

    for projectile in &mut state.projectiles {
        projectile.update();
    }
    let bounds = state.bounds;
    state.projectiles.retain(|p| !p.off_screen(bounds));

    for enemy in &mut state.enemies {
        enemy.update();
    }

    // Terminal check: any enemy touching the player ends the session.
    // Contact is recorded before hit resolution but applied after it, so
    // projectile hits landing on the final frame still score and the
    // session ends even if the touching enemy was destroyed that frame.
    // The platform layer cancels the frame loop and spawn timer on GameOver.
    let player = state.player;
    let fatal = state
        .enemies
        .iter()
        .any(|e| circles_collide(player.pos, player.radius, e.pos, e.radius));

    resolve_hits(state);

    if fatal {
        state.phase = GamePhase::Idle;
        state.events.push(GameEvent::GameOver);
    }
}

/// Pairwise projectile-enemy resolution.
///
/// Hits mark entity ids; the marked sets are applied by `retain` only after
/// the full pass, so removal never shifts an index under the traversal.
fn resolve_hits(state: &mut GameState) {
    let mut dead_projectiles: Vec<u32> = Vec::new();
    let mut dead_enemies: Vec<u32> = Vec::new();

    for enemy in state.enemies.iter_mut() {
        for projectile in state.projectiles.iter() {
            if dead_projectiles.contains(&projectile.id) {
                continue;
            }
            if !circles_collide(projectile.pos, projectile.radius, enemy.pos, enemy.radius) {
                continue;
            }

            // Particle burst at the impact point, in the enemy's color
            let count = (enemy.radius * 2.0) as usize;
            for _ in 0..count {
                let vel = Vec2::new(
                    (state.rng.random::<f32>() - 0.5)
                        * (state.rng.random::<f32>() * BURST_SPEED_SPREAD),
                    (state.rng.random::<f32>() - 0.5)
                        * (state.rng.random::<f32>() * BURST_SPEED_SPREAD),
                );
                state.bursts.push(Burst::new(
                    projectile.pos,
                    state.rng.random_range(0.0..BURST_MAX_RADIUS),
                    enemy.color,
                    vel,
                ));
            }

            dead_projectiles.push(projectile.id);

            // Shrink decisions use the logical radius so a hit landing
            // mid-animation is not counted against the larger drawn radius
            if enemy.target_radius - ENEMY_SHRINK_STEP > ENEMY_DESTROY_THRESHOLD {
                enemy.shrink(ENEMY_SHRINK_STEP);
                state.score += SCORE_HIT;
            } else {
                dead_enemies.push(enemy.id);
                state.events.push(GameEvent::EnemyDestroyed);
                state.score += SCORE_DESTROY;
                break;
            }
        }
    }

    state.enemies.retain(|e| !dead_enemies.contains(&e.id));
    state
        .projectiles
        .retain(|p| !dead_projectiles.contains(&p.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Color, Enemy, Projectile};

    const BOUNDS: Vec2 = Vec2::new(1000.0, 1000.0);

    fn running_state() -> GameState {
        let mut state = GameState::new(BOUNDS, 7);
        state.start();
        state
    }

    /// Stationary enemy for collision setups
    fn plant_enemy(state: &mut GameState, pos: Vec2, radius: f32) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(
            id,
            pos,
            radius,
            Color::from_hue(120.0),
            Vec2::ZERO,
        ));
        id
    }

    /// Stationary projectile already overlapping its target
    fn plant_projectile(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            radius: PROJECTILE_RADIUS,
            color: Color::WHITE,
            vel: Vec2::ZERO,
        });
        id
    }

    fn count_events(state: &GameState, event: GameEvent) -> usize {
        state.events.iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_burst_fades_out_in_hundred_updates() {
        let mut burst = Burst::new(Vec2::ZERO, 1.5, Color::WHITE, Vec2::new(1.0, -1.0));
        for i in 0..100 {
            assert!(!burst.expired(), "expired early at update {i}");
            burst.update();
        }
        assert!(burst.expired());

        // A tick retires it
        let mut state = running_state();
        state.bursts.push(burst);
        tick(&mut state, &FrameInput::default());
        assert!(state.bursts.is_empty());
    }

    #[test]
    fn test_burst_friction_decays_velocity() {
        let mut burst = Burst::new(Vec2::ZERO, 1.0, Color::WHITE, Vec2::new(2.0, 0.0));
        burst.update();
        assert!((burst.vel.x - 2.0 * BURST_FRICTION).abs() < 1e-6);
        assert!((burst.pos.x - 2.0 * BURST_FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_shrinks_then_dies() {
        let mut state = running_state();
        let enemy_pos = Vec2::new(800.0, 500.0);
        plant_enemy(&mut state, enemy_pos, 26.0);

        // First hit: 26 -> 16, +50
        plant_projectile(&mut state, enemy_pos);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.enemies.len(), 1);
        assert!((state.enemies[0].target_radius - 16.0).abs() < 1e-5);
        assert_eq!(state.score, 50);
        assert!(state.projectiles.is_empty());

        // Second hit: 16 -> 6, +50
        plant_projectile(&mut state, enemy_pos);
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.enemies.len(), 1);
        assert!((state.enemies[0].target_radius - 6.0).abs() < 1e-5);
        assert_eq!(state.score, 100);

        // Third hit: 6 - 10 <= 5, enemy destroyed, +125
        plant_projectile(&mut state, enemy_pos);
        tick(&mut state, &FrameInput::default());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 225);
        assert_eq!(count_events(&state, GameEvent::EnemyDestroyed), 1);
    }

    #[test]
    fn test_drawn_radius_eases_toward_target() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, 26.0, Color::from_hue(0.0), Vec2::ZERO);
        enemy.shrink(ENEMY_SHRINK_STEP);
        assert!((enemy.radius - 26.0).abs() < 1e-5);
        enemy.update();
        assert!(enemy.radius < 26.0 && enemy.radius > 16.0);
        for _ in 0..60 {
            enemy.update();
        }
        assert!((enemy.radius - 16.0).abs() < 0.11);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_threshold(1), 10_000);
        assert_eq!(level_threshold(2), 30_000);
        assert_eq!(level_threshold(3), 60_000);

        let mut state = running_state();
        state.score = 9_999;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.level, 1);

        state.score = 10_000;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.level, 2);
        assert_eq!(count_events(&state, GameEvent::LevelUp), 1);

        state.score = 29_999;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.level, 2);

        state.score = 30_000;
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_fire_projectile_speed_and_direction() {
        let mut state = running_state();
        let input = FrameInput {
            fire_at: vec![Vec2::new(600.0, 500.0)],
        };
        tick(&mut state, &input);
        assert_eq!(state.projectiles.len(), 1);
        let p = &state.projectiles[0];
        assert!((p.vel - Vec2::new(PROJECTILE_SPEED, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_every_click_in_a_frame_fires() {
        // Two clicks landing between two display frames both fire
        let mut state = running_state();
        let input = FrameInput {
            fire_at: vec![Vec2::new(600.0, 500.0), Vec2::new(500.0, 600.0)],
        };
        tick(&mut state, &input);

        assert_eq!(state.projectiles.len(), 2);
        assert!((state.projectiles[0].vel - Vec2::new(PROJECTILE_SPEED, 0.0)).length() < 1e-5);
        assert!((state.projectiles[1].vel - Vec2::new(0.0, PROJECTILE_SPEED)).length() < 1e-5);
    }

    #[test]
    fn test_click_on_player_yields_zero_velocity() {
        let mut state = running_state();
        let center = state.player.pos;
        let input = FrameInput {
            fire_at: vec![center],
        };
        tick(&mut state, &input);
        let p = &state.projectiles[0];
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(p.pos.x.is_finite() && p.pos.y.is_finite());
    }

    #[test]
    fn test_offscreen_projectile_is_retired() {
        let mut state = running_state();
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            id,
            pos: Vec2::new(2.0, 500.0),
            radius: PROJECTILE_RADIUS,
            color: Color::WHITE,
            vel: Vec2::new(-PROJECTILE_SPEED, 0.0),
        });
        tick(&mut state, &FrameInput::default());
        assert_eq!(state.projectiles.len(), 1); // at x=-3, not fully out yet
        tick(&mut state, &FrameInput::default());
        assert!(state.projectiles.is_empty()); // x=-8, fully off-screen
    }

    #[test]
    fn test_enemy_reaching_player_ends_session() {
        let mut state = running_state();
        // Enemy above the screen moving straight down at unit speed
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(
            id,
            Vec2::new(500.0, -30.0),
            20.0,
            Color::from_hue(200.0),
            Vec2::new(0.0, 1.0),
        ));

        let mut frames = 0u32;
        while state.phase == GamePhase::Running {
            tick(&mut state, &FrameInput::default());
            frames += 1;
            assert!(frames < 600, "enemy never reached the player");
        }

        assert_eq!(count_events(&state, GameEvent::GameOver), 1);

        // No further mutation once idle
        let score = state.score;
        let enemy_pos = state.enemies[0].pos;
        let frame = state.frame;
        for _ in 0..10 {
            tick(&mut state, &FrameInput::default());
        }
        assert_eq!(state.score, score);
        assert_eq!(state.enemies[0].pos, enemy_pos);
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_projectile_kill_emits_burst_and_score() {
        let mut state = running_state();
        plant_enemy(&mut state, Vec2::new(700.0, 500.0), 12.0);

        // Fire along +x from the player center
        let input = FrameInput {
            fire_at: vec![Vec2::new(600.0, 500.0)],
        };
        tick(&mut state, &input);

        let mut frames = 1u32;
        while !state.enemies.is_empty() {
            tick(&mut state, &FrameInput::default());
            frames += 1;
            assert!(frames < 100, "projectile never reached the enemy");
        }

        // 12 - 10 = 2 <= 5: destroyed on the first hit
        assert_eq!(state.score, SCORE_DESTROY);
        assert_eq!(count_events(&state, GameEvent::EnemyDestroyed), 1);
        assert_eq!(state.bursts.len(), 24); // 2 * enemy radius particles
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_final_frame_hits_still_score() {
        // One enemy touches the player while another is shot the same frame:
        // the kill scores and bursts, and the session still ends
        let mut state = running_state();
        let touching = state.player.pos + Vec2::new(30.0, 0.0);
        plant_enemy(&mut state, touching, 20.0);
        let far = Vec2::new(800.0, 800.0);
        plant_enemy(&mut state, far, 6.0);
        plant_projectile(&mut state, far);

        tick(&mut state, &FrameInput::default());

        assert_eq!(state.score, SCORE_DESTROY);
        assert_eq!(count_events(&state, GameEvent::EnemyDestroyed), 1);
        assert_eq!(state.bursts.len(), 12);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(count_events(&state, GameEvent::GameOver), 1);
    }

    #[test]
    fn test_simultaneous_hits_all_resolve() {
        // Three colliding pairs in one frame: deferred removal must not let
        // earlier removals skip later pairs
        let mut state = running_state();
        let spots = [
            Vec2::new(200.0, 200.0),
            Vec2::new(800.0, 200.0),
            Vec2::new(800.0, 800.0),
        ];
        for pos in spots {
            plant_enemy(&mut state, pos, 6.0);
            plant_projectile(&mut state, pos);
        }

        tick(&mut state, &FrameInput::default());

        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 3 * SCORE_DESTROY);
        assert_eq!(count_events(&state, GameEvent::EnemyDestroyed), 3);
        assert_eq!(state.bursts.len(), 3 * 12);
    }

    #[test]
    fn test_consumed_projectile_cannot_hit_twice() {
        // One projectile overlapping two enemies: once consumed by the first
        // pair it must not also damage the second enemy
        let mut state = running_state();
        let pos = Vec2::new(300.0, 300.0);
        plant_enemy(&mut state, pos, 6.0);
        plant_enemy(&mut state, pos + Vec2::new(8.0, 0.0), 26.0);
        plant_projectile(&mut state, pos);

        tick(&mut state, &FrameInput::default());

        assert_eq!(state.enemies.len(), 1);
        assert!((state.enemies[0].target_radius - 26.0).abs() < 1e-5);
        assert_eq!(state.score, SCORE_DESTROY);
    }

    #[test]
    fn test_start_resets_session() {
        let mut state = running_state();
        plant_enemy(&mut state, Vec2::new(100.0, 100.0), 10.0);
        plant_projectile(&mut state, Vec2::new(200.0, 200.0));
        state.score = 4_000;
        state.level = 3;
        state.stop();

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(state.bursts.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.player.pos, BOUNDS / 2.0);
    }
}
