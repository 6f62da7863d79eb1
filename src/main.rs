//! Nova Siege entry point
//!
//! Wires the simulation to the browser: canvas sizing, the animation-frame
//! loop, the wall-clock spawn timer, click input, and HUD/overlay updates.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use nova_siege::Settings;
    use nova_siege::audio::{AudioManager, SoundEffect};
    use nova_siege::consts::*;
    use nova_siege::renderer::{CanvasSurface, render};
    use nova_siege::sim::{FrameInput, GameEvent, GamePhase, GameState, spawn_enemy, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: Option<CanvasSurface>,
        audio: AudioManager,
        settings: Settings,
        input: FrameInput,
        /// setInterval handle for the spawn timer, while a session runs
        spawn_interval: Option<i32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(bounds: Vec2, seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_sfx_volume(settings.effective_sfx_volume());
            audio.set_music_volume(settings.effective_music_volume());
            Self {
                state: GameState::new(bounds, seed),
                surface: None,
                audio,
                settings,
                input: FrameInput::default(),
                spawn_interval: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&self.fps.to_string()));
                } else {
                    el.set_text_content(None);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Nova Siege starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fill the viewport; the playfield is fixed for the page lifetime
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as u32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(Vec2::new(width as f32, height as f32), seed);
        game.surface = CanvasSurface::new(&canvas).ok();
        if game.surface.is_none() {
            log::error!("Failed to acquire a 2d canvas context");
        }
        let game = Rc::new(RefCell::new(game));

        log::info!("Playfield {}x{}, seed {}", width, height, seed);

        setup_click_handler(&canvas, game.clone());
        setup_start_button(game.clone());
        setup_settings_buttons(game.clone());
    }

    /// Clicks fire a projectile at the pointer position while a session runs.
    /// Queued rather than latched, so clicks faster than the frame rate all fire.
    fn setup_click_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut g = game.borrow_mut();
            if g.state.phase == GamePhase::Running {
                g.input.fire_at.push(Vec2::new(
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                ));
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                start_game(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::error!("No start button found");
        }
    }

    /// Mute and FPS-counter toggles, persisted on change
    fn setup_settings_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.toggle_muted();
                let sfx = g.settings.effective_sfx_volume();
                let music = g.settings.effective_music_volume();
                g.audio.set_sfx_volume(sfx);
                g.audio.set_music_volume(music);
                g.settings.save();
                log::info!("Muted: {}", g.settings.muted);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("fps-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.settings.toggle_show_fps();
                g.settings.save();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Idle -> Running: reset the session, start the frame loop and spawner
    fn start_game(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.state.phase == GamePhase::Running {
                return;
            }

            // Audio needs the user gesture this click provides
            g.audio.resume();
            g.audio.start_music();

            g.state.start();
            g.input = FrameInput::default();
            log::info!("Session started");
        }

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id("start-overlay") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        let interval = start_spawner(game.clone());
        game.borrow_mut().spawn_interval = interval;

        request_animation_frame(game.clone());
    }

    /// Fixed wall-clock spawn timer, independent of the frame loop
    fn start_spawner(game: Rc<RefCell<Game>>) -> Option<i32> {
        let closure = Closure::<dyn FnMut()>::new(move || {
            spawn_enemy(&mut game.borrow_mut().state);
        });
        let id = web_sys::window()
            .unwrap()
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                SPAWN_INTERVAL_MS,
            )
            .ok();
        closure.forget();
        if id.is_none() {
            log::error!("Failed to start the spawn timer");
        }
        id
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();

            let input = std::mem::take(&mut g.input);
            tick(&mut g.state, &input);

            let events: Vec<GameEvent> = g.state.events.drain(..).collect();
            for event in events {
                match event {
                    GameEvent::EnemyDestroyed => g.audio.play(SoundEffect::Explosion),
                    GameEvent::LevelUp => {
                        log::info!("Level up -> {}", g.state.level);
                        g.audio.play(SoundEffect::LevelUp);
                    }
                    GameEvent::GameOver => g.audio.play(SoundEffect::GameOver),
                }
            }

            let Game {
                state,
                surface,
                settings,
                ..
            } = &mut *g;
            if let Some(surface) = surface {
                render(state, surface, settings);
            }

            g.track_fps(time);
            g.update_hud();

            g.state.phase == GamePhase::Running
        };

        if keep_running {
            request_animation_frame(game);
        } else {
            end_session(&game);
        }
    }

    /// Running -> Idle teardown: cancel the spawn timer, surface the final
    /// score on the start overlay. The frame loop simply stops rescheduling.
    fn end_session(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();

        if let Some(id) = g.spawn_interval.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }

        log::info!(
            "Game over at level {} with score {}",
            g.state.level,
            g.state.score
        );

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&g.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("start-overlay") {
                let _ = el.set_attribute("class", "");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use nova_siege::sim::{FrameInput, GamePhase, GameState, spawn_enemy, tick};

    env_logger::init();
    log::info!("Nova Siege (native) starting...");

    // Headless smoke run: spawn an enemy every simulated second, fire at the
    // nearest one a few times a second, play until the session ends.
    let mut state = GameState::new(Vec2::new(1024.0, 768.0), 0xC0FFEE);
    state.start();

    for frame in 0..10_000u32 {
        if frame % 60 == 0 {
            spawn_enemy(&mut state);
        }
        let input = if frame % 15 == 0 {
            state
                .enemies
                .first()
                .map(|e| FrameInput {
                    fire_at: vec![e.pos],
                })
                .unwrap_or_default()
        } else {
            FrameInput::default()
        };
        tick(&mut state, &input);

        if state.phase == GamePhase::Idle {
            log::info!("Session ended at frame {}", state.frame);
            break;
        }
    }

    log::info!(
        "Final score {} at level {} ({} enemies live)",
        state.score,
        state.level,
        state.enemies.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
