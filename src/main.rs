//! Noodle Dash entry point
//!
//! On the web: wires browser events to the game and runs the frame loop.
//! Natively: plays a headless run with a simple autopilot and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use noodle_dash::renderer::CanvasRenderer;
    use noodle_dash::sim::ProfileSet;
    use noodle_dash::{FrameStatus, Game, Settings};

    /// Game plus the browser resources driving it
    struct Host {
        game: Game,
        renderer: CanvasRenderer,
        /// Pending `requestAnimationFrame` handle, if the loop is running
        frame_handle: Option<i32>,
        last_time: f64,
    }

    impl Host {
        fn render(&self) {
            if let Err(e) = self
                .renderer
                .render(&self.game.state, &self.game.effects, &self.game.settings)
            {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let session = &self.game.state.session;

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&session.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-high-score") {
                el.set_text_content(Some(&session.high_score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-difficulty") {
                el.set_text_content(Some(&self.game.profile().name));
            }
            if let Some(el) = document.get_element_by_id("difficulty-description") {
                el.set_text_content(Some(&self.game.profile().description));
            }
        }

        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Noodle Dash starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game-canvas element");
            return;
        };

        let renderer = match CanvasRenderer::new(canvas.clone()) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas setup failed: {:?}", e);
                return;
            }
        };

        let mut settings = Settings::default();
        if let Ok(query) = window.location().search() {
            settings.apply_query(&query);
        }

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, settings, ProfileSet::default());
        if let Some(width) = window.inner_width().ok().and_then(|w| w.as_f64()) {
            game.resize(width as f32);
        }
        renderer.resize(game.state.field.width, game.state.field.height);

        let host = Rc::new(RefCell::new(Host {
            game,
            renderer,
            frame_handle: None,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, host.clone());
        setup_difficulty_buttons(host.clone());
        setup_resize(host.clone());
        setup_teardown(host.clone());

        {
            let h = host.borrow();
            h.render();
            h.update_hud();
        }

        log::info!("Noodle Dash ready");
    }

    /// Begin the frame loop if it is not already running
    fn start_loop(host: Rc<RefCell<Host>>) {
        {
            let mut h = host.borrow_mut();
            if h.frame_handle.is_some() {
                return;
            }
            h.last_time = 0.0;
        }
        request_animation_frame(host);
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let inner = host.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(inner, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => host.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        let status = {
            let mut h = host.borrow_mut();
            h.frame_handle = None;

            let dt = if h.last_time > 0.0 {
                time - h.last_time
            } else {
                1000.0 / 60.0
            };
            h.last_time = time;

            let status = h.game.frame(dt);
            h.render();
            h.update_hud();
            status
        };

        match status {
            FrameStatus::Continue => request_animation_frame(host),
            FrameStatus::Stopped => log::debug!("Frame loop stopped"),
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Keyboard
        {
            let host = host.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), " " | "ArrowUp") {
                    event.prevent_default();
                }
                let needs_loop = host.borrow_mut().game.handle_key(&key);
                if needs_loop {
                    start_loop(host.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let needs_loop = host.borrow_mut().game.handle_touch();
                if needs_loop {
                    start_loop(host.clone());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_difficulty_buttons(host: Rc<RefCell<Host>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let count = host.borrow().game.profiles().len();

        for index in 0..count {
            let Some(btn) = document.get_element_by_id(&format!("difficulty-{}", index)) else {
                continue;
            };
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut h = host.borrow_mut();
                if h.game.select_profile(index) {
                    h.render();
                    h.update_hud();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(width) = web_sys::window()
                .and_then(|w| w.inner_width().ok())
                .and_then(|w| w.as_f64())
            else {
                return;
            };
            let mut h = host.borrow_mut();
            h.game.resize(width as f32);
            let field = h.game.state.field;
            h.renderer.resize(field.width, field.height);
            h.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Page going away: cancel the pending frame and every timer
    fn setup_teardown(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut h = host.borrow_mut();
            h.cancel_frame();
            h.game.teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Noodle Dash (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let difficulty = args.first().cloned().unwrap_or_else(|| "Medium".to_string());
    let seed = parse_arg(args.get(1), 42u64, "seed");
    let max_frames = parse_arg(args.get(2), 20_000u64, "frames");

    let profiles = match load_profiles() {
        Ok(p) => p,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let settings = noodle_dash::Settings {
        difficulty,
        ..Default::default()
    };
    let mut game = noodle_dash::Game::new(seed, settings, profiles);
    game.press_start();

    for _ in 0..max_frames {
        if autopilot::should_jump(&game.state) {
            game.press_jump();
        }
        if game.frame(1000.0 / 60.0) == noodle_dash::FrameStatus::Stopped {
            break;
        }
    }

    let session = &game.state.session;
    log::info!(
        "{} run finished: {:?} after {} frames, score {}, speed {:.1}",
        game.profile().name,
        session.phase,
        session.frame,
        session.score,
        session.game_speed
    );
    println!("{}", session.score);
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_arg<T: std::str::FromStr>(arg: Option<&String>, default: T, name: &str) -> T {
    match arg.map(|a| a.parse::<T>()) {
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            log::warn!("Invalid {} argument, using default", name);
            default
        }
        None => default,
    }
}

/// Profiles from the file named by `RUNNER_PROFILES`, or the built-ins
#[cfg(not(target_arch = "wasm32"))]
fn load_profiles() -> Result<noodle_dash::sim::ProfileSet, String> {
    use noodle_dash::sim::ProfileSet;

    let Ok(path) = std::env::var("RUNNER_PROFILES") else {
        return Ok(ProfileSet::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("Cannot read {}: {}", path, e))?;
    let set = ProfileSet::from_json(&json).map_err(|e| format!("{}: {}", path, e))?;
    log::info!("Loaded {} profiles from {}", set.len(), path);
    Ok(set)
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use noodle_dash::consts::{OBSTACLE_WIDTH, RUNNER_WIDTH, RUNNER_X};
    use noodle_dash::sim::GameState;

    /// Frames of warning the autopilot wants before an obstacle arrives
    const LOOKAHEAD_FRAMES: f32 = 12.0;

    /// Jump when the next obstacle will reach the runner within the lookahead
    pub fn should_jump(state: &GameState) -> bool {
        if state.runner.airborne {
            return false;
        }
        let reach = state.session.game_speed * LOOKAHEAD_FRAMES;
        state.obstacles.iter().any(|o| {
            o.x + OBSTACLE_WIDTH > RUNNER_X && o.x < RUNNER_X + RUNNER_WIDTH + reach
        })
    }
}
