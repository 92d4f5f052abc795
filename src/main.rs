//! Swarm Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use swarm_shooter::audio::{AudioManager, SoundEffect};
    use swarm_shooter::platform::{InputState, Key};
    use swarm_shooter::renderer::{RenderState, build_scene, shake_offset};
    use swarm_shooter::sim::GamePhase;
    use swarm_shooter::ui::{HudState, HudTracker, Page};
    use swarm_shooter::{Game, Settings, Tuning};

    /// Everything the page owns, shared between callbacks
    struct App {
        game: Game,
        input: InputState,
        settings: Settings,
        audio: AudioManager,
        render_state: Option<RenderState>,
        hud: HudTracker,
        /// Drives cosmetic randomness (screen shake) outside the simulation
        fx_rng: Pcg32,
        canvas: HtmlCanvasElement,
        /// Whether an animation frame is currently scheduled
        loop_active: bool,
    }

    impl App {
        /// Run one animation frame. Returns whether to schedule another.
        fn frame(&mut self, time: f64) -> bool {
            let input = self.input.to_tick_input();
            let keep_running = self.game.frame(time, &input);
            self.dispatch_events();
            self.render(time);
            self.sync_hud();
            keep_running
        }

        /// Feed simulation events to the audio system
        fn dispatch_events(&mut self) {
            for event in self.game.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        fn render(&mut self, time: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let shake = shake_offset(&mut self.fx_rng, self.game.state.screen_shake);
            let vertices = build_scene(&self.game.state, &self.settings, (time / 1000.0) as f32, shake);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    let logical = render_state.logical_size;
                    render_state.resize(w, h, logical);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Write HUD fields that changed since the last frame
        fn sync_hud(&mut self) {
            let Some(document) = document() else { return };
            let hud = HudState::from_state(&self.game.state);
            let changes = self.hud.update(&hud);

            if changes.page {
                let (home, game) = match hud.page {
                    Page::Home => ("display: flex", "display: none"),
                    Page::Game => ("display: none", "display: block"),
                };
                set_style(&document, "home-page", home);
                set_style(&document, "game-page", game);
            }
            if changes.score {
                set_text(&document, "score", &hud.score_text);
            }
            if changes.wave {
                set_text(&document, "wave", &hud.wave_text);
            }
            if changes.health {
                set_style(&document, "health-bar", &format!("width: {}", hud.health_width_css()));
            }
            if changes.overlay {
                if let Some(el) = document.get_element_by_id("overlay") {
                    if hud.overlay_visible {
                        let _ = el.remove_attribute("hidden");
                    } else {
                        let _ = el.set_attribute("hidden", "");
                    }
                }
                set_text(&document, "final-score", &hud.final_score_text);
            }
        }

        /// Reveal the game page so the canvas has a real size before a
        /// session is laid out on it
        fn show_game_page(&mut self) {
            if let Some(document) = document() {
                set_style(&document, "home-page", "display: none");
                set_style(&document, "game-page", "display: block");
            }
            self.hud.invalidate();
            self.fit_canvas();
        }

        /// Canvas size in CSS pixels, resizing the backing store to match
        fn fit_canvas(&mut self) -> Vec2 {
            let (logical, width, height) = canvas_size(&self.canvas);
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height, logical);
            }
            self.game.resize(logical);
            logical
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn new_seed() -> u64 {
        js_sys::Date::now() as u64
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn sync_crosshair(input: &InputState) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id("crosshair")) {
            let _ = el.set_attribute("class", input.crosshair_class());
        }
    }

    fn set_style(document: &Document, id: &str, style: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("style", style);
        }
    }

    /// (CSS size, physical width, physical height)
    fn canvas_size(canvas: &HtmlCanvasElement) -> (Vec2, u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .max(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let logical = Vec2::new(client_w as f32, client_h as f32);
        (logical, (client_w as f64 * dpr) as u32, (client_h as f64 * dpr) as u32)
    }

    async fn create_renderer(canvas: &HtmlCanvasElement) -> Option<RenderState> {
        let (logical, width, height) = canvas_size(canvas);
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("Failed to create surface - rendering disabled: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("No GPU adapter - rendering disabled: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, logical).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::warn!("Failed to create device - rendering disabled: {}", e);
                None
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Swarm Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no #game canvas")?
            .dyn_into()?;

        let tuning = canvas
            .get_attribute("data-tuning")
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();
        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();

        let seed = new_seed();
        let (logical, width, height) = canvas_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let render_state = create_renderer(&canvas).await;
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, logical, tuning),
            input: InputState::default(),
            audio: AudioManager::new(&settings, seed ^ 0x5eed),
            settings,
            render_state,
            hud: HudTracker::default(),
            fx_rng: Pcg32::seed_from_u64(seed),
            canvas: canvas.clone(),
            loop_active: false,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, app.clone());
        setup_buttons(app.clone());

        // Show the title screen; frames start with the first session
        app.borrow_mut().sync_hud();

        log::info!("Swarm Shooter ready");
        Ok(())
    }

    /// Begin or replace the session and make sure frames are flowing
    fn restart(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.audio.resume();
            a.input.release_all();
            if a.game.phase() == GamePhase::Home {
                a.show_game_page();
            }
            a.game.restart(new_seed(), now());
        }
        ensure_loop(app.clone());
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_dom(&event.key()) else { return };
                let restart_requested = {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.input.key_down(key);
                    key == Key::R && !a.game.is_running()
                };
                if restart_requested {
                    restart(&app);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom(&event.key()) {
                    app.borrow_mut().input.key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer position relative to the canvas; crosshair follows the page position
        {
            let app = app.clone();
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                let mut a = app.borrow_mut();
                a.input.set_pointer(Vec2::new(x, y));
                if a.settings.crosshair {
                    if let Some(document) = document() {
                        set_style(
                            &document,
                            "crosshair",
                            &format!("left: {}px; top: {}px", event.client_x(), event.client_y()),
                        );
                    }
                }
            });
            let _ = window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (kind, down) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.input.pointer_down = down;
                sync_crosshair(&a.input);
            });
            let _ = window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drop held keys when focus leaves the page
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                a.input.release_all();
                sync_crosshair(&a.input);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let logical = a.fit_canvas();
                log::debug!("Resized to {}x{}", logical.x, logical.y);
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("start-game") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("back-to-home") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.game.go_home();
                a.input.release_all();
                a.sync_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn ensure_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.loop_active {
                return;
            }
            a.loop_active = true;
        }
        request_animation_frame(app);
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_running = app.borrow_mut().frame(time);
        if keep_running {
            request_animation_frame(app);
        } else {
            app.borrow_mut().loop_active = false;
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Swarm Shooter (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` for the web version");

    let tuning = match std::env::var("SWARM_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => swarm_shooter::Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                swarm_shooter::Tuning::default()
            }
        },
        Err(_) => swarm_shooter::Tuning::default(),
    };

    let seed = std::env::var("SWARM_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);
    let summary = autopilot::run(seed, tuning, autopilot::MAX_SECONDS);
    log::info!(
        "Autopilot finished: score {} wave {} kills {} shots {} survived {:.1}s",
        summary.score,
        summary.wave,
        summary.kills,
        summary.shots,
        summary.seconds
    );
}

/// Scripted player for native smoke runs
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;
    use swarm_shooter::sim::{GameEvent, GameState, TickInput};
    use swarm_shooter::{Game, Tuning};

    pub const MAX_SECONDS: f64 = 300.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    #[derive(Debug, Default)]
    pub struct Summary {
        pub score: u64,
        pub wave: u32,
        pub kills: u32,
        pub shots: u32,
        pub seconds: f64,
    }

    /// Aim at the nearest enemy and walk away from it
    fn steer(state: &GameState) -> TickInput {
        let me = state.player.body.pos;
        let nearest = state
            .enemies
            .iter()
            .min_by(|a, b| {
                a.body
                    .pos
                    .distance_squared(me)
                    .total_cmp(&b.body.pos.distance_squared(me))
            })
            .map(|e| e.body.pos);

        let Some(target) = nearest else {
            return TickInput {
                pointer: Some(state.viewport * 0.5),
                ..Default::default()
            };
        };
        // Drift back toward the middle so the walls do not pin us
        let away = (me - target).normalize_or_zero() + (state.viewport * 0.5 - me) / state.viewport.x;
        TickInput {
            up: away.y < -0.3,
            down: away.y > 0.3,
            left: away.x < -0.3,
            right: away.x > 0.3,
            sprint: target.distance(me) < 120.0,
            pointer: Some(target),
        }
    }

    pub fn run(seed: u64, tuning: Tuning, max_seconds: f64) -> Summary {
        let mut game = Game::new(seed, VIEWPORT, tuning);
        let mut summary = Summary::default();
        let mut ts = 0.0;
        game.start(seed, ts);

        while game.is_running() && ts < max_seconds * 1000.0 {
            ts += FRAME_MS;
            let input = steer(&game.state);
            game.frame(ts, &input);
            for event in game.drain_events() {
                match event {
                    GameEvent::ShotFired { .. } => summary.shots += 1,
                    GameEvent::EnemyKilled { .. } => summary.kills += 1,
                    _ => {}
                }
            }
        }

        summary.score = game.state.score;
        summary.wave = game.state.wave;
        summary.seconds = game.state.elapsed_ms / 1000.0;
        summary
    }

}
