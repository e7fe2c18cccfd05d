//! Reciclus entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement, KeyboardEvent};

    use reciclus::audio::{AudioDirector, HtmlAudioBackend};
    use reciclus::hud::{HudSnapshot, Overlay};
    use reciclus::platform::{FrameClock, HostAction, map_key};
    use reciclus::renderer::{CanvasSurface, render_scene};
    use reciclus::resources::ResourceCache;
    use reciclus::sim::{Command, Direction, GameEvent, GameState, TickInput, tick};
    use reciclus::{AssetError, GameConfig};

    type Images = Rc<RefCell<ResourceCache<HtmlImageElement>>>;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        surface: CanvasSurface,
        audio: HtmlAudioBackend,
        director: AudioDirector,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64, surface: CanvasSurface) -> Self {
            let audio = HtmlAudioBackend::new(&config.sounds);
            Self {
                state: GameState::with_seed(config, seed),
                clock: FrameClock::new(),
                input: TickInput::default(),
                surface,
                audio,
                director: AudioDirector::new(),
                last_hud: None,
            }
        }

        /// Advance, react to events, draw
        fn frame(&mut self, time: f64, images: &ResourceCache<HtmlImageElement>) {
            let dt = self.clock.advance(time);
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                self.director.handle(&event, &mut self.audio);
                match event {
                    GameEvent::EnemyHit { .. } => shake_playfield(),
                    GameEvent::GameOver { .. } => {
                        let hud = HudSnapshot::from_state(&self.state);
                        log::info!(
                            "Final stats: {}",
                            serde_json::to_string(&hud).unwrap_or_default()
                        );
                    }
                    _ => {}
                }
            }

            render_scene(&self.state, images, &mut self.surface);
            self.update_hud();
        }

        fn toggle_mute(&mut self) {
            self.director.toggle_mute(&mut self.audio);
            if let Some(controls) = document().query_selector(".volume_controls").ok().flatten() {
                if let Ok(icons) = controls.query_selector_all("span.fas") {
                    for i in 0..icons.length() {
                        if let Some(icon) = icons.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                            let _ = icon.class_list().toggle("d-none");
                        }
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let hud = HudSnapshot::from_state(&self.state);
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let previous_overlay = self.last_hud.as_ref().map(|h| h.overlay);
            let document = document();

            set_text(&document, ".level-number", &hud.level.to_string());
            set_text(&document, ".points", &hud.points.to_string());

            if let Some(lives) = document.get_element_by_id("lives_container") {
                lives.set_inner_html("");
                for _ in 0..hud.lives {
                    if let Ok(heart) = document.create_element("i") {
                        let _ = heart.set_attribute("class", "fa fa-heart heart-lives");
                        let _ = lives.append_child(&heart);
                    }
                }
            }

            if let Some(bar) = query_html(&document, ".panel .progress-bar") {
                let _ = bar
                    .style()
                    .set_property("width", &format!("{}%", hud.progress_percent));
            }

            // Overlays
            toggle_class(&document, "#startScreen", "show", hud.overlay == Overlay::StartScreen);
            toggle_class(
                &document,
                "#gameOverScreen",
                "show",
                hud.overlay == Overlay::GameOverScreen,
            );
            toggle_class(
                &document,
                "#canvas_container .overlay",
                "d-none",
                hud.overlay != Overlay::Countdown,
            );
            let countdown = hud.countdown.map(|c| c.to_string()).unwrap_or_default();
            set_text(&document, "#canvas_container .overlay_countdown", &countdown);

            if hud.overlay == Overlay::GameOverScreen {
                set_text(&document, ".points-finalScore", &hud.points.to_string());
            }

            // Focus the overlay button so Space/Enter works right away
            if previous_overlay != Some(hud.overlay) {
                let button = match hud.overlay {
                    Overlay::StartScreen => query_html(&document, "#playGame"),
                    Overlay::GameOverScreen => query_html(&document, "#tryAgain"),
                    _ => None,
                };
                if let Some(button) = button {
                    let _ = button.focus();
                }
            }

            self.last_hud = Some(hud);
        }
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn query_html(document: &Document, selector: &str) -> Option<HtmlElement> {
        document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn toggle_class(document: &Document, selector: &str, class: &str, on: bool) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn shake_playfield() {
        if let Some(container) = document().get_element_by_id("canvas_container") {
            let _ = container.class_list().add_1("anim--shake");
        }
    }

    /// Read the optional `<script id="game-config" type="application/json">`
    fn load_config(document: &Document) -> GameConfig {
        let Some(el) = document.get_element_by_id("game-config") else {
            log::info!("Using default config");
            return GameConfig::default();
        };
        let json = el.text_content().unwrap_or_default();
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from page");
                config
            }
            Err(e) => {
                log::error!("{} - using default config", e);
                GameConfig::default()
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Reciclus starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let config = load_config(&document);
        let seed = config.seed.unwrap_or(js_sys::Date::now() as u64);
        let max_retries = config.asset_max_retries;
        let timeout_secs = config.asset_timeout_secs;
        let manifest = config.asset_manifest();

        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .expect("create canvas")
            .dyn_into()
            .expect("not a canvas");
        if let Some(container) = document.get_element_by_id("canvas_container") {
            let _ = container.append_child(&canvas);
        }
        let surface = CanvasSurface::new(
            &canvas,
            config.engine.playfield_width(),
            config.engine.playfield_height(),
        )
        .expect("no 2d context");

        let game = Rc::new(RefCell::new(Game::new(config, seed, surface)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            g.director.start_music(&mut g.audio);
            g.update_hud();
        }

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start the loop once every image is in
        let images: Images = Rc::new(RefCell::new(ResourceCache::new()));
        {
            let game = game.clone();
            let loop_images = images.clone();
            images.borrow_mut().on_ready(move || {
                if let Some(loading) = document.get_element_by_id("loading") {
                    let _ = loading.set_attribute("class", "hidden");
                }
                request_animation_frame(game, loop_images);
                log::info!("Reciclus running!");
            });
        }

        let to_fetch = images.borrow_mut().load(&manifest);
        for id in to_fetch {
            fetch_image(images.clone(), id, max_retries);
        }
        schedule_startup_watchdog(images, js_sys::Date::now(), timeout_secs, max_retries);
    }

    /// Start decoding one image; completion and failure report to the cache
    fn fetch_image(images: Images, id: String, max_retries: u32) {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(e) => {
                log::error!("Failed to create image for {}: {:?}", id, e);
                return;
            }
        };

        {
            let images = images.clone();
            let id = id.clone();
            let loaded = img.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                // Run callbacks after the borrow is released
                let callbacks = images.borrow_mut().mark_loaded(&id, loaded.clone());
                for callback in callbacks {
                    callback();
                }
            });
            img.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        {
            let id = id.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let retry = {
                    let mut cache = images.borrow_mut();
                    cache.mark_failed(&id);
                    cache.retry_failed(max_retries)
                };
                if retry.is_empty() {
                    if let Err(e) = images.borrow().check_startup(0.0, f64::INFINITY, max_retries) {
                        show_asset_error(&e);
                    }
                }
                for id in retry {
                    log::warn!("Retrying image {}", id);
                    fetch_image(images.clone(), id, max_retries);
                }
            });
            img.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        img.set_src(&id);
    }

    /// Poll the cache once a second until it is ready or gives up
    fn schedule_startup_watchdog(images: Images, started_ms: f64, timeout_secs: f64, max_retries: u32) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move || {
            let (ready, status) = {
                let cache = images.borrow();
                let elapsed = (js_sys::Date::now() - started_ms) / 1000.0;
                (cache.is_ready(), cache.check_startup(elapsed, timeout_secs, max_retries))
            };
            match status {
                _ if ready => {}
                Ok(()) => schedule_startup_watchdog(images, started_ms, timeout_secs, max_retries),
                Err(e) => show_asset_error(&e),
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        );
        closure.forget();
    }

    fn show_asset_error(error: &AssetError) {
        log::error!("{}", error);
        if let Some(loading) = document().get_element_by_id("loading") {
            loading.set_text_content(Some(&format!("Could not start the game: {}", error)));
            let _ = loading.set_attribute("class", "error");
        }
    }

    fn push_action(game: &Rc<RefCell<Game>>, action: HostAction) {
        let mut g = game.borrow_mut();
        match action {
            HostAction::Game(command) => g.input.push(command),
            HostAction::ToggleMute => g.toggle_mute(),
        }
    }

    fn on_click(document: &Document, selector: &str, game: Rc<RefCell<Game>>, action: HostAction) {
        let Some(el) = document.query_selector(selector).ok().flatten() else {
            log::warn!("Missing control {}", selector);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            push_action(&game, action);
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let document = document();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(action) = map_key(&event.key()) {
                    push_action(&game, action);
                }
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // On-screen arrows and overlay buttons
        let advance = HostAction::Game(Command::Move(Direction::Advance));
        let retreat = HostAction::Game(Command::Move(Direction::Retreat));
        on_click(&document, "#arrow-right", game.clone(), advance);
        on_click(&document, "#arrow-left", game.clone(), retreat);
        on_click(&document, "#playGame", game.clone(), HostAction::Game(Command::Confirm));
        on_click(&document, "#tryAgain", game.clone(), HostAction::Game(Command::Confirm));
        on_click(&document, ".volume_controls", game, HostAction::ToggleMute);

        // Drop the shake class once its animation finishes
        if let Some(container) = document.get_element_by_id("canvas_container") {
            let target = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let _ = target.class_list().remove_1("anim--shake");
            });
            let _ = container
                .add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let document = document();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                g.clock.pause();
            } else {
                g.clock.resume();
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, images: Images) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, images, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, images: Images, time: f64) {
        game.borrow_mut().frame(time, &images.borrow());
        request_animation_frame(game, images);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Reciclus (native) starting...");
    log::info!("Native mode runs a headless session - build for wasm32 to play in the browser");

    headless::run_session(2024, 120.0);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted play without a browser: a simple bot chases the lowest item
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use reciclus::GameConfig;
    use reciclus::consts::CELL_WIDTH;
    use reciclus::hud::HudSnapshot;
    use reciclus::sim::{Command, Direction, GameState, TickInput, tick};

    const DT: f32 = 1.0 / 60.0;

    pub fn run_session(seed: u64, seconds: f32) {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        let mut state = GameState::new(config);
        let mut input = TickInput::default();
        input.push(Command::Confirm);

        let frames = (seconds / DT) as u32;
        for frame in 0..frames {
            if frame % 10 == 0 {
                if let Some(direction) = chase_item(&state) {
                    input.push(Command::Move(direction));
                }
            }

            tick(&mut state, &input, DT);
            input.clear();

            for event in state.drain_events() {
                log::info!("[{:>5}] {:?}", frame, event);
            }
            if state.is_game_over() {
                break;
            }
        }

        let hud = HudSnapshot::from_state(&state);
        println!(
            "{}",
            serde_json::to_string_pretty(&hud).unwrap_or_else(|e| e.to_string())
        );
    }

    fn chase_item(state: &GameState) -> Option<Direction> {
        let target = state
            .items
            .iter()
            .filter(|i| i.y < state.player.y)
            .max_by(|a, b| a.y.total_cmp(&b.y))?;
        let delta = (target.x - state.player.x) / CELL_WIDTH;
        match delta {
            d if d > 0 => Some(Direction::Advance),
            d if d < 0 => Some(Direction::Retreat),
            _ => None,
        }
    }
}
