//! Target Master entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use glam::Vec2;
    use target_master::audio::{AudioManager, SoundEffect};
    use target_master::consts::*;
    use target_master::leaderboard::{
        ConfiguredLeaderboard, DISPLAYED_ENTRIES, load_leaderboard, submit_score,
    };
    use target_master::platform::http::FetchTransport;
    use target_master::platform::iso_date_now;
    use target_master::platform::storage::BrowserStore;
    use target_master::renderer::CanvasRenderer;
    use target_master::sim::Viewport;
    use target_master::{Effect, Session, Settings};

    type Leaderboard = ConfiguredLeaderboard<FetchTransport>;

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        audio: AudioManager,
        store: Rc<BrowserStore>,
        leaderboard: Rc<Leaderboard>,
        fetch_limit: usize,
        accumulator: f32,
        last_time: f64,
        /// Pending requestAnimationFrame id
        frame_handle: Option<i32>,
        /// Page is being hidden; no further frames
        stopped: bool,
    }

    impl Game {
        /// Run simulation ticks, collecting the effects they raise
        fn update(&mut self, dt: f32) -> Vec<Effect> {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut effects = Vec::new();
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                effects.extend(self.session.update());
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            effects
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Err(e) = self.renderer.render(&self.session, time) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Target Master starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()?;
        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let store = Rc::new(BrowserStore::open());
        let settings = Settings::load(&*store);
        let fetch_limit = settings.leaderboard.fetch_limit;
        let leaderboard = Rc::new(ConfiguredLeaderboard::from_config(
            FetchTransport,
            settings.leaderboard.clone(),
        ));

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, Viewport::new(width, height), settings);
        log::info!("Session initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer: CanvasRenderer::new(&canvas)?,
            audio: AudioManager::new(),
            store,
            leaderboard,
            fetch_limit,
            accumulator: 0.0,
            last_time: 0.0,
            frame_handle: None,
            stopped: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_page_lifecycle(game.clone());

        // Populate the leaderboard screen in the background
        refresh_leaderboard(&game);

        request_animation_frame(game);

        log::info!("Target Master running!");
        Ok(())
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        (w as f32, h as f32)
    }

    /// Carry out effects raised by the session
    ///
    /// Must be called without an outstanding borrow of `game`.
    fn dispatch(game: &Rc<RefCell<Game>>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PlayGunshot => {
                    let g = game.borrow();
                    g.audio
                        .play(SoundEffect::Gunshot, g.session.settings.effective_volume());
                }
                Effect::SettingsChanged => {
                    let g = game.borrow();
                    if let Err(e) = g.session.settings.save(&*g.store) {
                        log::warn!("Failed to save settings: {}", e);
                    }
                }
                Effect::LoadLeaderboard => refresh_leaderboard(game),
                Effect::SubmitScore(submission) => {
                    let (client, store, limit) = handles(game);
                    let game = game.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        submit_score(&*client, &*store, submission, iso_date_now()).await;
                        let entries = load_leaderboard(&*client, &*store, limit).await;
                        game.borrow_mut().session.leaderboard_loaded(entries);
                    });
                }
                Effect::Exit => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.close();
                    }
                }
            }
        }
    }

    fn handles(game: &Rc<RefCell<Game>>) -> (Rc<Leaderboard>, Rc<BrowserStore>, usize) {
        let g = game.borrow();
        (g.leaderboard.clone(), g.store.clone(), g.fetch_limit)
    }

    fn refresh_leaderboard(game: &Rc<RefCell<Game>>) {
        let (client, store, limit) = handles(game);
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let entries = load_leaderboard(&*client, &*store, limit.max(DISPLAYED_ENTRIES)).await;
            game.borrow_mut().session.leaderboard_loaded(entries);
        });
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move aims
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().session.pointer_move(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click fires
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                game.borrow_mut().session.click(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard drives every screen
        {
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), " " | "ArrowUp" | "ArrowDown" | "Backspace") {
                    event.prevent_default();
                }
                let effects = game.borrow_mut().session.handle_key(&key);
                dispatch(&game, effects);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (w, h) = window_size(&window);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            let mut g = game.borrow_mut();
            g.session.resize(w, h);
            g.renderer.resize(w as f64, h as f64);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Stop the frame loop on pagehide, restart it when the page is shown again
    fn setup_page_lifecycle(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.stopped = true;
                if let Some(handle) = g.frame_handle.take() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.cancel_animation_frame(handle);
                    }
                }
                log::info!("Page hidden, frame loop stopped");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let resume = {
                    let mut g = game.borrow_mut();
                    let resume = g.stopped;
                    g.stopped = false;
                    g.last_time = 0.0;
                    resume
                };
                if resume {
                    log::info!("Page shown, frame loop resumed");
                    request_animation_frame(game.clone());
                }
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let next = game.clone();
        let callback = Closure::once_into_js(move |time: f64| {
            game_loop(next, time);
        });
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => game.borrow_mut().frame_handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let effects = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            if g.stopped {
                return;
            }

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let effects = g.update(dt);
            g.render(time);
            effects
        };

        dispatch(&game, effects);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Target Master (native) starting...");
    log::info!("The playable game is the web build - running a headless demo");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Seeded auto-aim run against in-memory storage and the offline client
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use futures_lite::future::block_on;

    use target_master::leaderboard::{
        DISPLAYED_ENTRIES, OfflineLeaderboard, load_leaderboard, submit_score,
    };
    use target_master::persistence::MemoryStore;
    use target_master::platform::iso_date_now;
    use target_master::sim::Viewport;
    use target_master::{Effect, Screen, Session, Settings};

    /// Ticks between auto-aimed shots
    const FIRE_INTERVAL: u32 = 20;
    /// Ten minutes of play
    const MAX_TICKS: u32 = 60 * 60 * 10;

    pub fn run(seed: u64) {
        let store = MemoryStore::new();
        let client = OfflineLeaderboard;
        let mut session = Session::new(seed, Viewport::default(), Settings::load(&store));

        session.handle_key("Enter");
        for c in "Demo".chars() {
            session.handle_key(&c.to_string());
        }
        session.handle_key("Enter");

        let mut ticks = 0;
        while session.screen == Screen::Playing && ticks < MAX_TICKS {
            ticks += 1;
            if ticks % FIRE_INTERVAL == 0 {
                let aim = session.game.as_ref().and_then(|game| {
                    game.targets
                        .iter()
                        .find(|t| !t.is_hit())
                        .map(|t| t.pos)
                });
                if let Some(aim) = aim {
                    session.click(aim);
                }
            }

            for effect in session.update() {
                if let Effect::SubmitScore(submission) = effect {
                    block_on(submit_score(&client, &store, submission, iso_date_now()));
                }
            }
        }

        if let Some(game) = &session.game {
            log::info!(
                "Demo finished after {} ticks: score {}, level {}, accuracy {}%",
                ticks,
                game.score,
                game.level,
                game.accuracy()
            );
        }

        println!("\nLeaderboard:");
        for (i, entry) in block_on(load_leaderboard(&client, &store, DISPLAYED_ENTRIES))
            .iter()
            .enumerate()
        {
            println!(
                "#{:<2} {:<20} {:>8}  L{:<3} {:>3}%",
                i + 1,
                entry.name,
                entry.score,
                entry.max_level,
                entry.accuracy
            );
        }
    }
}
