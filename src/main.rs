//! Data Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, KeyboardEvent, TouchEvent};

    use data_runner::audio::AudioManager;
    use data_runner::best_score::{BestScoreStore, LocalStorageStore, record_run};
    use data_runner::platform::{Action, InputSource, action_for_source, fit_canvas};
    use data_runner::renderer::{CanvasRenderer, Sprite};
    use data_runner::settings::Settings;
    use data_runner::sim::{GameEvent, GameState, TickInput, Viewport, seeded_rng, tick};
    use rand_pcg::Pcg32;

    const PLAYER_SPRITE: &str = "char.png";
    const FLYING_OBSTACLE_SPRITE: &str = "fireblast.png";

    /// DOM elements mirrored from game state
    struct Hud {
        score: Option<Element>,
        level: Option<Element>,
        best: Option<Element>,
        final_score: Option<Element>,
        level_reached: Option<Element>,
        start_screen: Option<HtmlElement>,
        game_over_screen: Option<HtmlElement>,
        music_btn: Option<Element>,
        sfx_btn: Option<Element>,
    }

    impl Hud {
        fn new(document: &Document) -> Self {
            let html = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            };
            Self {
                score: document.get_element_by_id("scoreDisplay"),
                level: document.get_element_by_id("levelDisplay"),
                best: document.get_element_by_id("bestScore"),
                final_score: document.get_element_by_id("finalScore"),
                level_reached: document.get_element_by_id("levelReached"),
                start_screen: html("startScreen"),
                game_over_screen: html("gameOverScreen"),
                music_btn: document.get_element_by_id("musicBtn"),
                sfx_btn: document.get_element_by_id("sfxBtn"),
            }
        }

        fn set_text(el: &Option<Element>, text: &str) {
            if let Some(el) = el {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(el: &Option<HtmlElement>, visible: bool) {
            if let Some(el) = el {
                let display = if visible { "block" } else { "none" };
                let _ = el.style().set_property("display", display);
            }
        }

        fn set_toggle(el: &Option<Element>, on: bool, on_label: &str, off_label: &str) {
            if let Some(el) = el {
                let _ = el.class_list().toggle_with_force("muted", !on);
                el.set_text_content(Some(if on { on_label } else { off_label }));
            }
        }

        fn show_music(&self, on: bool) {
            Self::set_toggle(&self.music_btn, on, "🎵", "🔇");
        }

        fn show_sfx(&self, on: bool) {
            Self::set_toggle(&self.sfx_btn, on, "🔊", "🔈");
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        input: TickInput,
        audio: AudioManager,
        renderer: CanvasRenderer,
        store: LocalStorageStore,
        settings: Settings,
        hud: Hud,
        /// An animation frame is scheduled
        looping: bool,
    }

    impl Game {
        /// Size the canvas to its container and the window
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let window_height = window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0) as f32;
            let container_width = self
                .renderer
                .canvas()
                .parent_element()
                .map(|p| p.client_width() as f32)
                .unwrap_or(self.state.viewport.width);

            let fitted = fit_canvas(container_width, window_height);
            // The backing store only holds whole pixels
            let (width, height) = (fitted.width as u32, fitted.height as u32);
            self.renderer.resize(width, height);
            self.state.resize(Viewport::new(width as f32, height as f32));
        }

        /// Start or restart a run
        fn start(&mut self) {
            self.audio.init();
            Hud::set_visible(&self.hud.start_screen, false);
            Hud::set_visible(&self.hud.game_over_screen, false);

            self.fit_to_window();
            self.state.start();
            self.input = TickInput::default();

            Hud::set_text(&self.hud.score, &self.state.score.to_string());
            Hud::set_text(&self.hud.level, &self.state.level.to_string());
        }

        fn jump(&mut self) {
            if self.state.is_started() {
                self.input.jump = true;
            }
        }

        /// Run one simulation step and route its events
        fn update(&mut self) {
            let events = tick(&mut self.state, &self.input, &mut self.rng);
            self.input.jump = false;

            self.audio.play_events(&events);
            for event in &events {
                self.apply_event(event);
            }
        }

        fn apply_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ScoreChanged(score) => {
                    Hud::set_text(&self.hud.score, &score.to_string());
                }
                GameEvent::LevelUp { level, .. } => {
                    Hud::set_text(&self.hud.level, &level.to_string());
                }
                GameEvent::GameOver(summary) => {
                    if record_run(&mut self.store, summary) {
                        Hud::set_text(&self.hud.best, &summary.score.to_string());
                    }
                    Hud::set_text(&self.hud.final_score, &summary.final_score_text());
                    Hud::set_text(&self.hud.level_reached, &summary.level_reached_text());
                    Hud::set_visible(&self.hud.game_over_screen, true);
                }
                GameEvent::Jump | GameEvent::Collect | GameEvent::Crash => {}
            }
        }

        fn toggle_music(&mut self) {
            let on = self.settings.toggle_music();
            self.settings.save();
            self.audio.set_music_enabled(on);
            self.hud.show_music(on);
        }

        fn toggle_sfx(&mut self) {
            let on = self.settings.toggle_sfx();
            self.settings.save();
            self.audio.set_sfx_enabled(on);
            self.hud.show_sfx(on);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Data Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let player = Sprite::load(PLAYER_SPRITE).expect("Failed to create image");
        let flying = Sprite::load(FLYING_OBSTACLE_SPRITE).expect("Failed to create image");
        let renderer = CanvasRenderer::new(canvas.clone(), player.clone(), flying.clone())
            .expect("Failed to get 2d context");

        let store = LocalStorageStore;
        let best = store.load();
        let settings = Settings::load();

        let hud = Hud::new(&document);
        Hud::set_text(&hud.best, &best.to_string());
        hud.show_music(settings.music_enabled);
        hud.show_sfx(settings.sfx_enabled);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(Viewport::default(), best),
            rng: seeded_rng(seed),
            input: TickInput::default(),
            audio: AudioManager::new(settings.music_enabled, settings.sfx_enabled),
            renderer,
            store,
            settings,
            hud,
            looping: false,
        }));
        game.borrow_mut().fit_to_window();
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, &document, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game.clone());

        // Sprites fall back to shapes until decoded
        player.decoded().await;
        flying.decoded().await;

        log::info!("Data Runner ready!");
    }

    /// Apply the action an input maps to, if any
    fn on_input(game: &Rc<RefCell<Game>>, source: InputSource<'_>) -> Option<Action> {
        let action = action_for_source(source);
        if let Some(Action::Jump) = action {
            game.borrow_mut().jump();
        }
        action
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, document: &Document, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                on_input(&game, InputSource::Pointer);
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                on_input(&game, InputSource::Touch);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if on_input(&game, InputSource::Key(&code)).is_some() {
                    event.prevent_default();
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["startBtn", "restartBtn"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().start();
                start_loop(game.clone());
            });
        }

        {
            let game = game.clone();
            on_click(document, "musicBtn", move || game.borrow_mut().toggle_music());
        }
        on_click(document, "sfxBtn", move || game.borrow_mut().toggle_sfx());
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            // A finished run has no loop left to redraw it
            if g.state.is_over() {
                g.renderer.render(&g.state);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule frames unless a loop is already running
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One step and one frame while running; a last frame once over
    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            if g.state.is_started() {
                g.update();
            }
            g.renderer.render(&g.state);

            let running = g.state.is_started();
            g.looping = running;
            running
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless play for native builds
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use data_runner::audio::AudioManager;
    use data_runner::best_score::{BestScoreStore, record_run};
    use data_runner::settings::Settings;
    use data_runner::sim::{GameEvent, GameState, RunSummary, TickInput, Viewport, seeded_rng, tick};

    /// Steps of warning an obstacle gets before the autopilot jumps
    const JUMP_LEAD_STEPS: f32 = 12.0;

    /// Jump when grounded and a ground obstacle is about to reach the player
    pub fn wants_jump(state: &GameState) -> bool {
        if state.player.jumping {
            return false;
        }
        let front = state.player.pos.x + state.player.size.x;
        let reach = state.scroll_step() * JUMP_LEAD_STEPS;
        state.obstacles.iter().any(|o| {
            let gap = o.pos.x - front;
            (0.0..=reach).contains(&gap)
        })
    }

    /// Play one run on the reference canvas. `None` if it outlasted `max_steps`.
    pub fn run(seed: u64, store: &mut impl BestScoreStore, max_steps: u64) -> Option<RunSummary> {
        let settings = Settings::load();
        let mut audio = AudioManager::new(settings.music_enabled, settings.sfx_enabled);
        let mut rng = seeded_rng(seed);
        let mut state = GameState::new(Viewport::default(), store.load());

        audio.init();
        state.start();

        for _ in 0..max_steps {
            let input = TickInput {
                jump: wants_jump(&state),
            };
            let events = tick(&mut state, &input, &mut rng);
            audio.play_events(&events);

            for event in events {
                if let GameEvent::GameOver(summary) = event {
                    record_run(store, &summary);
                    return Some(summary);
                }
            }
        }
        None
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use data_runner::best_score::MemoryStore;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Data Runner (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut store = MemoryStore::new();

    match headless::run(seed, &mut store, 100_000) {
        Some(summary) => {
            println!("{}", summary.final_score_text());
            println!("{}", summary.level_reached_text());
        }
        None => println!("Autopilot survived the step limit"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
