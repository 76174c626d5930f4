//! Blockstep entry point
//!
//! On wasm32 this wires browser events into a session and drives it from
//! `requestAnimationFrame`, handing each frame's snapshot to the page's
//! renderer. Natively it runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use blockstep::persistence::LocalStorage;
    use blockstep::session::{ExpeditionSession, Session};
    use blockstep::{Error, ExpeditionConfig, RunnerConfig};

    const CANVAS_ID: &str = "game-canvas";

    // Frames are handed to whatever renderer the page registers
    #[wasm_bindgen(inline_js = "
        export function publish_frame(json) {
            if (typeof window.blockstepRender === 'function') {
                window.blockstepRender(json);
            }
        }
    ")]
    extern "C" {
        fn publish_frame(json: &str);
    }

    enum Game {
        Runner(Session<LocalStorage>),
        Expedition(ExpeditionSession<LocalStorage>),
    }

    impl Game {
        fn new(kind: &str, seed: u64) -> Self {
            match kind {
                "expedition" => Game::Expedition(ExpeditionSession::new(
                    ExpeditionConfig::default(),
                    seed,
                    LocalStorage,
                )),
                _ => Game::Runner(Session::new(RunnerConfig::default(), seed, LocalStorage)),
            }
        }

        /// Advance one frame; returns snapshot JSON plus HUD values
        fn frame(&mut self, time: f64) -> (String, u32, u32) {
            match self {
                Game::Runner(session) => {
                    let snap = session.frame(time);
                    (snap.to_json(), snap.distance, snap.best)
                }
                Game::Expedition(session) => {
                    let snap = session.frame(time);
                    (snap.to_json(), snap.score, snap.best)
                }
            }
        }

        fn key_down(&mut self, code: &str, repeat: bool) -> bool {
            match self {
                Game::Runner(session) => session.key_down(code, repeat),
                Game::Expedition(session) => session.key_down(code, repeat),
            }
        }

        fn key_up(&mut self, code: &str) {
            match self {
                Game::Runner(session) => session.key_up(code),
                Game::Expedition(session) => session.key_up(code),
            }
        }

        fn pointer_down(&mut self, time: f64) {
            match self {
                Game::Runner(session) => session.pointer_down(time),
                Game::Expedition(session) => session.pointer_down(time),
            }
        }

        fn blur(&mut self) {
            match self {
                Game::Runner(session) => session.blur(),
                Game::Expedition(session) => session.blur(),
            }
        }
    }

    fn missing(what: &str) -> JsValue {
        JsValue::from_str(&Error::MissingElement(what.to_string()).to_string())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Blockstep starting...");

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;

        // The canvas is the one element we cannot run without
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| missing(&format!("#{CANVAS_ID}")))?
            .dyn_into()
            .map_err(|_| missing(&format!("#{CANVAS_ID} as <canvas>")))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let kind = canvas
            .get_attribute("data-game")
            .unwrap_or_else(|| "runner".to_string());
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(&kind, seed)));
        log::info!("Game '{kind}' initialized with seed: {seed}");

        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(&document, game.clone());

        request_animation_frame(game, document);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().key_down(&event.code(), event.repeat()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_up(&event.code());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer (mouse, touch and pen)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().pointer_down(event.time_stamp());
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().blur();
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().blur();
                log::info!("Auto-paused (window blur)");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, document: Document) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, document, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, document: Document, time: f64) {
        let (json, score, best) = game.borrow_mut().frame(time);
        publish_frame(&json);
        update_hud(&document, score, best);
        request_animation_frame(game, document);
    }

    /// HUD readouts are optional; absent elements are skipped
    fn update_hud(document: &Document, score: u32, best: u32) {
        if let Some(el) = document.get_element_by_id("score-value") {
            el.set_text_content(Some(&score.to_string()));
        }
        if let Some(el) = document.get_element_by_id("best-value") {
            el.set_text_content(Some(&best.to_string()));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> blockstep::Result<()> {
    use blockstep::RunnerConfig;
    use blockstep::persistence::FileStore;
    use blockstep::session::Session;
    use blockstep::sim::{GameEvent, RunPhase};

    env_logger::init();
    log::info!("Blockstep (native) starting headless autopilot demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => RunnerConfig::load(std::path::Path::new(&path))?,
        None => RunnerConfig::default(),
    };

    const FRAMES: u32 = 60 * 120;
    const DT: f32 = 1.0 / 60.0;

    let store = FileStore::new(".blockstep");
    let mut session = Session::new(config, 0xB10C_57E9, store).with_autopilot(true);
    session.key_down("Enter", false);

    let mut checkpoints = 0;
    let mut respawns = 0;
    for _ in 0..FRAMES {
        let snap = session.step(DT);
        for event in &snap.events {
            match event {
                GameEvent::CheckpointBanked { .. } => checkpoints += 1,
                GameEvent::Respawned { .. } => respawns += 1,
                _ => {}
            }
        }
        if snap.phase == RunPhase::Over {
            break;
        }
    }

    let state = session.state();
    println!(
        "distance {} (max {}), best {}, {} checkpoints banked, {} respawns, {:.1}s",
        state.distance,
        state.max_distance,
        session.best(),
        checkpoints,
        respawns,
        state.elapsed
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
