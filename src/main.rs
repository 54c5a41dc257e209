//! Kitten Sweeper entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{KeyboardEvent, MouseEvent};

    use kitten_sweeper::Settings;
    use kitten_sweeper::audio::{AudioManager, Track};
    use kitten_sweeper::consts::*;
    use kitten_sweeper::net::{ApiCall, StateSync};
    use kitten_sweeper::platform::DomTargets;
    use kitten_sweeper::renderer::{BoardRenderer, StatusView};
    use kitten_sweeper::sim::{Cue, GameClient, GameSnapshot, Gesture, Ticket};

    /// Game instance holding all state
    struct Game {
        client: GameClient,
        sync: Rc<StateSync>,
        dom: DomTargets,
        audio: AudioManager,
        settings: Settings,
        renderer: BoardRenderer,
        last_time: f64,
        /// Last known pointer position (client coordinates), for the flag key
        pointer: Option<Vec2>,
        /// Board was translated last frame
        shaking: bool,
    }

    impl Game {
        /// Adopt a server response and redraw
        fn adopt(&mut self, ticket: Ticket, snapshot: GameSnapshot) {
            let Some(cues) = self.client.apply(ticket, snapshot) else {
                return;
            };
            self.redraw();
            self.run_cues(cues);
        }

        /// Rebuild the board and status panel from the held snapshot
        fn redraw(&mut self) {
            let Some(snapshot) = self.client.snapshot() else {
                return;
            };
            let list = self.renderer.render(snapshot, self.client.clock());
            let view = StatusView::from_snapshot(snapshot);

            if let Err(e) = self.dom.draw_board(&list, self.renderer.tile_size) {
                log::error!("Board render failed: {:?}", e);
            }
            self.dom.show_status(&view);
        }

        fn run_cues(&mut self, cues: Vec<Cue>) {
            for cue in cues {
                if self.audio.handle(cue) {
                    continue;
                }
                match cue {
                    Cue::ShowOverlay(outcome) => self.dom.show_overlay(outcome),
                    Cue::HideOverlay => self.dom.hide_overlay(),
                    _ => {}
                }
            }
        }

        /// Advance one frame; returns a time tick to send, if due
        fn update(&mut self, dt_ms: f64) -> Option<Ticket> {
            let report = self.client.frame(dt_ms);

            if report.frame_advanced {
                self.dom.refresh_kittens(self.client.clock());
            }

            // Keep writing the transform until the spring has come to rest
            let active = self.client.camera().active;
            if active || self.shaking {
                self.dom.set_offset(self.client.board_offset());
            }
            self.shaking = active;

            self.run_cues(report.cues);
            report.time_tick
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_muted();
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Muted: {}", muted);
        }
    }

    /// Send a request in the background and adopt the response when it lands
    fn dispatch(game: &Rc<RefCell<Game>>, ticket: Ticket) {
        let game = game.clone();
        let sync = game.borrow().sync.clone();
        spawn_local(async move {
            match sync.send(ticket.call()).await {
                Ok(snapshot) => game.borrow_mut().adopt(ticket, snapshot),
                Err(e) => log::error!(
                    "{} request #{} for game {} failed: {}",
                    ticket.call().name(),
                    ticket.seq(),
                    sync.game_id(),
                    e
                ),
            }
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Kitten Sweeper starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(dom) = DomTargets::locate(&document) else {
            log::error!("No #{} element on the page", kitten_sweeper::platform::dom::ids::BOARD);
            return;
        };
        let Some(game_id) = dom.game_id() else {
            log::error!("No game id on the page");
            return;
        };

        let settings = Settings::load();
        let mut client = GameClient::new(js_sys::Date::now() as u64);
        client.set_shake_enabled(settings.effective_screen_shake());
        let mut audio = AudioManager::new(&settings);
        audio.play_music(Track::Game);

        let game = Rc::new(RefCell::new(Game {
            client,
            sync: Rc::new(StateSync::new("", game_id.clone())),
            dom,
            audio,
            settings,
            renderer: BoardRenderer::new(TILE_SIZE),
            last_time: 0.0,
            pointer: None,
            shaking: false,
        }));

        log::info!("Game {} initialized", game_id);

        // Load initial game state
        let ticket = game.borrow_mut().client.issue(ApiCall::Fetch);
        dispatch(&game, ticket);

        setup_input_handlers(game.clone());
        setup_play_again(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Kitten Sweeper running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Pointer tracking for the flag key
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().pointer = Some(pos);
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Board click - reveal
        {
            let game = game.clone();
            let board = game.borrow().dom.board().clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let ticket = {
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.pointer = Some(pos);
                    let origin = g.dom.board_origin();
                    g.client.gesture(Gesture::Reveal(pos), origin)
                };
                if let Some(ticket) = ticket {
                    dispatch(&game, ticket);
                }
            });
            let _ = board.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - Space flags the hovered tile, M toggles mute
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        let ticket = {
                            let mut g = game.borrow_mut();
                            let Some(pos) = g.pointer else {
                                return;
                            };
                            let origin = g.dom.board_origin();
                            g.client.gesture(Gesture::Flag(pos), origin)
                        };
                        if let Some(ticket) = ticket {
                            dispatch(&game, ticket);
                        }
                    }
                    "KeyM" => game.borrow_mut().toggle_mute(),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_play_again(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id(kitten_sweeper::platform::dom::ids::PLAY_AGAIN) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let ticket = game.borrow_mut().client.issue(ApiCall::Reset);
                dispatch(&game, ticket);
                log::info!("Reset requested");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No play-again button on the page");
        }
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
        let time_tick = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt_ms)
        };

        if let Some(ticket) = time_tick {
            dispatch(&game, ticket);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Kitten Sweeper (native) starting...");
    log::info!("The client needs a browser - run with `trunk serve` for the web version");

    println!("\nReplaying a lost game headlessly...");
    replay_loss();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn replay_loss() {
    use kitten_sweeper::net::{ApiCall, decode_reply};
    use kitten_sweeper::sim::{Cue, GameClient};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    let body = |active: bool| {
        format!(
            r#"{{"gameActive": {}, "formattedTime": "0:42", "timeRemaining": 42,
                "board": {{"width": 3, "height": 3, "hasWon": false, "numKittens": 1,
                "tiles": [[{{"type": 0}}, {{"type": 0}}, {{"type": 0}}],
                          [{{"type": 0}}, {{"type": -4, "kittenValue": 4}}, {{"type": 0}}],
                          [{{"type": 0}}, {{"type": 0}}, {{"type": 0}}]]}}}}"#,
            active
        )
    };

    let mut client = GameClient::new(7);
    let ticket = client.issue(ApiCall::Fetch);
    let snapshot = decode_reply(200, &body(true)).expect("sample snapshot");
    client.apply(ticket, snapshot);

    let ticket = client.issue(ApiCall::Reveal { x: 1, y: 1 });
    let snapshot = decode_reply(200, &body(false)).expect("sample snapshot");
    let cues = client.apply(ticket, snapshot).unwrap_or_default();
    println!("  cues on game end: {:?}", cues);

    let mut frames = 0;
    let mut settled_at = None;
    loop {
        frames += 1;
        let report = client.frame(FRAME_MS);
        if settled_at.is_none() && !client.camera().active {
            settled_at = Some(frames);
        }
        if let Some(Cue::ShowOverlay(outcome)) = report.cues.first() {
            println!("  shake settled after {:?} frames", settled_at);
            println!("  overlay after {} frames: {}", frames, outcome.message());
            break;
        }
    }
    println!("✓ Replay finished");
}
