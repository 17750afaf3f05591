//! Mini Breakout entry point
//!
//! The browser build drives the game from `requestAnimationFrame` and renders
//! with WebGPU. The native build has no window; it plays a headless autopilot
//! demo and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use mini_breakout::consts::HEADLESS_DT;
    use mini_breakout::renderer::{QuadBatch, RenderError, RenderState, draw_scene};
    use mini_breakout::sim::{Key, KeyInput, KeyState, LevelLayout};
    use mini_breakout::{Autopilot, FrameStatus, Game, Tuning};

    /// Browser-side state around the platform-independent [`Game`]
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        keys: KeyState,
        /// Demo mode, toggled with `I`
        autopilot: Option<Autopilot>,
        last_time: f64,
        batch: QuadBatch,
    }

    impl App {
        fn new(game: Game) -> Self {
            Self {
                game,
                render_state: None,
                keys: KeyState::new(),
                autopilot: None,
                last_time: 0.0,
                batch: QuadBatch::new(),
            }
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot = match self.autopilot {
                Some(_) => None,
                None => Some(Autopilot::default()),
            };
            log::info!(
                "Autopilot {}",
                if self.autopilot.is_some() { "on" } else { "off" }
            );
        }

        /// Simulate one frame
        fn update(&mut self, dt: f32) -> FrameStatus {
            let report = match self.autopilot {
                Some(pilot) => {
                    let mut keys = pilot.keys(&self.game.state, self.game.stats().frames);
                    // Quit still belongs to the player
                    keys.set(Key::Quit, self.keys.is_key_down(Key::Quit));
                    self.game.frame(&keys, dt)
                }
                None => self.game.frame(&self.keys, dt),
            };
            report.status
        }

        /// Render the current frame
        fn render(&mut self) {
            self.batch.clear();
            draw_scene(&self.game.state, &mut self.batch);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }
    }

    fn js_error(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Mini Breakout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #canvas is not a canvas")?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let tuning = Tuning::default();
        let field = tuning.field_size();
        let layout = LevelLayout::from_tuning(&tuning);
        let app = Rc::new(RefCell::new(App::new(
            Game::new(tuning, layout).map_err(js_error)?,
        )));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(RenderError::from)
            .map_err(js_error)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(RenderError::from)
            .map_err(js_error)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, field)
            .await
            .map_err(js_error)?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, app.clone());

        request_animation_frame(app);

        log::info!("Mini Breakout running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let name = event.key();
                if name == "i" || name == "I" {
                    if !event.repeat() {
                        app.borrow_mut().toggle_autopilot();
                    }
                    return;
                }
                if let Some(key) = Key::from_key_name(&name) {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                    app.borrow_mut().keys.press(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_key_name(&event.key()) {
                    app.borrow_mut().keys.release(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events are never delivered, so drop everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().keys.clear();
                log::info!("Window lost focus, keys released");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window, stopping game loop");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                HEADLESS_DT
            };
            a.last_time = time;

            if a.update(dt) == FrameStatus::Quit {
                let stats = a.game.stats();
                log::info!(
                    "Quit after {} frames: level {}, {} bricks destroyed, {} balls lost",
                    stats.frames,
                    stats.level,
                    stats.bricks_destroyed,
                    stats.balls_lost
                );
                return;
            }
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};

    use thiserror::Error;

    use mini_breakout::consts::HEADLESS_DT;
    use mini_breakout::sim::{LevelError, LevelLayout};
    use mini_breakout::{Autopilot, FrameStatus, Game, Tuning, TuningError};

    /// Two minutes of play at 60 Hz
    const DEMO_FRAMES: u64 = 60 * 60 * 2;
    /// Progress line every ten seconds of game time
    const REPORT_EVERY: u64 = 600;

    #[derive(Debug, Error)]
    pub enum DemoError {
        #[error("failed to read {path:?}: {source}")]
        Read {
            path: PathBuf,
            source: std::io::Error,
        },

        #[error("invalid tuning: {0}")]
        Tuning(#[from] TuningError),

        #[error("invalid level layout: {0}")]
        Level(#[from] LevelError),
    }

    fn read(path: &Path) -> Result<String, DemoError> {
        std::fs::read_to_string(path).map_err(|source| DemoError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Usage: `mini-breakout [TUNING.json] [LAYOUT.txt]`
    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), DemoError> {
        let tuning = match args.next() {
            Some(path) => {
                let tuning = Tuning::from_json(&read(Path::new(&path))?)?;
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            None => Tuning::default(),
        };
        log::debug!("Effective tuning: {}", tuning.to_json()?);
        let layout = match args.next() {
            Some(path) => {
                let layout = LevelLayout::parse(&read(Path::new(&path))?)?;
                log::info!(
                    "Loaded {}x{} layout from {}",
                    layout.row_count(),
                    layout.col_count(),
                    path
                );
                layout
            }
            None => LevelLayout::from_tuning(&tuning),
        };

        let mut game = Game::new(tuning, layout)?;
        let pilot = Autopilot::default();

        log::info!("=== Starting headless demo ===");
        log::info!("Running {} frames...", DEMO_FRAMES);

        for _ in 0..DEMO_FRAMES {
            let keys = pilot.keys(&game.state, game.stats().frames);
            if game.frame(&keys, HEADLESS_DT).status == FrameStatus::Quit {
                break;
            }

            let stats = game.stats();
            if stats.frames % REPORT_EVERY == 0 {
                log::info!(
                    "t={:.0}s level {} | {} bricks left | {} destroyed | {} balls lost",
                    stats.frames as f32 * HEADLESS_DT,
                    stats.level,
                    game.state.bricks_remaining(),
                    stats.bricks_destroyed,
                    stats.balls_lost
                );
            }
        }

        let stats = game.stats();
        log::info!("=== Demo complete ===");
        log::info!("Frames: {}", stats.frames);
        log::info!("Level reached: {}", stats.level);
        log::info!("Bricks destroyed: {}", stats.bricks_destroyed);
        log::info!("Balls lost: {}", stats.balls_lost);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Mini Breakout (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    match headless::run(std::env::args().skip(1)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
