//! Starquiz entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use starquiz::platform::{self, FetchLoader, PerformanceClock};
    use starquiz::renderer::RenderState;
    use starquiz::stage::{Director, HostRequest};
    use starquiz::{Settings, StartupError, Tuning};

    /// Everything the frame loop and the listeners share
    struct App {
        director: Director,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
        show_fps: bool,
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.director.frame(&mut self.render_state);
            self.serve_host_requests();

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                let fps = (60000.0 / (time - oldest)).round() as u32;
                if self.show_fps && self.frame_index == 0 && fps != self.fps {
                    log::info!("FPS: {}", fps);
                }
                self.fps = fps;
            }
        }

        fn serve_host_requests(&mut self) {
            for request in self.director.take_host_requests() {
                match request {
                    HostRequest::OpenLink(url) => platform::open_link(&url),
                }
            }
        }

        fn resize(&mut self) {
            let (width, height) = platform::fit_canvas(&self.canvas);
            self.director.resize(width, height, &mut self.render_state);
        }
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Starquiz starting...");

        let settings = Settings::load();
        let mut tuning = Tuning::default();
        settings.apply_to(&mut tuning);

        let canvas = platform::mount_canvas("canvas")?;
        let (width, height) = platform::fit_canvas(&canvas);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| StartupError::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        let director = Director::new(
            tuning,
            Box::new(FetchLoader),
            Box::new(PerformanceClock::new()),
            width,
            height,
        );

        let app = Rc::new(RefCell::new(App {
            director,
            render_state,
            canvas: canvas.clone(),
            show_fps: settings.show_fps,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        setup_pointer_handler(&canvas, app.clone());
        setup_resize_handler(app.clone());
        request_animation_frame(app);

        log::info!("Starquiz running!");
        Ok(())
    }

    /// Clicks are dispatched straight away: the browser only opens links
    /// from inside a user gesture, and no tick is running during an event
    fn setup_pointer_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut a = app.borrow_mut();
            let ndc = platform::pointer_to_ndc(
                event.offset_x() as f32,
                event.offset_y() as f32,
                a.canvas.client_width() as f32,
                a.canvas.client_height() as f32,
            );
            a.director.dispatch_click_ndc(ndc);
            a.serve_host_requests();
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use glam::Vec2;
    use starquiz::assets::ImmediateLoader;
    use starquiz::renderer::tessellate;
    use starquiz::scene::{Camera, NodeId, SceneGraph};
    use starquiz::stage::{Director, Focus, MascotState, QuizPhase, RenderSurface};
    use starquiz::{ManualClock, Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: usize = 3000;

    /// Counts what would have been drawn
    #[derive(Default)]
    struct HeadlessSurface {
        frames: usize,
        triangles: usize,
    }

    impl RenderSurface for HeadlessSurface {
        fn render(&mut self, scene: &SceneGraph, camera: &Camera) {
            self.frames += 1;
            self.triangles = tessellate(scene, camera).len() / 3;
        }

        fn resize(&mut self, width: u32, height: u32) {
            log::debug!("Headless surface resized to {}x{}", width, height);
        }
    }

    struct Session {
        director: Director,
        clock: Rc<ManualClock>,
        surface: HeadlessSurface,
    }

    impl Session {
        fn frame(&mut self) {
            self.clock.advance(FRAME_MS);
            self.director.frame(&mut self.surface);
        }

        fn run_until(&mut self, what: &str, done: impl Fn(&Director) -> bool) -> bool {
            for _ in 0..MAX_FRAMES {
                if done(&self.director) {
                    log::info!("{} after {} frames", what, self.surface.frames);
                    return true;
                }
                self.frame();
            }
            log::warn!("Gave up waiting for: {}", what);
            false
        }

        /// Queue a click on the center of a node, as the browser would
        fn click(&mut self, node: Option<NodeId>) {
            let Some(pos) = node.and_then(|n| self.director.scene().world_position(n)) else {
                log::warn!("Nothing to click");
                return;
            };
            let ndc = self.director.camera().view_proj().project_point3(pos);
            self.director.queue_click(Vec2::new(ndc.x, ndc.y));
            self.frame();
        }
    }

    fn load_tuning() -> Tuning {
        let Some(path) = std::env::args().nth(1) else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path).map(|json| Tuning::from_json(&json)) {
            Ok(Ok(tuning)) => {
                log::info!("Tuning loaded from {}", path);
                tuning
            }
            Ok(Err(e)) => {
                log::warn!("Ignoring {}: {}", path, e);
                Tuning::default()
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// One scripted visit: start, answer, go back
    pub fn run() {
        let mut tuning = load_tuning();
        Settings::load().apply_to(&mut tuning);

        let clock = Rc::new(ManualClock::new(0.0));
        let director = Director::new(
            tuning,
            Box::new(ImmediateLoader::default()),
            Box::new(clock.clone()),
            1280,
            720,
        );
        let mut s = Session {
            director,
            clock,
            surface: HeadlessSurface::default(),
        };

        s.run_until("Start button revealed", |d| d.landing().button_moving());
        s.click(s.director.landing().button());
        s.run_until("Quiz focused", |d| d.focus() == Focus::Quiz);
        s.run_until("Intro typed", |d| d.quiz().phase() == QuizPhase::AwaitingNext);
        s.run_until("Mascot idle", |d| d.mascot().state() == MascotState::Idle);

        s.click(s.director.quiz().next_button());
        s.click(s.director.quiz().option(0));
        log::info!("Quiz phase: {:?}", s.director.quiz().phase());

        s.click(s.director.quiz().back_button());
        s.run_until("Landing focused", |d| d.focus() == Focus::Landing);
        s.run_until("Mascot gone", |d| !d.mascot().is_present());

        println!(
            "Headless session: {} frames, {} triangles in the last frame, focus {:?}",
            s.surface.frames,
            s.surface.triangles,
            s.director.focus()
        );
        s.director.shutdown();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Starquiz (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
