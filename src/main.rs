//! Launch Countdown entry point
//!
//! The web build mounts the page into `index.html`. The native build runs a
//! headless preview of the whole flow against virtual time.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use launch_countdown::audio::AudioManager;
    use launch_countdown::dom::{DomFrontend, get_el, on_click};
    use launch_countdown::platform::Platform;
    use launch_countdown::platform::web::{BrowserScheduler, LocalStore, WindowNavigator};
    use launch_countdown::{App, LaunchConfig};

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Launch Countdown starting...");

        // Hide loading indicator
        if let Some(loading) = get_el("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let config = LaunchConfig::load();
        let frontend = Rc::new(DomFrontend::new(&config));
        let platform = Platform {
            scheduler: Rc::new(BrowserScheduler::new()),
            store: Rc::new(LocalStore),
            navigator: Rc::new(WindowNavigator),
            sound: Rc::new(AudioManager::new()),
        };

        let seed = js_sys::Date::now() as u64;
        let app = App::start(config, platform, frontend, seed);
        if app.view().is_none() {
            return;
        }

        setup_controls(&app);
        setup_resize(app);
        log::info!("Launch Countdown running!");
    }

    fn setup_controls(app: &App) {
        let a = app.clone();
        on_click("enter-btn", move || {
            a.enter();
        });
        let a = app.clone();
        on_click("info-dismiss", move || a.dismiss_info());
        let a = app.clone();
        on_click("pause-btn", move || {
            a.toggle_pause();
        });
        let a = app.clone();
        on_click("sound-btn", move || {
            a.toggle_sound();
        });
        let a = app.clone();
        on_click("go-now-btn", move || {
            a.go_now();
        });
    }

    fn setup_resize(app: App) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::rc::Rc;

    use glam::Vec2;
    use launch_countdown::platform::Platform;
    use launch_countdown::platform::manual::{
        ManualScheduler, ManualSurface, MemoryStore, RecordingNavigator, SoundLog,
    };
    use launch_countdown::gate::{GateView, LaunchGate};
    use launch_countdown::renderer::Surface;
    use launch_countdown::show::{ShowState, ShowView};
    use launch_countdown::{App, Frontend, LaunchConfig, View};

    /// Seconds between now and the rebased launch
    const LEAD_SECS: i64 = 5;

    struct LogGate;

    impl GateView for LogGate {
        fn render(&self, gate: &LaunchGate) {
            log::info!("[gate] {} {}", gate.headline(), gate.countdown_text());
        }
    }

    struct LogShow;

    impl ShowView for LogShow {
        fn render(&self, show: &ShowState) {
            log::info!(
                "[show] curtains {} | {} confetti, {} sparks | leaving in {}s",
                if show.curtains_closed() { "closed" } else { "open" },
                show.confetti.len(),
                show.spark_count(),
                show.seconds_left()
            );
        }
    }

    struct Headless {
        surface: ManualSurface,
    }

    impl Frontend for Headless {
        fn gate_view(&self) -> Rc<dyn GateView> {
            Rc::new(LogGate)
        }

        fn show_view(&self) -> Rc<dyn ShowView> {
            Rc::new(LogShow)
        }

        fn surface(&self) -> Option<Box<dyn Surface>> {
            Some(Box::new(self.surface.clone()))
        }

        fn present(&self, view: View) {
            log::info!("Presenting {:?}", view);
        }
    }

    pub fn run(config: LaunchConfig) {
        let start_ms = chrono::Utc::now().timestamp_millis();
        let config = config.with_launch_at_ms(start_ms + LEAD_SECS * 1000);

        let scheduler = Rc::new(ManualScheduler::new(start_ms as f64));
        let navigator = Rc::new(RecordingNavigator::default());
        let surface = ManualSurface::new(Vec2::new(1280.0, 720.0));
        let platform = Platform {
            scheduler: scheduler.clone(),
            store: Rc::new(MemoryStore::new()),
            navigator: navigator.clone(),
            sound: Rc::new(SoundLog::default()),
        };
        let exit_delay_ms = config.exit_delay_ms as f64;
        let frontend = Rc::new(Headless {
            surface: surface.clone(),
        });

        let app = App::start(config, platform, frontend, start_ms as u64);

        scheduler.advance((LEAD_SECS * 1000) as f64);
        if !app.enter() {
            log::warn!("Gate did not open");
            return;
        }
        scheduler.advance(exit_delay_ms);

        // Run the celebration at 60 fps until it redirects
        while navigator.count() == 0 && app.view() == Some(View::Celebration) {
            scheduler.run_frames(60);
        }

        let log = surface.log();
        log::info!(
            "Preview done: {} frames, {} fills, {} resizes, redirected to {:?}",
            scheduler.frames_dispatched(),
            surface.fills(),
            log.resizes,
            navigator.redirects()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Launch Countdown (native preview) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => launch_countdown::LaunchConfig::from_path_or_default(path),
        None => launch_countdown::LaunchConfig::default(),
    };

    preview::run(config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
