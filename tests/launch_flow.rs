//! End-to-end page flows against virtual time

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use launch_countdown::gate::{GateView, LaunchGate};
use launch_countdown::platform::manual::{
    ManualScheduler, ManualSurface, MemoryStore, RecordingNavigator, SoundLog,
};
use launch_countdown::platform::{KeyValueStore, Platform};
use launch_countdown::renderer::Surface;
use launch_countdown::show::{ShowState, ShowView};
use launch_countdown::{App, EntryAction, Frontend, LaunchConfig, View};

const NOW: f64 = 1_763_000_000_000.0;

#[derive(Default)]
struct GateLog {
    lines: RefCell<Vec<String>>,
}

impl GateView for GateLog {
    fn render(&self, gate: &LaunchGate) {
        self.lines
            .borrow_mut()
            .push(format!("{} {}", gate.headline(), gate.countdown()));
    }
}

#[derive(Default)]
struct ShowLog {
    seconds: RefCell<Vec<u32>>,
}

impl ShowView for ShowLog {
    fn render(&self, show: &ShowState) {
        self.seconds.borrow_mut().push(show.seconds_left());
    }
}

struct TestFrontend {
    gate: Rc<GateLog>,
    show: Rc<ShowLog>,
    surface: ManualSurface,
}

impl Frontend for TestFrontend {
    fn gate_view(&self) -> Rc<dyn GateView> {
        self.gate.clone()
    }

    fn show_view(&self) -> Rc<dyn ShowView> {
        self.show.clone()
    }

    fn surface(&self) -> Option<Box<dyn Surface>> {
        Some(Box::new(self.surface.clone()))
    }

    fn present(&self, _view: View) {}
}

struct Page {
    app: App,
    scheduler: Rc<ManualScheduler>,
    store: Rc<MemoryStore>,
    navigator: Rc<RecordingNavigator>,
    frontend: Rc<TestFrontend>,
}

fn load(config: LaunchConfig, store: MemoryStore) -> Page {
    let scheduler = Rc::new(ManualScheduler::new(NOW));
    let store = Rc::new(store);
    let navigator = Rc::new(RecordingNavigator::default());
    let frontend = Rc::new(TestFrontend {
        gate: Rc::default(),
        show: Rc::default(),
        surface: ManualSurface::new(Vec2::new(1280.0, 720.0)),
    });
    let platform = Platform {
        scheduler: scheduler.clone(),
        store: store.clone(),
        navigator: navigator.clone(),
        sound: Rc::new(SoundLog::default()),
    };
    let app = App::start(config, platform, frontend.clone(), 2025);
    Page {
        app,
        scheduler,
        store,
        navigator,
        frontend,
    }
}

fn launch_in_five_seconds() -> LaunchConfig {
    LaunchConfig::default().with_launch_at_ms(NOW as i64 + 5_000)
}

#[test]
fn countdown_reaches_zero_and_entry_redirects_once() {
    let config = launch_in_five_seconds().with_entry_action(EntryAction::Redirect);
    let page = load(config, MemoryStore::new());

    page.scheduler.advance(5_000.0);
    let last = page.frontend.gate.lines.borrow().last().cloned();
    assert_eq!(last.as_deref(), Some("Launch Time! 0d 0h 0m 0s"));
    assert_eq!(page.app.with_gate(|gate| gate.entry_enabled()), Some(true));

    assert!(page.app.enter());
    assert_eq!(page.store.get("siteLaunched").as_deref(), Some("true"));
    page.scheduler.advance(1_600.0);
    assert_eq!(page.navigator.count(), 1);

    page.scheduler.advance(60_000.0);
    assert_eq!(page.navigator.count(), 1);
}

#[test]
fn returning_visitor_redirects_on_mount() {
    let store = MemoryStore::new().with_entry("siteLaunched", "true");
    let page = load(launch_in_five_seconds(), store);

    assert_eq!(page.navigator.count(), 1);
    assert!(page.frontend.gate.lines.borrow().is_empty());
    assert_eq!(page.app.view(), None);
}

#[test]
fn celebration_exits_after_three_ticks() {
    let mut config = launch_in_five_seconds();
    config.show.exit_countdown_secs = 3;
    let page = load(config, MemoryStore::new());

    page.scheduler.advance(5_000.0);
    assert!(page.app.enter());
    page.scheduler.advance(1_600.0);
    assert_eq!(page.app.view(), Some(View::Celebration));

    page.scheduler.advance(2_999.0);
    assert_eq!(page.navigator.count(), 0);
    page.scheduler.advance(1.0);
    assert_eq!(page.navigator.count(), 1);
    // Mount, three ticks, and the curtain reveal at 1.8 s
    assert_eq!(*page.frontend.show.seconds.borrow(), vec![3, 2, 2, 1, 0]);

    page.scheduler.run_frames(600);
    assert_eq!(page.navigator.count(), 1);
    assert_eq!(page.frontend.show.seconds.borrow().len(), 5);
}

#[test]
fn show_keeps_within_caps_and_drains() {
    let page = load(launch_in_five_seconds(), MemoryStore::new());
    page.scheduler.advance(5_000.0);
    page.app.enter();
    page.scheduler.advance(1_600.0);

    let mut peak = 0;
    for _ in 0..20 {
        page.scheduler.run_frames(60);
        let live = page.app.with_show(|show| show.confetti.len()).unwrap_or(0);
        peak = peak.max(live);
        assert!(live <= 2000);
    }
    assert!(peak >= 250);

    // Last burst at 14 s; everything has landed by 20 s
    let (confetti, fireworks) = page
        .app
        .with_show(|show| (show.confetti.len(), show.fireworks.len()))
        .unwrap_or_default();
    assert_eq!((confetti, fireworks), (0, 0));
    assert!(page.frontend.surface.fills() > 0);
}
