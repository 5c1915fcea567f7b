//! Top-level composition: which screen is showing and where input goes

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::LaunchConfig;
use crate::gate::{GateMount, GateScreen, GateView, LaunchGate};
use crate::platform::Platform;
use crate::renderer::Surface;
use crate::show::{CelebrationScreen, ShowState, ShowView};

/// Which screen the page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Gate,
    Celebration,
}

/// Presentation layer the App mounts screens into
pub trait Frontend {
    fn gate_view(&self) -> Rc<dyn GateView>;
    fn show_view(&self) -> Rc<dyn ShowView>;
    /// Drawing surface for the celebration, if one can be created
    fn surface(&self) -> Option<Box<dyn Surface>>;
    /// Make `view` the visible screen
    fn present(&self, view: View);
}

enum Screen {
    Gate(GateScreen),
    Celebration(CelebrationScreen),
    /// Redirected away; nothing is mounted
    Left,
}

struct AppInner {
    config: Rc<LaunchConfig>,
    platform: Platform,
    frontend: Rc<dyn Frontend>,
    seed: u64,
    screen: Screen,
}

/// Page controller. Clones share the same page.
#[derive(Clone)]
pub struct App {
    inner: Rc<RefCell<AppInner>>,
}

impl App {
    /// Mount the launch gate, or redirect straight away if the visitor has
    /// already entered or the launch has passed
    pub fn start(
        config: LaunchConfig,
        platform: Platform,
        frontend: Rc<dyn Frontend>,
        seed: u64,
    ) -> Self {
        let config = Rc::new(config);
        let inner = Rc::new(RefCell::new(AppInner {
            config: config.clone(),
            platform: platform.clone(),
            frontend: frontend.clone(),
            seed,
            screen: Screen::Left,
        }));

        let weak = Rc::downgrade(&inner);
        let on_enter = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                App { inner }.promote();
            }
        });

        match GateScreen::mount(config, platform, frontend.gate_view(), on_enter) {
            GateMount::Redirected => {}
            GateMount::Mounted(gate) => {
                frontend.present(View::Gate);
                inner.borrow_mut().screen = Screen::Gate(gate);
            }
        }

        Self { inner }
    }

    /// Swap the gate for the celebration. No-op unless the gate is showing.
    pub fn promote(&self) {
        let gate = {
            let mut this = self.inner.borrow_mut();
            match std::mem::replace(&mut this.screen, Screen::Left) {
                Screen::Gate(gate) => gate,
                other => {
                    this.screen = other;
                    log::debug!("Promote ignored, gate not showing");
                    return;
                }
            }
        };
        gate.unmount();
        drop(gate);

        let (config, platform, frontend, seed) = {
            let this = self.inner.borrow();
            (
                this.config.clone(),
                this.platform.clone(),
                this.frontend.clone(),
                this.seed,
            )
        };

        frontend.present(View::Celebration);
        let screen = CelebrationScreen::mount(
            config,
            platform,
            frontend.show_view(),
            frontend.surface(),
            seed,
        );
        self.inner.borrow_mut().screen = Screen::Celebration(screen);
    }

    /// The mounted screen, `None` after a redirect on start
    pub fn view(&self) -> Option<View> {
        match self.inner.borrow().screen {
            Screen::Gate(_) => Some(View::Gate),
            Screen::Celebration(_) => Some(View::Celebration),
            Screen::Left => None,
        }
    }

    /// Entry button. Returns whether the entry was accepted.
    pub fn enter(&self) -> bool {
        match &self.inner.borrow().screen {
            Screen::Gate(gate) => gate.enter(),
            _ => false,
        }
    }

    pub fn dismiss_info(&self) {
        if let Screen::Gate(gate) = &self.inner.borrow().screen {
            gate.dismiss_info();
        }
    }

    /// Returns the new paused state, `None` if the celebration isn't showing
    pub fn toggle_pause(&self) -> Option<bool> {
        match &self.inner.borrow().screen {
            Screen::Celebration(show) => Some(show.toggle_pause()),
            _ => None,
        }
    }

    /// Returns the new sound setting, `None` if the celebration isn't showing
    pub fn toggle_sound(&self) -> Option<bool> {
        match &self.inner.borrow().screen {
            Screen::Celebration(show) => Some(show.toggle_sound()),
            _ => None,
        }
    }

    pub fn go_now(&self) -> bool {
        match &self.inner.borrow().screen {
            Screen::Celebration(show) => show.go_now(),
            _ => false,
        }
    }

    /// Window resized
    pub fn resize(&self) {
        if let Screen::Celebration(show) = &self.inner.borrow().screen {
            show.resize();
        }
    }

    /// Read the gate state, if the gate is showing
    pub fn with_gate<R>(&self, f: impl FnOnce(&LaunchGate) -> R) -> Option<R> {
        match &self.inner.borrow().screen {
            Screen::Gate(gate) => Some(f(&gate.gate())),
            _ => None,
        }
    }

    /// Read the celebration state, if it is showing
    pub fn with_show<R>(&self, f: impl FnOnce(&ShowState) -> R) -> Option<R> {
        match &self.inner.borrow().screen {
            Screen::Celebration(show) => Some(f(&show.show())),
            _ => None,
        }
    }
}
