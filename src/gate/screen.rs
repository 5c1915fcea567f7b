//! Launch gate screen: wires `LaunchGate` to the scheduler, storage and view

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use super::state::{Admission, LaunchGate, admission};
use crate::config::{EntryAction, LaunchConfig};
use crate::consts::TICK_MS;
use crate::persistence::EntryFlag;
use crate::platform::{Platform, TaskId, TaskSet};

/// Presentation of the gate
pub trait GateView {
    /// Redraw from the current state
    fn render(&self, gate: &LaunchGate);
    /// Start the entry button's exit animation
    fn exit_animation(&self) {}
}

/// Outcome of mounting the gate
pub enum GateMount {
    /// The visitor was sent on without seeing the gate
    Redirected,
    Mounted(GateScreen),
}

struct Inner {
    gate: LaunchGate,
    config: Rc<LaunchConfig>,
    platform: Platform,
    view: Rc<dyn GateView>,
    tasks: TaskSet,
    countdown_task: Option<TaskId>,
    on_enter: Option<Box<dyn FnOnce()>>,
}

/// A mounted gate. Dropping it cancels its timers.
pub struct GateScreen {
    inner: Rc<RefCell<Inner>>,
}

impl GateScreen {
    /// Decide admission and, if the gate is shown, start the countdown.
    /// `on_enter` runs after the exit delay when the entry action is
    /// `Celebrate`.
    pub fn mount(
        config: Rc<LaunchConfig>,
        platform: Platform,
        view: Rc<dyn GateView>,
        on_enter: Box<dyn FnOnce()>,
    ) -> GateMount {
        let now_ms = platform.scheduler.now_ms() as i64;
        let launch_ms = config.launch_at_ms();
        let entered = EntryFlag::new(platform.store.as_ref(), &config.storage_key).is_set();

        if admission(now_ms, launch_ms, entered) == Admission::Redirect {
            log::info!(
                "Skipping gate ({}), redirecting",
                if entered { "already entered" } else { "already launched" }
            );
            platform.navigator.redirect(&config.redirect_url);
            return GateMount::Redirected;
        }

        let gate = LaunchGate::new(launch_ms, now_ms);
        view.render(&gate);
        log::info!("Gate mounted, {} to launch", gate.countdown());

        let inner = Rc::new(RefCell::new(Inner {
            gate,
            tasks: TaskSet::new(platform.scheduler.clone()),
            config,
            platform,
            view,
            countdown_task: None,
            on_enter: Some(on_enter),
        }));

        let weak = Rc::downgrade(&inner);
        let mut this = inner.borrow_mut();
        let id = this.tasks.every(
            TICK_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::tick(&inner);
                }
            }),
        );
        this.countdown_task = Some(id);
        drop(this);

        GateMount::Mounted(Self { inner })
    }

    /// Entry button click. Returns false (and does nothing) unless live.
    pub fn enter(&self) -> bool {
        let this = &mut *self.inner.borrow_mut();
        if !this.gate.request_entry() {
            log::debug!("Entry ignored, gate is not live");
            return false;
        }

        EntryFlag::new(this.platform.store.as_ref(), &this.config.storage_key).mark();
        this.view.exit_animation();
        this.view.render(&this.gate);

        let weak = Rc::downgrade(&self.inner);
        this.tasks.after(
            this.config.exit_delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::finish_entry(&inner);
                }
            }),
        );
        true
    }

    pub fn dismiss_info(&self) {
        let this = &mut *self.inner.borrow_mut();
        if this.gate.dismiss_info() {
            this.view.render(&this.gate);
        }
    }

    pub fn gate(&self) -> Ref<'_, LaunchGate> {
        Ref::map(self.inner.borrow(), |this| &this.gate)
    }

    /// Cancel every timer this screen owns
    pub fn unmount(&self) {
        if let Ok(mut this) = self.inner.try_borrow_mut() {
            this.tasks.cancel_all();
            this.countdown_task = None;
        }
    }
}

impl Drop for GateScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl Inner {
    fn tick(inner: &Rc<RefCell<Inner>>) {
        let this = &mut *inner.borrow_mut();
        let now_ms = this.platform.scheduler.now_ms() as i64;
        let went_live = this.gate.update(now_ms);
        this.view.render(&this.gate);

        if went_live {
            if let Some(id) = this.countdown_task.take() {
                this.tasks.cancel(id);
            }
        }
    }

    fn finish_entry(inner: &Rc<RefCell<Inner>>) {
        // Release the borrow before handing control away
        let (action, url, platform, on_enter) = {
            let mut this = inner.borrow_mut();
            (
                this.config.entry_action,
                this.config.redirect_url.clone(),
                this.platform.clone(),
                this.on_enter.take(),
            )
        };

        match action {
            EntryAction::Redirect => platform.navigator.redirect(&url),
            EntryAction::Celebrate => {
                if let Some(on_enter) = on_enter {
                    log::info!("Entry confirmed, starting celebration");
                    on_enter();
                }
            }
        }
    }
}
