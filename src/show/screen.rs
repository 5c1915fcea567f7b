//! Celebration screen: schedules the show and drives the frame loop

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use glam::Vec2;

use super::state::{ExitTick, ShowState};
use crate::config::{FireworkCue, LaunchConfig};
use crate::consts::{FALLBACK_VIEWPORT, TICK_MS};
use crate::platform::{Platform, SoundEffect, TaskId, TaskSet};
use crate::renderer::{self, Surface};

/// DOM side of the celebration (curtains, controls, exit seconds)
pub trait ShowView {
    fn render(&self, show: &ShowState);
}

struct Inner {
    show: ShowState,
    config: Rc<LaunchConfig>,
    platform: Platform,
    view: Rc<dyn ShowView>,
    surface: Option<Box<dyn Surface>>,
    tasks: TaskSet,
    exit_task: Option<TaskId>,
    frame_task: Option<TaskId>,
}

/// A mounted celebration. Dropping it cancels its timers and frame loop.
pub struct CelebrationScreen {
    inner: Rc<RefCell<Inner>>,
}

impl CelebrationScreen {
    /// Start the show: curtain timer, exit countdown, burst schedule and
    /// the frame loop. Without a surface the simulation still runs against
    /// a fallback viewport.
    pub fn mount(
        config: Rc<LaunchConfig>,
        platform: Platform,
        view: Rc<dyn ShowView>,
        mut surface: Option<Box<dyn Surface>>,
        seed: u64,
    ) -> Self {
        let bounds = match surface.as_mut() {
            Some(surface) => surface.fit_to_viewport(),
            None => {
                log::warn!("No drawing surface, particles will not be drawn");
                Vec2::from(FALLBACK_VIEWPORT)
            }
        };
        let show = ShowState::new(&config.show, seed, bounds);
        view.render(&show);

        let curtain_ms = config.show.curtain_ms;
        let bursts = config.show.confetti.bursts_ms.clone();
        let cues = config.show.fireworks.cues.clone();

        let inner = Rc::new(RefCell::new(Inner {
            show,
            tasks: TaskSet::new(platform.scheduler.clone()),
            config,
            platform,
            view,
            surface,
            exit_task: None,
            frame_task: None,
        }));

        let mut this = inner.borrow_mut();

        let weak = Rc::downgrade(&inner);
        this.tasks.after(
            curtain_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().reveal();
                }
            }),
        );

        let weak = Rc::downgrade(&inner);
        let exit_task = this.tasks.every(
            TICK_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Inner::tick_exit(&inner);
                }
            }),
        );
        this.exit_task = Some(exit_task);

        for delay_ms in bursts {
            let weak = Rc::downgrade(&inner);
            this.tasks.after(
                delay_ms,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().fire_confetti();
                    }
                }),
            );
        }

        for cue in cues {
            let weak = Rc::downgrade(&inner);
            this.tasks.after(
                cue.delay_ms,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        inner.borrow_mut().launch_firework(&cue);
                    }
                }),
            );
        }

        let frame_task = this.tasks.every_frame(frame_callback(Rc::downgrade(&inner)));
        this.frame_task = Some(frame_task);
        log::info!(
            "Celebration mounted ({}x{}), leaving in {}s",
            bounds.x,
            bounds.y,
            this.show.seconds_left()
        );
        drop(this);

        Self { inner }
    }

    /// Freeze or resume the animation. Returns the new paused state.
    pub fn toggle_pause(&self) -> bool {
        let this = &mut *self.inner.borrow_mut();
        let paused = !this.show.is_paused();
        this.show.set_paused(paused);

        if paused {
            if let Some(id) = this.frame_task.take() {
                this.tasks.cancel(id);
            }
        } else if this.frame_task.is_none() {
            let id = this.tasks.every_frame(frame_callback(Rc::downgrade(&self.inner)));
            this.frame_task = Some(id);
        }

        log::debug!("Animation {}", if paused { "paused" } else { "resumed" });
        this.view.render(&this.show);
        paused
    }

    /// Flip sound on/off. Returns the new setting.
    pub fn toggle_sound(&self) -> bool {
        let this = &mut *self.inner.borrow_mut();
        let enabled = this.show.toggle_sound();
        if enabled {
            this.platform.sound.resume();
        }
        this.view.render(&this.show);
        enabled
    }

    /// Leave immediately. Returns false if the screen already left.
    pub fn go_now(&self) -> bool {
        let (url, platform) = {
            let this = &mut *self.inner.borrow_mut();
            if !this.show.request_exit() {
                return false;
            }
            if let Some(id) = this.exit_task.take() {
                this.tasks.cancel(id);
            }
            this.view.render(&this.show);
            (this.config.redirect_url.clone(), this.platform.clone())
        };
        log::info!("Leaving celebration early");
        platform.navigator.redirect(&url);
        true
    }

    /// Refit the canvas after a window resize and redraw without stepping
    pub fn resize(&self) {
        let this = &mut *self.inner.borrow_mut();
        let Some(surface) = this.surface.as_mut() else {
            return;
        };
        let bounds = surface.fit_to_viewport();
        this.show.set_bounds(bounds);
        renderer::draw(&this.show, surface.as_mut());
    }

    pub fn show(&self) -> Ref<'_, ShowState> {
        Ref::map(self.inner.borrow(), |this| &this.show)
    }

    /// Cancel every timer and the frame loop
    pub fn unmount(&self) {
        if let Ok(mut this) = self.inner.try_borrow_mut() {
            this.tasks.cancel_all();
            this.exit_task = None;
            this.frame_task = None;
        }
    }
}

impl Drop for CelebrationScreen {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn frame_callback(weak: Weak<RefCell<Inner>>) -> Box<dyn FnMut(f64)> {
    Box::new(move |time_ms| {
        if let Some(inner) = weak.upgrade() {
            inner.borrow_mut().frame(time_ms);
        }
    })
}

impl Inner {
    fn frame(&mut self, time_ms: f64) {
        if let Some(surface) = self.surface.as_mut() {
            self.show.set_bounds(surface.fit_to_viewport());
        }
        self.show.advance(time_ms);
        if let Some(surface) = self.surface.as_mut() {
            renderer::draw(&self.show, surface.as_mut());
        }
    }

    fn reveal(&mut self) {
        if self.show.reveal() {
            log::info!("Curtains open");
            if self.show.sound_enabled() {
                self.platform.sound.play(SoundEffect::Fanfare);
            }
            self.view.render(&self.show);
        }
    }

    fn fire_confetti(&mut self) {
        self.show.fire_confetti();
        if self.show.sound_enabled() {
            self.platform.sound.play(SoundEffect::ConfettiPop);
        }
    }

    fn launch_firework(&mut self, cue: &FireworkCue) {
        self.show.launch_firework(cue);
        if self.show.sound_enabled() {
            self.platform.sound.play(SoundEffect::FireworkBang);
        }
    }

    fn tick_exit(inner: &Rc<RefCell<Inner>>) {
        let redirect = {
            let this = &mut *inner.borrow_mut();
            let tick = this.show.tick_exit();
            if tick != ExitTick::Done {
                this.view.render(&this.show);
            }
            match tick {
                ExitTick::Counting(_) => None,
                ExitTick::Expired | ExitTick::Done => {
                    if let Some(id) = this.exit_task.take() {
                        this.tasks.cancel(id);
                    }
                    (tick == ExitTick::Expired)
                        .then(|| (this.config.redirect_url.clone(), this.platform.clone()))
                }
            }
        };

        if let Some((url, platform)) = redirect {
            log::info!("Exit countdown finished");
            platform.navigator.redirect(&url);
        }
    }
}
