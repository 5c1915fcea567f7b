//! Platform abstraction layer
//!
//! Everything the screens need from the browser is injected:
//! - `Scheduler`: wall clock, one-shot and repeating timers, the frame loop
//! - `KeyValueStore`: per-origin storage (LocalStorage on web)
//! - `Navigator`: full-page redirects
//! - `SoundSink`: sound effects
//!
//! `manual` holds deterministic implementations (tests, native preview),
//! `web` the browser ones.

pub mod manual;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::rc::Rc;

/// Handle returned by every `Scheduler` registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

/// Clock + timer capability
///
/// Callbacks run one at a time on the UI thread. A task may register or
/// cancel other tasks (including itself) while it runs.
pub trait Scheduler {
    /// Wall-clock milliseconds since the Unix epoch
    fn now_ms(&self) -> f64;

    /// Run `task` once after `delay_ms`
    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId;

    /// Run `task` every `period_ms` until cancelled
    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId;

    /// Run `task` once per display frame until cancelled.
    /// The argument is the frame timestamp in milliseconds.
    fn every_frame(&self, task: Box<dyn FnMut(f64)>) -> TaskId;

    /// Cancel a registration. Unknown or finished ids are ignored.
    fn cancel(&self, id: TaskId);
}

/// Per-origin string storage
pub trait KeyValueStore {
    /// `None` when the key is missing or storage is unavailable
    fn get(&self, key: &str) -> Option<String>;
    /// Failures are logged by the implementation, never surfaced
    fn set(&self, key: &str, value: &str);
}

/// Full-page navigation
pub trait Navigator {
    /// History-replacing redirect (the current page is not kept in history)
    fn redirect(&self, url: &str);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Confetti cannon fired
    ConfettiPop,
    /// Firework burst
    FireworkBang,
    /// Curtains open
    Fanfare,
}

pub trait SoundSink {
    fn play(&self, effect: SoundEffect);
    /// Unlock output after a user gesture
    fn resume(&self) {}
}

/// The capabilities a screen is mounted with
#[derive(Clone)]
pub struct Platform {
    pub scheduler: Rc<dyn Scheduler>,
    pub store: Rc<dyn KeyValueStore>,
    pub navigator: Rc<dyn Navigator>,
    pub sound: Rc<dyn SoundSink>,
}

/// Registrations owned by one screen, cancelled together on teardown
pub struct TaskSet {
    scheduler: Rc<dyn Scheduler>,
    ids: Vec<TaskId>,
}

impl TaskSet {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            ids: Vec::new(),
        }
    }

    pub fn after(&mut self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.scheduler.after(delay_ms, task);
        self.ids.push(id);
        id
    }

    pub fn every(&mut self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId {
        let id = self.scheduler.every(period_ms, task);
        self.ids.push(id);
        id
    }

    pub fn every_frame(&mut self, task: Box<dyn FnMut(f64)>) -> TaskId {
        let id = self.scheduler.every_frame(task);
        self.ids.push(id);
        id
    }

    pub fn cancel(&mut self, id: TaskId) {
        self.scheduler.cancel(id);
        self.ids.retain(|&held| held != id);
    }

    pub fn cancel_all(&mut self) {
        for id in self.ids.drain(..) {
            self.scheduler.cancel(id);
        }
    }

    /// Number of registrations still held (finished one-shots included)
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
