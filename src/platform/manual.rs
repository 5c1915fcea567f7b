//! Deterministic platform implementations
//!
//! Used by the test suite and the native preview. Time only moves when
//! `advance` or `run_frames` is called.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use glam::Vec2;

use super::{KeyValueStore, Navigator, Scheduler, SoundEffect, SoundSink, TaskId};
use crate::renderer::Surface;

/// Frame interval used by `run_frames` (60 Hz display)
pub const FRAME_MS: f64 = 1000.0 / 60.0;

enum TimerTask {
    Once(Box<dyn FnOnce()>),
    Repeat { period_ms: f64, task: Box<dyn FnMut()> },
}

struct Timer {
    due_ms: f64,
    task: TimerTask,
}

#[derive(Default)]
struct Queue {
    now_ms: f64,
    next_id: u64,
    timers: BTreeMap<u64, Timer>,
    frames: BTreeMap<u64, Box<dyn FnMut(f64)>>,
    /// Task currently executing (taken out of its map)
    running: Option<u64>,
    running_cancelled: bool,
    frames_dispatched: u64,
}

/// Virtual-time scheduler
///
/// Timers fire in due order (registration order breaks ties), matching the
/// browser's event loop. No borrow is held while a task runs.
#[derive(Default)]
pub struct ManualScheduler {
    queue: RefCell<Queue>,
}

impl ManualScheduler {
    pub fn new(start_ms: f64) -> Self {
        Self {
            queue: RefCell::new(Queue {
                now_ms: start_ms,
                ..Default::default()
            }),
        }
    }

    /// Move the clock forward, firing every timer that comes due
    pub fn advance(&self, ms: f64) {
        let target = self.queue.borrow().now_ms + ms.max(0.0);
        while let Some((id, due_ms)) = self.next_due(target) {
            let task = {
                let mut queue = self.queue.borrow_mut();
                queue.now_ms = due_ms;
                let Some(timer) = queue.timers.remove(&id) else {
                    continue;
                };
                queue.running = Some(id);
                queue.running_cancelled = false;
                timer.task
            };

            let rearm = match task {
                TimerTask::Once(task) => {
                    task();
                    None
                }
                TimerTask::Repeat {
                    period_ms,
                    mut task,
                } => {
                    task();
                    Some(TimerTask::Repeat { period_ms, task })
                }
            };

            let mut queue = self.queue.borrow_mut();
            let cancelled = queue.running_cancelled;
            queue.running = None;
            if let (Some(TimerTask::Repeat { period_ms, task }), false) = (rearm, cancelled) {
                queue.timers.insert(
                    id,
                    Timer {
                        due_ms: due_ms + period_ms,
                        task: TimerTask::Repeat { period_ms, task },
                    },
                );
            }
        }
        self.queue.borrow_mut().now_ms = target;
    }

    fn next_due(&self, target: f64) -> Option<(u64, f64)> {
        let queue = self.queue.borrow();
        queue
            .timers
            .iter()
            .filter(|(_, timer)| timer.due_ms <= target)
            .min_by(|(a_id, a), (b_id, b)| a.due_ms.total_cmp(&b.due_ms).then(a_id.cmp(b_id)))
            .map(|(&id, timer)| (id, timer.due_ms))
    }

    /// Advance one display frame at a time, dispatching frame callbacks after
    /// the frame's timers
    pub fn run_frames(&self, count: u32) {
        for _ in 0..count {
            self.advance(FRAME_MS);
            self.dispatch_frame();
        }
    }

    fn dispatch_frame(&self) {
        let (now_ms, ids) = {
            let mut queue = self.queue.borrow_mut();
            queue.frames_dispatched += 1;
            (queue.now_ms, queue.frames.keys().copied().collect::<Vec<_>>())
        };
        for id in ids {
            let task = {
                let mut queue = self.queue.borrow_mut();
                let Some(task) = queue.frames.remove(&id) else {
                    continue;
                };
                queue.running = Some(id);
                queue.running_cancelled = false;
                task
            };
            let mut task = task;
            task(now_ms);

            let mut queue = self.queue.borrow_mut();
            queue.running = None;
            if !queue.running_cancelled {
                queue.frames.insert(id, task);
            }
        }
    }

    /// Registered timers (one-shot and repeating) not yet fired or cancelled
    pub fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    /// Registered frame callbacks
    pub fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }

    pub fn frames_dispatched(&self) -> u64 {
        self.queue.borrow().frames_dispatched
    }

    fn register(&self, timer: Option<Timer>, frame: Option<Box<dyn FnMut(f64)>>) -> TaskId {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        if let Some(timer) = timer {
            queue.timers.insert(id, timer);
        }
        if let Some(frame) = frame {
            queue.frames.insert(id, frame);
        }
        TaskId(id)
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> f64 {
        self.queue.borrow().now_ms
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let due_ms = self.now_ms() + delay_ms as f64;
        self.register(
            Some(Timer {
                due_ms,
                task: TimerTask::Once(task),
            }),
            None,
        )
    }

    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId {
        // Browsers clamp zero-period intervals; never spin forever here
        let period_ms = (period_ms as f64).max(1.0);
        let due_ms = self.now_ms() + period_ms;
        self.register(
            Some(Timer {
                due_ms,
                task: TimerTask::Repeat { period_ms, task },
            }),
            None,
        )
    }

    fn every_frame(&self, task: Box<dyn FnMut(f64)>) -> TaskId {
        self.register(None, Some(task))
    }

    fn cancel(&self, id: TaskId) {
        let mut queue = self.queue.borrow_mut();
        let removed = queue.timers.remove(&id.0).is_some() || queue.frames.remove(&id.0).is_some();
        if !removed && queue.running == Some(id.0) {
            queue.running_cancelled = true;
        }
    }
}

/// In-memory key-value store
#[derive(Debug)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RefCell::default(),
            available: true,
        }
    }

    /// A store that behaves like disabled browser storage
    pub fn unavailable() -> Self {
        Self {
            entries: RefCell::default(),
            available: false,
        }
    }

    /// Pre-seed a value (e.g. a flag left by an earlier visit)
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        if !self.available {
            return None;
        }
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if !self.available {
            log::warn!("Storage unavailable, {} not saved", key);
            return;
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Navigator that records redirects instead of leaving the page
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.redirects.borrow().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, url: &str) {
        log::info!("Redirect -> {}", url);
        self.redirects.borrow_mut().push(url.to_string());
    }
}

/// Sound sink that records requested effects
#[derive(Debug, Default)]
pub struct SoundLog {
    played: RefCell<Vec<SoundEffect>>,
    resumed: Cell<u32>,
}

impl SoundLog {
    pub fn played(&self) -> Vec<SoundEffect> {
        self.played.borrow().clone()
    }

    pub fn resumed(&self) -> u32 {
        self.resumed.get()
    }
}

impl SoundSink for SoundLog {
    fn play(&self, effect: SoundEffect) {
        log::debug!("Sound: {:?}", effect);
        self.played.borrow_mut().push(effect);
    }

    fn resume(&self) {
        self.resumed.set(self.resumed.get() + 1);
    }
}

/// Draw-call counters collected by `ManualSurface`
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    /// Simulated window size
    pub viewport: Vec2,
    /// Current backing-store size
    pub size: Vec2,
    pub resizes: u32,
    pub clears: u32,
    pub rects: u32,
    pub circles: u32,
    pub polygons: u32,
    pub glyphs: u32,
    /// Saves minus restores; zero after a balanced frame
    pub depth: i32,
}

/// Headless drawing surface. Clones share the same log.
#[derive(Debug, Clone)]
pub struct ManualSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl ManualSurface {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            log: Rc::new(RefCell::new(SurfaceLog {
                viewport,
                ..Default::default()
            })),
        }
    }

    /// Simulate a window resize
    pub fn set_viewport(&self, viewport: Vec2) {
        self.log.borrow_mut().viewport = viewport;
    }

    pub fn log(&self) -> SurfaceLog {
        self.log.borrow().clone()
    }

    /// Filled shapes drawn so far
    pub fn fills(&self) -> u32 {
        let log = self.log.borrow();
        log.rects + log.circles + log.polygons + log.glyphs
    }
}

impl Surface for ManualSurface {
    fn fit_to_viewport(&mut self) -> Vec2 {
        let mut log = self.log.borrow_mut();
        if log.size != log.viewport {
            log.size = log.viewport;
            log.resizes += 1;
        }
        log.size
    }

    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }

    fn save(&mut self) {
        self.log.borrow_mut().depth += 1;
    }

    fn restore(&mut self) {
        self.log.borrow_mut().depth -= 1;
    }

    fn translate(&mut self, _offset: Vec2) {}

    fn rotate(&mut self, _radians: f32) {}

    fn set_alpha(&mut self, _alpha: f32) {}

    fn set_fill(&mut self, _color: &str) {}

    fn set_glow(&mut self, _blur: f32, _color: &str) {}

    fn fill_rect(&mut self, _min: Vec2, _size: Vec2) {
        self.log.borrow_mut().rects += 1;
    }

    fn fill_circle(&mut self, _center: Vec2, _radius: f32) {
        self.log.borrow_mut().circles += 1;
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        if points.len() >= 3 {
            self.log.borrow_mut().polygons += 1;
        }
    }

    fn fill_text(&mut self, _text: &str, _at: Vec2, _font_px: f32) {
        self.log.borrow_mut().glyphs += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_due_order() {
        let scheduler = ManualScheduler::new(0.0);
        let order = Rc::new(RefCell::new(Vec::new()));

        for (delay, tag) in [(300, "c"), (100, "a"), (200, "b"), (100, "a2")] {
            let order = order.clone();
            scheduler.after(delay, Box::new(move || order.borrow_mut().push(tag)));
        }

        scheduler.advance(250.0);
        assert_eq!(*order.borrow(), vec!["a", "a2", "b"]);
        scheduler.advance(100.0);
        assert_eq!(*order.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_interval_cancels_itself() {
        let scheduler = Rc::new(ManualScheduler::new(0.0));
        let hits = Rc::new(Cell::new(0));
        let id = Rc::new(Cell::new(None));

        let task_id = {
            let (scheduler_ref, hits, id) = (scheduler.clone(), hits.clone(), id.clone());
            scheduler.every(
                1000,
                Box::new(move || {
                    hits.set(hits.get() + 1);
                    if hits.get() == 3 {
                        if let Some(own) = id.get() {
                            scheduler_ref.cancel(own);
                        }
                    }
                }),
            )
        };
        id.set(Some(task_id));

        scheduler.advance(10_000.0);
        assert_eq!(hits.get(), 3);
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_clock_advances_to_target() {
        let scheduler = ManualScheduler::new(5_000.0);
        scheduler.advance(1_500.0);
        assert_eq!(scheduler.now_ms(), 6_500.0);
    }

    #[test]
    fn test_frame_callbacks_until_cancelled() {
        let scheduler = ManualScheduler::new(0.0);
        let frames = Rc::new(Cell::new(0));
        let id = {
            let frames = frames.clone();
            scheduler.every_frame(Box::new(move |_t| frames.set(frames.get() + 1)))
        };

        scheduler.run_frames(5);
        scheduler.cancel(id);
        scheduler.run_frames(5);

        assert_eq!(frames.get(), 5);
        assert_eq!(scheduler.frames_dispatched(), 10);
    }

    #[test]
    fn test_unavailable_store_fails_open() {
        let store = MemoryStore::unavailable();
        store.set("siteLaunched", "true");
        assert_eq!(store.get("siteLaunched"), None);
    }
}
