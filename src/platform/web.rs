//! Browser implementations of the platform traits

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{KeyValueStore, Navigator, Scheduler, TaskId};

#[derive(Default)]
struct Registry {
    next_id: u64,
    live: HashSet<u64>,
}

/// `setTimeout` / `requestAnimationFrame` scheduler
///
/// Every callback is a one-shot JS closure, freed by wasm-bindgen when it
/// runs. Cancelling only unregisters the id: the pending timeout or frame
/// still fires once as a no-op, which releases its closure. Repeating tasks
/// re-arm from inside their own callback while their id stays live.
#[derive(Default)]
pub struct BrowserScheduler {
    registry: Rc<RefCell<Registry>>,
}

impl BrowserScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve(&self) -> u64 {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        id
    }
}

fn is_live(registry: &Rc<RefCell<Registry>>, id: u64) -> bool {
    registry.borrow().live.contains(&id)
}

fn arm_timeout(
    registry: &Rc<RefCell<Registry>>,
    id: u64,
    delay_ms: f64,
    callback: impl FnOnce() + 'static,
) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once_into_js(callback);
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.unchecked_ref(),
        delay_ms.max(0.0) as i32,
    ) {
        Ok(_) => {
            registry.borrow_mut().live.insert(id);
        }
        Err(e) => log::error!("setTimeout failed: {:?}", e),
    }
}

fn arm_repeat(
    registry: Rc<RefCell<Registry>>,
    id: u64,
    period_ms: f64,
    due_ms: f64,
    mut task: Box<dyn FnMut()>,
) {
    let delay_ms = due_ms - js_sys::Date::now();
    let reg = registry.clone();
    arm_timeout(&registry, id, delay_ms, move || {
        if !is_live(&reg, id) {
            return;
        }
        task();
        if is_live(&reg, id) {
            arm_repeat(reg, id, period_ms, due_ms + period_ms, task);
        }
    });
}

fn arm_frame(registry: Rc<RefCell<Registry>>, id: u64, mut task: Box<dyn FnMut(f64)>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let reg = registry.clone();
    let closure = Closure::once_into_js(move |time: f64| {
        if !is_live(&reg, id) {
            return;
        }
        task(time);
        if is_live(&reg, id) {
            arm_frame(reg, id, task);
        }
    });
    match window.request_animation_frame(closure.unchecked_ref()) {
        Ok(_) => {
            registry.borrow_mut().live.insert(id);
        }
        Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
    }
}

impl Scheduler for BrowserScheduler {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskId {
        let id = self.reserve();
        let reg = self.registry.clone();
        arm_timeout(&self.registry, id, delay_ms as f64, move || {
            if reg.borrow_mut().live.remove(&id) {
                task();
            }
        });
        TaskId(id)
    }

    fn every(&self, period_ms: u32, task: Box<dyn FnMut()>) -> TaskId {
        let id = self.reserve();
        let period_ms = (period_ms as f64).max(1.0);
        arm_repeat(
            self.registry.clone(),
            id,
            period_ms,
            js_sys::Date::now() + period_ms,
            task,
        );
        TaskId(id)
    }

    fn every_frame(&self, task: Box<dyn FnMut(f64)>) -> TaskId {
        let id = self.reserve();
        arm_frame(self.registry.clone(), id, task);
        TaskId(id)
    }

    fn cancel(&self, id: TaskId) {
        // Not cleared in the browser: a cleared one-shot closure is never
        // called and so never freed
        if !self.registry.borrow_mut().live.remove(&id.0) {
            log::trace!("Task {} already finished", id.0);
        }
    }
}

/// LocalStorage-backed store. Missing or blocked storage reads as empty.
#[derive(Debug, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        let saved = Self::storage().is_some_and(|storage| storage.set_item(key, value).is_ok());
        if !saved {
            log::warn!("LocalStorage unavailable, {} not saved", key);
        }
    }
}

/// Redirects through `location.replace`
#[derive(Debug, Default)]
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn redirect(&self, url: &str) {
        log::info!("Redirecting to {}", url);
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.location().replace(url) {
            log::error!("Redirect failed: {:?}", e);
        }
    }
}
