//! DOM bindings for both screens
//!
//! Markup lives in `index.html`; this module only updates text, classes and
//! attributes on elements looked up by id. Missing elements are skipped.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent};

use crate::app::{Frontend, View};
use crate::config::LaunchConfig;
use crate::gate::{GateView, LaunchGate, launch_date_label, launch_time_label};
use crate::renderer::Surface;
use crate::renderer::canvas::CanvasSurface;
use crate::show::{ShowState, ShowView};

const HIDDEN: &str = "hidden";
const RISING_HEARTS: u32 = 15;

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn get_el(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = get_el(id) {
        el.set_text_content(Some(text));
    }
}

/// Add or remove one class
pub fn set_class(id: &str, class: &str, on: bool) {
    if let Some(el) = get_el(id) {
        let list = el.class_list();
        let result = if on { list.add_1(class) } else { list.remove_1(class) };
        result.ok();
    }
}

fn set_disabled(id: &str, disabled: bool) {
    if let Some(el) = get_el(id) {
        if disabled {
            el.set_attribute("disabled", "").ok();
        } else {
            el.remove_attribute("disabled").ok();
        }
    }
}

/// Route clicks on `id` to `handler`. The listener lives for the page.
pub fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
    let Some(el) = get_el(id) else {
        log::warn!("No #{} element, control disabled", id);
        return;
    };
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Countdown screen
pub struct DomGateView;

impl DomGateView {
    /// The info panel labels never change, so they are set once here
    pub fn new(config: &LaunchConfig) -> Self {
        set_text("info-date", &launch_date_label(&config.launch_at));
        set_text("info-time", &launch_time_label(&config.launch_at));
        Self
    }
}

impl GateView for DomGateView {
    fn render(&self, gate: &LaunchGate) {
        let countdown = gate.countdown_text();
        set_text("gate-headline", gate.headline());
        set_text("gate-countdown", &countdown);
        set_text("info-countdown", &countdown);
        set_text("enter-label", gate.button_label());
        set_disabled("enter-btn", !gate.entry_enabled());
        set_class("enter-btn", "live", gate.is_live());
        set_class("gate-countdown", "live", gate.is_live());
        set_class("gate-hint", HIDDEN, !gate.show_hint());
        set_class("info-panel", HIDDEN, !gate.info_open());
    }

    fn exit_animation(&self) {
        set_class("enter-btn", "exiting", true);
        set_class("gate", "exiting", true);
    }
}

/// Celebration screen overlay (curtains, controls, exit label)
pub struct DomShowView;

impl DomShowView {
    pub fn new() -> Self {
        spawn_hearts();
        Self
    }
}

impl Default for DomShowView {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `#hearts` with CSS-animated hearts spread across the width
fn spawn_hearts() {
    let (Some(doc), Some(container)) = (document(), get_el("hearts")) else {
        return;
    };
    for i in 0..RISING_HEARTS {
        let Ok(heart) = doc.create_element("span") else {
            continue;
        };
        heart.set_class_name("heart");
        heart.set_text_content(Some("❤️"));
        let left = 3.0 + i as f32 * 94.0 / RISING_HEARTS as f32;
        let delay = (i % 5) as f32 * 0.6 + (i / 5) as f32 * 0.25;
        let duration = 4.0 + (i % 3) as f32;
        heart
            .set_attribute(
                "style",
                &format!("left:{left:.1}%;animation-delay:{delay:.2}s;animation-duration:{duration:.1}s"),
            )
            .ok();
        container.append_child(&heart).ok();
    }
}

impl ShowView for DomShowView {
    fn render(&self, show: &ShowState) {
        set_class("curtains", "open", !show.curtains_closed());
        set_text("exit-seconds", &format!("Launching in {}s", show.seconds_left()));
        set_text(
            "pause-btn",
            if show.is_paused() { "▶ Resume" } else { "⏸ Pause" },
        );
        set_text(
            "sound-btn",
            if show.sound_enabled() { "🔊 Sound On" } else { "🔇 Sound Off" },
        );
        set_class("show", "paused", show.is_paused());
    }
}

/// Browser frontend: both views plus the celebration canvas
pub struct DomFrontend {
    gate: Rc<DomGateView>,
    show: Rc<DomShowView>,
}

impl DomFrontend {
    pub fn new(config: &LaunchConfig) -> Self {
        Self {
            gate: Rc::new(DomGateView::new(config)),
            show: Rc::new(DomShowView::new()),
        }
    }
}

impl Frontend for DomFrontend {
    fn gate_view(&self) -> Rc<dyn GateView> {
        self.gate.clone()
    }

    fn show_view(&self) -> Rc<dyn ShowView> {
        self.show.clone()
    }

    fn surface(&self) -> Option<Box<dyn Surface>> {
        match CanvasSurface::from_element_id("show-canvas") {
            Some(surface) => Some(Box::new(surface)),
            None => {
                log::warn!("No 2D canvas context, particles disabled");
                None
            }
        }
    }

    fn present(&self, view: View) {
        set_class("gate", HIDDEN, view != View::Gate);
        set_class("show", HIDDEN, view != View::Celebration);
        log::debug!("Showing {:?}", view);
    }
}
