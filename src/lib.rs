//! Launch Countdown - a launch gate and celebration page
//!
//! Core modules:
//! - `gate`: Countdown-gated entry (pure gate state + scheduled screen)
//! - `show`: Celebration screen (confetti/firework simulation, exit countdown)
//! - `renderer`: Canvas 2D drawing of the particle sets
//! - `platform`: Injected capabilities (timers, storage, navigation, sound)
//! - `persistence`: The one-shot entry flag
//! - `config`: Data-driven page configuration
//! - `app`: Top-level view composition

pub mod app;
pub mod config;
pub mod gate;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod show;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use app::{App, Frontend, View};
pub use config::{ConfigError, EntryAction, LaunchConfig};

/// Page timing and physics constants
pub mod consts {
    /// Countdown tick period for both screens
    pub const TICK_MS: u32 = 1000;

    /// Fixed physics step (60 Hz, the rate the particle constants are tuned for)
    pub const STEP_MS: f64 = 1000.0 / 60.0;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame gap fed to the step accumulator
    pub const MAX_FRAME_MS: f64 = 100.0;

    /// Confetti gravity (pixels/step²)
    pub const CONFETTI_GRAVITY: f32 = 0.35;
    /// Per-step velocity retention
    pub const CONFETTI_DRAG_X: f32 = 0.98;
    pub const CONFETTI_DRAG_Y: f32 = 0.99;
    /// Pieces are dropped once this far below the canvas bottom
    pub const CONFETTI_FLOOR_MARGIN: f32 = 100.0;

    /// Firework spark gravity (pixels/step²)
    pub const FIREWORK_GRAVITY: f32 = 0.12;
    /// Starting life of a spark
    pub const FIREWORK_LIFE: f32 = 100.0;
    /// Life lost per step
    pub const FIREWORK_DECAY: f32 = 1.8;

    /// Viewport assumed when no drawing surface is available
    pub const FALLBACK_VIEWPORT: (f32, f32) = (1280.0, 720.0);
}
