//! Celebration screen
//!
//! `particles` and `state` are the pure simulation, `screen` owns the
//! timers and the frame loop.

pub mod particles;
pub mod screen;
pub mod state;

pub use particles::{ConfettiPiece, ConfettiShape, FireworkBurst, Spark};
pub use screen::{CelebrationScreen, ShowView};
pub use state::{ExitTick, ShowState, StepClock};
