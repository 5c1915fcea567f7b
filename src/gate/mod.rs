//! Launch gate
//!
//! Blocks progression until the launch moment. `state` holds the pure gate
//! logic, `screen` drives it from timers and user input.

pub mod countdown;
pub mod info;
pub mod screen;
pub mod state;

pub use countdown::Countdown;
pub use info::{launch_date_label, launch_time_label};
pub use screen::{GateMount, GateScreen, GateView};
pub use state::{Admission, GatePhase, LaunchGate, admission};
