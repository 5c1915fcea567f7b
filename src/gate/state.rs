//! Launch gate state
//!
//! Pure and clock-free: every method takes the current time from the caller.

use super::countdown::Countdown;

/// Where the gate is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    /// Launch time not reached, entry disabled
    Counting,
    /// Launch time reached, entry enabled
    Live,
    /// Entry accepted, exit animation playing
    Exiting,
}

/// Mount-time decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Already launched or already entered: leave without rendering
    Redirect,
    /// Show the countdown
    Show,
}

pub fn admission(now_ms: i64, launch_ms: i64, entered: bool) -> Admission {
    if entered || now_ms >= launch_ms {
        Admission::Redirect
    } else {
        Admission::Show
    }
}

/// The pre-launch screen's state
#[derive(Debug, Clone)]
pub struct LaunchGate {
    launch_ms: i64,
    remaining_ms: u64,
    countdown: Countdown,
    phase: GatePhase,
    info_open: bool,
}

impl LaunchGate {
    pub fn new(launch_ms: i64, now_ms: i64) -> Self {
        let mut gate = Self {
            launch_ms,
            remaining_ms: u64::MAX,
            countdown: Countdown::ZERO,
            phase: GatePhase::Counting,
            info_open: true,
        };
        gate.update(now_ms);
        gate
    }

    /// Recompute the countdown. Returns true on the update that goes live.
    pub fn update(&mut self, now_ms: i64) -> bool {
        if self.phase != GatePhase::Counting {
            return false;
        }

        // Never count back up if the clock steps backwards
        self.remaining_ms = Countdown::remaining_ms(self.launch_ms, now_ms).min(self.remaining_ms);
        self.countdown = Countdown::from_ms(self.remaining_ms);

        if self.remaining_ms == 0 {
            self.phase = GatePhase::Live;
            self.countdown = Countdown::ZERO;
            log::info!("Launch time reached, entry enabled");
            return true;
        }
        false
    }

    /// Accept an entry click. No-op unless live.
    pub fn request_entry(&mut self) -> bool {
        if self.phase != GatePhase::Live {
            return false;
        }
        self.phase = GatePhase::Exiting;
        true
    }

    /// Close the info panel. Returns false if it was already closed.
    pub fn dismiss_info(&mut self) -> bool {
        std::mem::replace(&mut self.info_open, false)
    }

    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// Launch time has been reached
    pub fn is_live(&self) -> bool {
        self.phase != GatePhase::Counting
    }

    /// The entry control accepts clicks
    pub fn entry_enabled(&self) -> bool {
        self.phase == GatePhase::Live
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn info_open(&self) -> bool {
        self.info_open
    }

    pub fn headline(&self) -> &'static str {
        if self.is_live() {
            "Launch Time!"
        } else {
            "Going live in:"
        }
    }

    pub fn countdown_text(&self) -> String {
        if self.is_live() {
            "Website is LIVE!".to_string()
        } else {
            self.countdown.to_string()
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_live() {
            "Enter Website"
        } else {
            "Launching Soon"
        }
    }

    /// "The button will activate automatically..." hint
    pub fn show_hint(&self) -> bool {
        !self.is_live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAUNCH: i64 = 1_000_000;

    #[test]
    fn test_admission() {
        assert_eq!(admission(LAUNCH - 1, LAUNCH, false), Admission::Show);
        assert_eq!(admission(LAUNCH, LAUNCH, false), Admission::Redirect);
        assert_eq!(admission(LAUNCH - 60_000, LAUNCH, true), Admission::Redirect);
    }

    #[test]
    fn test_goes_live_exactly_once() {
        let mut gate = LaunchGate::new(LAUNCH, LAUNCH - 2_000);
        assert_eq!(gate.phase(), GatePhase::Counting);
        assert_eq!(gate.countdown_text(), "0d 0h 0m 2s");

        assert!(!gate.update(LAUNCH - 1_000));
        assert!(gate.update(LAUNCH));
        assert!(!gate.update(LAUNCH + 1_000));
        assert_eq!(gate.phase(), GatePhase::Live);
        assert!(gate.countdown().is_zero());
        assert_eq!(gate.countdown_text(), "Website is LIVE!");
        assert_eq!(gate.button_label(), "Enter Website");
    }

    #[test]
    fn test_entry_ignored_until_live() {
        let mut gate = LaunchGate::new(LAUNCH, LAUNCH - 5_000);
        assert!(!gate.entry_enabled());
        assert!(!gate.request_entry());
        assert_eq!(gate.phase(), GatePhase::Counting);

        gate.update(LAUNCH);
        assert!(gate.request_entry());
        assert_eq!(gate.phase(), GatePhase::Exiting);
        // Second click during exit animation
        assert!(!gate.request_entry());
        assert!(gate.is_live());
    }

    #[test]
    fn test_clock_going_backwards_never_counts_up() {
        let mut gate = LaunchGate::new(LAUNCH, LAUNCH - 10_000);
        gate.update(LAUNCH - 4_000);
        gate.update(LAUNCH - 9_000);
        assert_eq!(gate.remaining_ms(), 4_000);
    }

    #[test]
    fn test_info_panel_dismissed_once() {
        let mut gate = LaunchGate::new(LAUNCH, 0);
        assert!(gate.info_open());
        assert!(gate.dismiss_info());
        assert!(!gate.dismiss_info());
        assert!(!gate.info_open());
        // Gate logic unaffected
        assert!(gate.update(LAUNCH));
    }
}
