//! Celebration state
//!
//! Deterministic for a given seed and call sequence. Timers and frames are
//! owned by the screen; this module only reacts to them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particles::{ConfettiPiece, FireworkBurst, confetti_burst, firework_burst};
use crate::config::{FireworkCue, ShowConfig};
use crate::consts::*;

/// Result of one exit-countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitTick {
    /// Seconds left after this tick
    Counting(u32),
    /// Countdown finished on this tick: redirect now
    Expired,
    /// The screen already exited
    Done,
}

/// Turns frame timestamps into whole physics steps
#[derive(Debug, Clone, Default)]
pub struct StepClock {
    last_ms: Option<f64>,
    accumulator: f64,
}

impl StepClock {
    /// Rounding slack so a 60 Hz display yields exactly one step per frame
    const EPSILON_MS: f64 = 1e-6;

    /// Forget the previous frame (after a pause) so no time jump is replayed
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn steps(&mut self, time_ms: f64) -> u32 {
        let Some(last_ms) = self.last_ms.replace(time_ms) else {
            return 1;
        };

        self.accumulator += (time_ms - last_ms).clamp(0.0, MAX_FRAME_MS);
        let mut steps = 0;
        while self.accumulator + Self::EPSILON_MS >= STEP_MS && steps < MAX_SUBSTEPS {
            self.accumulator -= STEP_MS;
            steps += 1;
        }
        // Drop any backlog the substep cap left behind
        if self.accumulator >= STEP_MS {
            self.accumulator = 0.0;
        }
        self.accumulator = self.accumulator.max(0.0);
        steps
    }
}

/// Everything the celebration screen shows
#[derive(Debug, Clone)]
pub struct ShowState {
    config: ShowConfig,
    rng: Pcg32,
    pub confetti: Vec<ConfettiPiece>,
    pub fireworks: Vec<FireworkBurst>,
    bounds: Vec2,
    clock: StepClock,
    next_id: u32,
    steps: u64,
    curtains: bool,
    paused: bool,
    sound_enabled: bool,
    seconds_left: u32,
    exited: bool,
}

impl ShowState {
    pub fn new(config: &ShowConfig, seed: u64, bounds: Vec2) -> Self {
        Self {
            config: config.clone(),
            rng: Pcg32::seed_from_u64(seed),
            confetti: Vec::new(),
            fireworks: Vec::new(),
            bounds,
            clock: StepClock::default(),
            next_id: 1,
            steps: 0,
            curtains: true,
            paused: false,
            sound_enabled: false,
            seconds_left: config.exit_countdown_secs,
            exited: false,
        }
    }

    /// Canvas size in pixels
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Fire the cannon from the bottom center. Returns how many of the new
    /// pieces are live after the cap is applied.
    pub fn fire_confetti(&mut self) -> usize {
        let origin = Vec2::new(self.bounds.x / 2.0, self.bounds.y);
        let pieces = confetti_burst(&mut self.rng, &self.config.confetti, origin, self.next_id);
        let added = pieces.len();
        self.next_id = self.next_id.wrapping_add(added as u32);
        self.confetti.extend(pieces);

        // Oldest pieces go first
        let max = self.config.max_confetti;
        if self.confetti.len() > max {
            let excess = self.confetti.len() - max;
            self.confetti.drain(..excess);
            log::debug!("Confetti cap reached, dropped {} pieces", excess);
        }
        log::debug!("Confetti burst: {} live pieces", self.confetti.len());
        added.min(self.confetti.len())
    }

    /// Burst a firework at a viewport-relative point. Returns sparks added.
    pub fn launch_firework(&mut self, cue: &FireworkCue) -> usize {
        let center = Vec2::new(
            cue.x_percent / 100.0 * self.bounds.x,
            cue.y_percent / 100.0 * self.bounds.y,
        );
        let burst = firework_burst(&mut self.rng, &self.config.fireworks, center, self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let added = burst.sparks.len();
        self.fireworks.push(burst);

        let max = self.config.max_fireworks.max(1);
        if self.fireworks.len() > max {
            let excess = self.fireworks.len() - max;
            self.fireworks.drain(..excess);
        }
        log::debug!("Firework at ({:.0}, {:.0})", center.x, center.y);
        added
    }

    /// One physics step. No-op while paused.
    pub fn step(&mut self) {
        if self.paused {
            return;
        }

        let height = self.bounds.y;
        for piece in &mut self.confetti {
            piece.step();
        }
        self.confetti.retain(|piece| piece.on_screen(height));

        self.fireworks.retain_mut(FireworkBurst::step);
        self.steps += 1;
    }

    /// Run the steps owed for a frame at `time_ms`. Returns steps run.
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        if self.paused {
            return 0;
        }
        let steps = self.clock.steps(time_ms);
        for _ in 0..steps {
            self.step();
        }
        steps
    }

    /// One exit-countdown tick
    pub fn tick_exit(&mut self) -> ExitTick {
        if self.exited {
            return ExitTick::Done;
        }
        if self.seconds_left <= 1 {
            self.seconds_left = 0;
            self.exited = true;
            return ExitTick::Expired;
        }
        self.seconds_left -= 1;
        ExitTick::Counting(self.seconds_left)
    }

    /// Manual exit. Returns false if the screen already exited.
    pub fn request_exit(&mut self) -> bool {
        !std::mem::replace(&mut self.exited, true)
    }

    /// Open the curtains. Returns false if already open.
    pub fn reveal(&mut self) -> bool {
        std::mem::replace(&mut self.curtains, false)
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            self.clock.reset();
        }
        self.paused = paused;
    }

    /// Flip sound on/off, returning the new setting
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn curtains_closed(&self) -> bool {
        self.curtains
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// Physics steps run since mount
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Live sparks across all fireworks
    pub fn spark_count(&self) -> usize {
        self.fireworks
            .iter()
            .flat_map(|burst| &burst.sparks)
            .filter(|spark| spark.is_alive())
            .count()
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> ShowState {
        ShowState::new(&ShowConfig::default(), 42, Vec2::new(1280.0, 720.0))
    }

    #[test]
    fn test_burst_counts() {
        let mut show = show();
        assert_eq!(show.fire_confetti(), 250);
        assert_eq!(show.confetti.len(), 250);
        assert_eq!(show.launch_firework(&FireworkCue::new(25.0, 20.0, 0)), 80);
        assert_eq!(show.fireworks.len(), 1);
        assert_eq!(show.fireworks[0].center, Vec2::new(320.0, 144.0));
        assert_eq!(show.spark_count(), 80);
    }

    #[test]
    fn test_particles_expire_and_stay_gone() {
        let mut show = show();
        show.fire_confetti();
        show.launch_firework(&FireworkCue::new(50.0, 15.0, 0));

        for _ in 0..600 {
            show.step();
        }
        assert!(show.confetti.is_empty());
        assert!(show.fireworks.is_empty());

        for _ in 0..60 {
            show.step();
        }
        assert!(show.confetti.is_empty());
        assert!(show.fireworks.is_empty());
    }

    #[test]
    fn test_caps_drop_oldest() {
        let mut config = ShowConfig::default();
        config.max_confetti = 300;
        config.max_fireworks = 2;
        let mut show = ShowState::new(&config, 1, Vec2::new(800.0, 600.0));

        show.fire_confetti();
        let newest_first_id = show.confetti[0].id + 250;
        show.fire_confetti();
        assert_eq!(show.confetti.len(), 300);
        // The whole second burst survives
        assert_eq!(show.confetti[50].id, newest_first_id);

        let cue = FireworkCue::new(50.0, 50.0, 0);
        for _ in 0..5 {
            show.launch_firework(&cue);
        }
        assert_eq!(show.fireworks.len(), 2);
    }

    #[test]
    fn test_cap_below_burst_reports_survivors() {
        let mut config = ShowConfig::default();
        config.max_confetti = 100;
        let mut show = ShowState::new(&config, 4, Vec2::new(800.0, 600.0));
        assert_eq!(show.fire_confetti(), 100);
        assert_eq!(show.confetti.len(), 100);

        config.max_confetti = 0;
        let mut show = ShowState::new(&config, 4, Vec2::new(800.0, 600.0));
        assert_eq!(show.fire_confetti(), 0);
        assert!(show.confetti.is_empty());
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut show = show();
        show.fire_confetti();
        show.launch_firework(&FireworkCue::new(50.0, 15.0, 0));
        show.step();

        show.set_paused(true);
        let before: Vec<_> = show.confetti.iter().map(|p| (p.pos, p.rotation)).collect();
        let life = show.fireworks[0].sparks[0].life;
        for i in 0..10 {
            show.step();
            assert_eq!(show.advance(1000.0 + i as f64 * 16.0), 0);
        }
        let after: Vec<_> = show.confetti.iter().map(|p| (p.pos, p.rotation)).collect();
        assert_eq!(before, after);
        assert_eq!(show.fireworks[0].sparks[0].life, life);
        assert_eq!(show.steps(), 1);
    }

    #[test]
    fn test_resume_has_no_time_jump() {
        let mut show = show();
        assert_eq!(show.advance(0.0), 1);
        assert_eq!(show.advance(STEP_MS), 1);

        show.set_paused(true);
        show.set_paused(false);
        // Ten seconds later: only the first-frame step, not a replay
        assert_eq!(show.advance(10_000.0), 1);
        assert_eq!(show.steps(), 3);
    }

    #[test]
    fn test_step_clock_caps_substeps() {
        let mut clock = StepClock::default();
        assert_eq!(clock.steps(0.0), 1);
        assert_eq!(clock.steps(STEP_MS * 2.0), 2);
        assert_eq!(clock.steps(STEP_MS * 2.0 + 5_000.0), MAX_SUBSTEPS);
        assert_eq!(clock.steps(STEP_MS * 2.0 + 5_000.0 + 1.0), 0);
    }

    #[test]
    fn test_exit_countdown_from_three() {
        let mut config = ShowConfig::default();
        config.exit_countdown_secs = 3;
        let mut show = ShowState::new(&config, 0, Vec2::ONE);

        assert_eq!(show.tick_exit(), ExitTick::Counting(2));
        assert_eq!(show.tick_exit(), ExitTick::Counting(1));
        assert_eq!(show.tick_exit(), ExitTick::Expired);
        assert_eq!(show.seconds_left(), 0);
        assert_eq!(show.tick_exit(), ExitTick::Done);
        assert!(!show.request_exit());
    }

    #[test]
    fn test_manual_exit_once() {
        let mut show = show();
        assert!(show.request_exit());
        assert!(!show.request_exit());
        assert_eq!(show.tick_exit(), ExitTick::Done);
    }

    #[test]
    fn test_same_seed_same_show() {
        let mut a = show();
        let mut b = show();
        a.fire_confetti();
        b.fire_confetti();
        for _ in 0..30 {
            a.step();
            b.step();
        }
        assert_eq!(a.confetti.len(), b.confetti.len());
        assert!((a.confetti[7].pos - b.confetti[7].pos).length() < 1e-4);
    }
}
