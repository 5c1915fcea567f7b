//! Audio system using Web Audio API
//!
//! Procedurally generated celebration sounds - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::platform::{SoundEffect, SoundSink};

/// Web Audio sound sink
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.6 }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Confetti cannon - bright upward pop
    fn play_pop(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1200.0, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        // Paper rustle
        if let Some((osc, gain)) = self.create_osc(ctx, 4000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.08, t + 0.05).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.frequency().set_value_at_time(4000.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(5500.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(3500.0, t + 0.15).ok();
            osc.frequency().set_value_at_time(6000.0, t + 0.2).ok();
            osc.start_with_when(t + 0.05).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    /// Firework - boom with a crackling tail
    fn play_bang(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.5)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.6).ok();
        }

        // Crackle
        for (i, freq) in [2500.0, 3200.0, 2100.0, 3800.0].iter().enumerate() {
            let delay = 0.15 + i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = t + delay;
                gain.gain().set_value_at_time(vol * 0.1, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.06).ok();
            }
        }
    }

    /// Curtains open - rising major arpeggio
    fn play_fanfare(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                let hold = if i == 3 { 0.6 } else { 0.25 };
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + hold)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + hold + 0.05).ok();
            }
        }
    }
}

impl SoundSink for AudioManager {
    fn play(&self, effect: SoundEffect) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::ConfettiPop => self.play_pop(ctx, self.volume),
            SoundEffect::FireworkBang => self.play_bang(ctx, self.volume),
            SoundEffect::Fanfare => self.play_fanfare(ctx, self.volume),
        }
    }

    /// Resume audio context (required after user gesture)
    fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }
}
