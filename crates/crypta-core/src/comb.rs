//! Feedforward/feedback comb filter.
//!
//! The comb is the density stage of the reverb blocks: the two early
//! blocks are built entirely from them.
//!
//! ```text
//! input ─┬──────────── × gain ──────────────┐
//!        ├─→ [ff delay] × feedforward ─────(+)─┬─→ output
//!        │                                  ↑  │
//!        │         [fb delay] × feedback ───┘  │
//!        │             ↑                       │
//!        └─────────    └── previous output ────┘
//! ```
//!
//! Both delay lines share the same time and sample rate but own separate
//! buffers, so the feedforward and feedback paths never alias.

use crate::{DelayLine, Effect, flush_denormal};

/// Comb filter with independent feedforward and feedback delay paths.
///
/// `output = gain * input + feedforward * ff.run(input) + feedback * fb.run(previous_output)`
///
/// Stability with a non-zero `feedback` is the caller's responsibility.
///
/// # Example
///
/// ```rust
/// use crypta_core::CombFilter;
///
/// // 4 ms at 1 kHz: echoes every 4 samples on the feedforward path
/// let mut comb = CombFilter::new(1000.0, 10.0, 4.0, 1.0, 0.5, 0.0);
///
/// let out: Vec<f32> = (0..5).map(|n| comb.run(if n == 0 { 1.0 } else { 0.0 })).collect();
/// assert_eq!(out[0], 1.0);
/// assert!((out[4] - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    ff_delay: DelayLine,
    fb_delay: DelayLine,
    gain: f32,
    feedforward: f32,
    feedback: f32,
    /// Previous output, fed into the feedback line
    output: f32,
}

impl Default for CombFilter {
    fn default() -> Self {
        Self::new(44100.0, 1000.0, 1000.0, 0.707, 0.707, 0.707)
    }
}

impl CombFilter {
    /// Creates a comb filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `max_time` - Maximum delay in milliseconds (clamped to >= 1)
    /// * `time` - Delay in milliseconds
    /// * `gain` - Direct path gain
    /// * `feedforward` - Gain of the delayed input
    /// * `feedback` - Gain of the delayed output
    pub fn new(
        sample_rate: f32,
        max_time: f32,
        time: f32,
        gain: f32,
        feedforward: f32,
        feedback: f32,
    ) -> Self {
        let max_time = max_time.max(1.0);
        Self {
            ff_delay: DelayLine::new(sample_rate, max_time, time, 0.0),
            fb_delay: DelayLine::new(sample_rate, max_time, time, 0.0),
            gain,
            feedforward,
            feedback,
            output: 0.0,
        }
    }

    /// Process one sample.
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        let delayed_in = self.ff_delay.run(input);
        let delayed_out = self.fb_delay.run(self.output);

        self.output = flush_denormal(
            self.gain * input + self.feedforward * delayed_in + self.feedback * delayed_out,
        );
        self.output
    }

    /// Sets the delay time in milliseconds on both paths.
    pub fn set_time(&mut self, time: f32) {
        self.retime_discontinuous(time);
    }

    /// Jumps both read taps to a new delay time.
    ///
    /// See [`DelayLine::retime_discontinuous`].
    #[inline]
    pub fn retime_discontinuous(&mut self, time: f32) {
        self.ff_delay.retime_discontinuous(time);
        self.fb_delay.retime_discontinuous(time);
    }

    /// Resizes both delay lines. `max_time` is clamped to at least 1 ms.
    pub fn set_max_time(&mut self, max_time: f32, clear: bool) {
        let max_time = max_time.max(1.0);
        self.ff_delay.set_max_time(max_time, clear);
        self.fb_delay.set_max_time(max_time, clear);
        if clear {
            self.output = 0.0;
        }
    }

    /// Sets the direct path gain.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Sets the feedforward gain.
    pub fn set_feedforward(&mut self, feedforward: f32) {
        self.feedforward = feedforward;
    }

    /// Sets the feedback gain.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Silences the filter without touching time or gains.
    pub fn clear(&mut self) {
        self.ff_delay.clear();
        self.fb_delay.clear();
        self.output = 0.0;
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.ff_delay.sample_rate()
    }

    /// Returns the delay time in milliseconds.
    pub fn time(&self) -> f32 {
        self.ff_delay.time()
    }

    /// Returns the maximum delay time in milliseconds.
    pub fn max_time(&self) -> f32 {
        self.ff_delay.max_time()
    }

    /// Returns the direct path gain.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Returns the feedforward gain.
    pub fn feedforward(&self) -> f32 {
        self.feedforward
    }

    /// Returns the feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Returns the most recent output.
    pub fn last_output(&self) -> f32 {
        self.output
    }
}

impl Effect for CombFilter {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.run(input)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ff_delay.set_sample_rate(sample_rate);
        self.fb_delay.set_sample_rate(sample_rate);
        self.clear();
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate alloc;
    use alloc::vec::Vec;

    fn impulse_response(comb: &mut CombFilter, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| comb.run(if n == 0 { 1.0 } else { 0.0 }))
            .collect()
    }

    #[test]
    fn test_comb_direct_and_feedforward() {
        let mut comb = CombFilter::new(1000.0, 10.0, 4.0, 0.5, 0.25, 0.0);
        let out = impulse_response(&mut comb, 10);
        assert_eq!(out[0], 0.5);
        assert!((out[4] - 0.25).abs() < 1e-6);
        for (i, &v) in out.iter().enumerate() {
            if i != 0 && i != 4 {
                assert!(v.abs() < 1e-6, "unexpected energy at {i}: {v}");
            }
        }
    }

    #[test]
    fn test_comb_feedback_path_repeats() {
        // Feedback line sees the previous output, so echoes land every T + 1
        let mut comb = CombFilter::new(1000.0, 10.0, 4.0, 1.0, 0.0, 0.5);
        let out = impulse_response(&mut comb, 12);
        assert_eq!(out[0], 1.0);
        assert!((out[5] - 0.5).abs() < 1e-6);
        assert!((out[10] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_comb_feedback_decay() {
        let mut comb = CombFilter::new(44100.0, 50.0, 11.0, 0.67, -0.57, 0.77);
        let out = impulse_response(&mut comb, 20000);
        let early: f32 = out[..5000].iter().map(|x| x * x).sum();
        let late: f32 = out[15000..].iter().map(|x| x * x).sum();
        assert!(late < early * 0.01, "early={early}, late={late}");
    }

    #[test]
    fn test_comb_clear_keeps_settings() {
        let mut comb = CombFilter::new(44100.0, 30.0, 13.0, 0.13, -0.71, 0.65);
        for _ in 0..2000 {
            comb.run(1.0);
        }
        comb.clear();
        assert_eq!(comb.time(), 13.0);
        assert_eq!(comb.gain(), 0.13);
        assert_eq!(comb.feedforward(), -0.71);
        assert_eq!(comb.feedback(), 0.65);
        for _ in 0..2000 {
            assert_eq!(comb.run(0.0), 0.0);
        }
    }

    #[test]
    fn test_comb_max_time_floor() {
        let comb = CombFilter::new(44100.0, 0.0, 5.0, 1.0, 0.0, 0.0);
        assert_eq!(comb.max_time(), 1.0);
        assert_eq!(comb.time(), 1.0);

        let mut comb = CombFilter::default();
        comb.set_max_time(-20.0, true);
        assert_eq!(comb.max_time(), 1.0);
    }

    #[test]
    fn test_comb_time_clamped() {
        let mut comb = CombFilter::new(44100.0, 300.0, 277.0, 0.53, 0.45, 0.33);
        comb.set_time(1000.0);
        assert_eq!(comb.time(), 300.0);
        comb.retime_discontinuous(-1.0);
        assert_eq!(comb.time(), 0.0);
    }

    #[test]
    fn test_comb_sample_rate_propagates() {
        let mut comb = CombFilter::new(44100.0, 30.0, 10.0, 1.0, 1.0, 0.0);
        for _ in 0..100 {
            comb.run(1.0);
        }
        comb.set_sample_rate(1000.0);
        assert_eq!(comb.sample_rate(), 1000.0);
        assert_eq!(comb.last_output(), 0.0);
        // 10 ms at 1 kHz
        let out = impulse_response(&mut comb, 12);
        assert!((out[10] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_no_denormals_after_silence() {
        let mut comb = CombFilter::new(44100.0, 30.0, 5.0, 0.5, 0.5, 0.9);
        for _ in 0..1000 {
            comb.run(0.5);
        }
        for i in 0..100_000 {
            let out = comb.run(0.0);
            assert!(
                out == 0.0 || out.abs() > f32::MIN_POSITIVE,
                "Denormal detected at sample {}: {:.2e}",
                i,
                out
            );
        }
    }
}
