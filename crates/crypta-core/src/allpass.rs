//! Schroeder allpass filter for reverb diffusion.
//!
//! Smears echoes in time without coloring the long-term spectrum. The two
//! later reverb blocks chain these in series.

use crate::{DelayLine, Effect, flush_denormal};

/// Schroeder allpass built from two delay lines.
///
/// `output = -gain * input + ff.run(input) + gain * fb.run(previous_output)`
///
/// The filter is only stable for `|gain| < 1`; the value is not clamped.
///
/// # Example
///
/// ```rust
/// use crypta_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(44100.0, 100.0, 97.0, -0.7);
/// let first = allpass.run(1.0);
/// assert!((first - 0.7).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    ff_delay: DelayLine,
    fb_delay: DelayLine,
    gain: f32,
    output: f32,
}

impl Default for AllpassFilter {
    fn default() -> Self {
        Self::new(44100.0, 1000.0, 1000.0, 0.707)
    }
}

impl AllpassFilter {
    /// Creates an allpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `max_time` - Maximum delay in milliseconds (clamped to >= 1)
    /// * `time` - Delay in milliseconds
    /// * `gain` - Allpass coefficient, stable for `|gain| < 1`
    pub fn new(sample_rate: f32, max_time: f32, time: f32, gain: f32) -> Self {
        let max_time = max_time.max(1.0);
        Self {
            ff_delay: DelayLine::new(sample_rate, max_time, time, 0.0),
            fb_delay: DelayLine::new(sample_rate, max_time, time, 0.0),
            gain,
            output: 0.0,
        }
    }

    /// Process one sample.
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        let delayed_in = self.ff_delay.run(input);
        let delayed_out = self.fb_delay.run(self.output);

        self.output = flush_denormal(-self.gain * input + delayed_in + self.gain * delayed_out);
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

    /// Sets the allpass coefficient.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Silences the filter without touching time or gain.
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

    /// Returns the allpass coefficient.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Returns the most recent output.
    pub fn last_output(&self) -> f32 {
        self.output
    }
}

impl Effect for AllpassFilter {
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
