//! Fractional delay line for time-based filters.
//!
//! A circular buffer with a feedback tap and a two-point cosine-interpolated
//! read. It is the building block of [`CombFilter`](crate::CombFilter) and
//! [`AllpassFilter`](crate::AllpassFilter), and through them of every
//! reverb block.
//!
//! # Timing
//!
//! Times are expressed in milliseconds. A delay of `T` ms at sample rate
//! `sr` spans `T * sr / 1000` samples; the integer part selects the
//! `floor` tap, the next tap is `ceil`, and the fractional part weights
//! the two through [`cosine_interp`].
//!
//! # Memory
//!
//! The buffer holds `ceil(max_time * sr / 1000) + 1` samples. It is
//! reallocated only by [`DelayLine::set_max_time`] and
//! [`DelayLine::set_sample_rate`]; [`DelayLine::run`] never allocates.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use libm::{ceilf, floorf};

use crate::math::{cosine_interp, ms_to_samples};
use crate::Effect;

/// Interpolated delay line with feedback (heap-allocated circular buffer).
///
/// The output of [`run`](Self::run) is read *before* the input is written,
/// and the written value is `input + output * feedback`.
///
/// # Example
///
/// ```rust
/// use crypta_core::DelayLine;
///
/// // 10 ms delay at 44.1 kHz = 441 samples, no feedback
/// let mut delay = DelayLine::new(44100.0, 50.0, 10.0, 0.0);
///
/// let mut peak_at = 0;
/// for n in 0..1000 {
///     let input = if n == 0 { 1.0 } else { 0.0 };
///     if delay.run(input) > 0.5 {
///         peak_at = n;
///     }
/// }
/// assert_eq!(peak_at, 441);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
    /// Read positions for the floor and ceil taps
    read_pos: [usize; 2],
    /// Delay in whole samples for the floor and ceil taps
    delay_samples: [usize; 2],
    /// Weight of the ceil tap, in [0, 1)
    frac: f32,
    sample_rate: f32,
    max_time: f32,
    time: f32,
    feedback: f32,
    output: f32,
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(44100.0, 5000.0, 1000.0, 0.0)
    }
}

impl DelayLine {
    /// Creates a new delay line.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz (clamped to >= 1)
    /// * `max_time` - Maximum delay in milliseconds (clamped to >= 0)
    /// * `time` - Initial delay in milliseconds (clamped to `[0, max_time]`)
    /// * `feedback` - Gain of the output fed back into the buffer
    pub fn new(sample_rate: f32, max_time: f32, time: f32, feedback: f32) -> Self {
        let sample_rate = sample_rate.max(1.0);
        let max_time = max_time.max(0.0);

        let mut delay = Self {
            buffer: vec![0.0; capacity_for(max_time, sample_rate)],
            write_pos: 0,
            read_pos: [0; 2],
            delay_samples: [0; 2],
            frac: 0.0,
            sample_rate,
            max_time,
            time: 0.0,
            feedback,
            output: 0.0,
        };
        delay.set_time(time);
        delay
    }

    /// Processes one sample: read the delayed output, write `input + output * feedback`,
    /// then advance all positions by one.
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        let output = cosine_interp(
            self.buffer[self.read_pos[0]],
            self.buffer[self.read_pos[1]],
            self.frac,
        );

        self.buffer[self.write_pos] = input + output * self.feedback;

        self.write_pos = (self.write_pos + 1) % len;
        for pos in &mut self.read_pos {
            *pos = (*pos + 1) % len;
        }

        self.output = output;
        output
    }

    /// Sets the delay time in milliseconds.
    ///
    /// Same as [`retime_discontinuous`](Self::retime_discontinuous); this is
    /// the name used for static configuration.
    pub fn set_time(&mut self, time: f32) {
        self.retime_discontinuous(time);
    }

    /// Moves both read taps to a new delay time, relative to the current
    /// write position.
    ///
    /// The time is clamped to `[0, max_time]`. The read position jumps
    /// immediately and is not click-filtered: content between the old and
    /// new taps is skipped or repeated. Slow modulators rely on the jumps
    /// being small enough to approximate a continuous glide.
    ///
    /// A time of zero reads the slot about to be overwritten, i.e. the
    /// oldest sample in the buffer.
    pub fn retime_discontinuous(&mut self, time: f32) {
        self.time = time.clamp(0.0, self.max_time);

        let len = self.buffer.len();
        let exact = ms_to_samples(self.time, self.sample_rate);
        let floor = floorf(exact);

        self.delay_samples = [
            (floor as usize).min(len - 1),
            (ceilf(exact) as usize) % len,
        ];
        self.frac = exact - floor;

        for (pos, delay) in self.read_pos.iter_mut().zip(self.delay_samples) {
            *pos = (self.write_pos + len - delay) % len;
        }
    }

    /// Resizes the buffer for a new maximum delay time in milliseconds.
    ///
    /// With `clear = true` the buffer is zeroed and every position reset
    /// (destructive). With `clear = false` the buffer is resized in place,
    /// keeping existing content up to the new length. The current delay
    /// time is clamped to the new maximum and re-applied.
    pub fn set_max_time(&mut self, max_time: f32, clear: bool) {
        self.max_time = max_time.max(0.0);
        let capacity = capacity_for(self.max_time, self.sample_rate);

        if clear {
            self.buffer = vec![0.0; capacity];
            self.write_pos = 0;
            self.output = 0.0;
        } else {
            self.buffer.resize(capacity, 0.0);
            self.write_pos %= capacity;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            max_time = self.max_time,
            capacity,
            clear,
            "delay_line: buffer resized"
        );

        self.retime_discontinuous(self.time);
    }

    /// Sets the feedback gain.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    /// Zeroes the buffer, keeping time, feedback and positions.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.output = 0.0;
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns the delay time in milliseconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Returns the maximum delay time in milliseconds.
    pub fn max_time(&self) -> f32 {
        self.max_time
    }

    /// Returns the feedback gain.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Returns the whole-sample (floor) part of the current delay.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples[0]
    }

    /// Returns the buffer capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the most recent output of [`run`](Self::run).
    pub fn last_output(&self) -> f32 {
        self.output
    }
}

impl Effect for DelayLine {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.run(input)
    }

    /// Destructive rebuild: the buffer is reallocated and zeroed, then the
    /// current delay time is re-applied at the new rate.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.set_max_time(self.max_time, true);
    }

    fn reset(&mut self) {
        self.clear();
    }
}

fn capacity_for(max_time: f32, sample_rate: f32) -> usize {
    ceilf(ms_to_samples(max_time, sample_rate)) as usize + 1
}
