//! Low frequency oscillator for delay-time modulation.
//!
//! The reverb's chorused block sweeps one allpass per channel with a slow
//! sine; the other waveforms are there for hosts that want a different
//! sweep shape.

use core::f32::consts::PI;
use libm::{floorf, sinf};

use crate::Modulator;

/// LFO waveform type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LfoWaveform {
    /// `sin(2 pi phase)`
    #[default]
    Sine,
    /// Linear ramps, -1 at phase 0, +1 at phase 0.5
    Triangle,
    /// Rising ramp from -1 to 1
    Saw,
    /// +1 while the phase is below the pulse width, -1 after
    Pulse,
}

/// Phase-accumulating oscillator.
///
/// Each step adds `frequency / sample_rate` to the phase, wraps it into
/// `[0, 1)` and only then evaluates the waveform, so the first value after
/// a reset is one increment past zero.
///
/// # Example
///
/// ```rust
/// use crypta_core::Lfo;
///
/// let mut lfo = Lfo::new(44100.0, 0.19);
/// let first = lfo.next();
/// assert!(first > 0.0 && first < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// Current phase position [0.0, 1.0)
    phase: f32,
    sample_rate: f32,
    frequency: f32,
    waveform: LfoWaveform,
    /// Fraction of the period spent high, for [`LfoWaveform::Pulse`]
    pulse_width: f32,
    output: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(44100.0, 1.0)
    }
}

impl Lfo {
    /// Create a sine LFO. The sample rate is clamped to >= 1.
    pub fn new(sample_rate: f32, frequency: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate: sample_rate.max(1.0),
            frequency,
            waveform: LfoWaveform::Sine,
            pulse_width: 0.5,
            output: 0.0,
        }
    }

    /// Builder-style waveform selection.
    pub fn with_waveform(mut self, waveform: LfoWaveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Advance the phase by one sample and recompute the output.
    ///
    /// Returns `true` when the phase wrapped, i.e. a new cycle started.
    #[inline]
    pub fn advance(&mut self) -> bool {
        let next = self.phase + self.frequency / self.sample_rate;
        let wrapped = floorf(next);
        self.phase = next - wrapped;
        self.output = self.evaluate();
        wrapped != 0.0
    }

    /// Advance by one sample and return the new value in `[-1, 1]`.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.advance();
        self.output
    }

    /// Current value without advancing.
    pub fn value(&self) -> f32 {
        self.output
    }

    /// Set frequency in Hz
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
    }

    /// Get frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Set waveform
    pub fn set_waveform(&mut self, waveform: LfoWaveform) {
        self.waveform = waveform;
    }

    /// Get waveform
    pub fn waveform(&self) -> LfoWaveform {
        self.waveform
    }

    /// Set the pulse width (clamped to `[0, 1]`).
    pub fn set_pulse_width(&mut self, width: f32) {
        self.pulse_width = width.clamp(0.0, 1.0);
    }

    /// Jump to a phase in `[0, 1)`; out-of-range values wrap.
    ///
    /// 0.0 = 0°, 0.25 = 90°, 0.5 = 180°, 0.75 = 270°
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase - floorf(phase);
        self.output = self.evaluate();
    }

    /// Get current phase (0.0 - 1.0)
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Set the sample rate (clamped to >= 1). The frequency in Hz is kept.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
    }

    /// Get the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Phase and output back to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.output = 0.0;
    }

    fn evaluate(&self) -> f32 {
        match self.waveform {
            LfoWaveform::Sine => sinf(self.phase * 2.0 * PI),
            LfoWaveform::Triangle => {
                if self.phase < 0.5 {
                    4.0 * self.phase - 1.0
                } else {
                    3.0 - 4.0 * self.phase
                }
            }
            LfoWaveform::Saw => 2.0 * self.phase - 1.0,
            LfoWaveform::Pulse => {
                if self.phase < self.pulse_width {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl Modulator for Lfo {
    #[inline]
    fn next_value(&mut self) -> f32 {
        self.next()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        Lfo::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        Lfo::reset(self);
    }
}
