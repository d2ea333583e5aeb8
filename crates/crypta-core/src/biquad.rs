//! Biquad (bi-quadratic) filter.
//!
//! A second-order IIR section in Direct Form II with eight response types.
//! Coefficients are always derived from `(type, cutoff, Q, gain, sample
//! rate)`; they can't be set by hand, and any parameter change recomputes
//! all five of them.
//!
//! The lowpass, highpass, bandpass, band-reject and allpass designs use the
//! bilinear transform with `K = tan(pi * fc / fs)`, normalised by
//! `D = K^2 Q + K + Q`. Shelving and peaking designs follow Zolzer's
//! formulation (DAFX, ch. 2), which has separate boost and cut sets.

use core::f32::consts::{PI, SQRT_2};
use libm::{powf, sqrtf, tanf};

use crate::Effect;

/// Highest design frequency as a fraction of the sample rate. At exactly
/// Nyquist `tan` overflows into a pole pair on the unit circle.
const MAX_DESIGN_RATIO: f32 = 0.499;

/// Response type of a [`Biquad`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Second-order lowpass
    #[default]
    Lowpass,
    /// Second-order highpass
    Highpass,
    /// Constant-skirt bandpass
    Bandpass,
    /// Notch
    Bandreject,
    /// Phase-only response, unity magnitude
    Allpass,
    /// Shelf below the cutoff; uses the gain
    LowShelf,
    /// Shelf above the cutoff; uses the gain
    HighShelf,
    /// Bell around the cutoff; uses gain and Q
    Peak,
}

/// Normalised biquad coefficients (`a0 = 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Feedforward
    pub b0: f32,
    /// Feedforward
    pub b1: f32,
    /// Feedforward
    pub b2: f32,
    /// Feedback
    pub a1: f32,
    /// Feedback
    pub a2: f32,
}

impl Coefficients {
    /// Computes coefficients for a response type.
    ///
    /// Inputs are used as given; clamping happens in [`Biquad`].
    ///
    /// # Arguments
    /// * `filter_type` - Response type
    /// * `cutoff` - Cutoff or center frequency in Hz
    /// * `q` - Quality factor
    /// * `gain_db` - Shelf/peak gain in dB (ignored by the other types)
    /// * `sample_rate` - Sample rate in Hz
    pub fn compute(
        filter_type: FilterType,
        cutoff: f32,
        q: f32,
        gain_db: f32,
        sample_rate: f32,
    ) -> Self {
        let k = tanf(PI * cutoff / sample_rate);
        let kk = k * k;

        match filter_type {
            FilterType::Lowpass
            | FilterType::Highpass
            | FilterType::Bandpass
            | FilterType::Bandreject
            | FilterType::Allpass => {
                let kkq = kk * q;
                let kkm1 = kk - 1.0;
                let d = kkq + k + q;
                let a1 = 2.0 * q * kkm1 / d;
                let a2 = (kkq - k + q) / d;

                let (b0, b1, b2) = match filter_type {
                    FilterType::Lowpass => {
                        let b0 = kkq / d;
                        (b0, 2.0 * b0, b0)
                    }
                    FilterType::Highpass => {
                        let b0 = q / d;
                        (b0, -2.0 * b0, b0)
                    }
                    FilterType::Bandpass => {
                        let b0 = k / d;
                        (b0, 0.0, -b0)
                    }
                    FilterType::Bandreject => {
                        let b0 = q * (1.0 + kk) / d;
                        (b0, 2.0 * q * kkm1 / d, b0)
                    }
                    _ => (a2, a1, 1.0),
                };
                Self { b0, b1, b2, a1, a2 }
            }
            FilterType::LowShelf => low_shelf(k, gain_db),
            FilterType::HighShelf => high_shelf(k, gain_db),
            FilterType::Peak => peak(k, q, gain_db),
        }
    }

    /// Magnitude response at `frequency` Hz.
    pub fn magnitude(&self, frequency: f32, sample_rate: f32) -> f32 {
        let w = 2.0 * PI * frequency / sample_rate;
        let (c1, s1) = (libm::cosf(w), libm::sinf(w));
        let (c2, s2) = (libm::cosf(2.0 * w), libm::sinf(2.0 * w));

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        sqrtf((num_re * num_re + num_im * num_im) / (den_re * den_re + den_im * den_im))
    }
}

/// Linear shelf/peak amplitude for a gain magnitude in dB.
fn amplitude(gain_db: f32) -> f32 {
    powf(10.0, gain_db.abs() / 20.0)
}

fn low_shelf(k: f32, gain_db: f32) -> Coefficients {
    let kk = k * k;
    let v0 = amplitude(gain_db);
    let sv = sqrtf(2.0 * v0);

    if gain_db > 0.0 {
        let d = 1.0 + SQRT_2 * k + kk;
        Coefficients {
            b0: (1.0 + sv * k + v0 * kk) / d,
            b1: 2.0 * (v0 * kk - 1.0) / d,
            b2: (1.0 - sv * k + v0 * kk) / d,
            a1: 2.0 * (kk - 1.0) / d,
            a2: (1.0 - SQRT_2 * k + kk) / d,
        }
    } else {
        let d = 1.0 + sv * k + v0 * kk;
        Coefficients {
            b0: (1.0 + SQRT_2 * k + kk) / d,
            b1: 2.0 * (kk - 1.0) / d,
            b2: (1.0 - SQRT_2 * k + kk) / d,
            a1: 2.0 * (v0 * kk - 1.0) / d,
            a2: (1.0 - sv * k + v0 * kk) / d,
        }
    }
}

fn high_shelf(k: f32, gain_db: f32) -> Coefficients {
    let kk = k * k;
    let v0 = amplitude(gain_db);
    let sv = sqrtf(2.0 * v0);

    if gain_db > 0.0 {
        let d = 1.0 + SQRT_2 * k + kk;
        Coefficients {
            b0: (v0 + sv * k + kk) / d,
            b1: 2.0 * (kk - v0) / d,
            b2: (v0 - sv * k + kk) / d,
            a1: 2.0 * (kk - 1.0) / d,
            a2: (1.0 - SQRT_2 * k + kk) / d,
        }
    } else {
        let d = v0 + sv * k + kk;
        Coefficients {
            b0: (1.0 + SQRT_2 * k + kk) / d,
            b1: 2.0 * (kk - 1.0) / d,
            b2: (1.0 - SQRT_2 * k + kk) / d,
            a1: 2.0 * (kk - v0) / d,
            a2: (v0 - sv * k + kk) / d,
        }
    }
}

fn peak(k: f32, q: f32, gain_db: f32) -> Coefficients {
    let kk = k * k;
    let v0 = amplitude(gain_db);

    if gain_db > 0.0 {
        let d = 1.0 + k / q + kk;
        let b1 = 2.0 * (kk - 1.0) / d;
        Coefficients {
            b0: (1.0 + v0 * k / q + kk) / d,
            b1,
            b2: (1.0 - v0 * k / q + kk) / d,
            a1: b1,
            a2: (1.0 - k / q + kk) / d,
        }
    } else {
        let d = 1.0 + v0 * k / q + kk;
        let b1 = 2.0 * (kk - 1.0) / d;
        Coefficients {
            b0: (1.0 + k / q + kk) / d,
            b1,
            b2: (1.0 - k / q + kk) / d,
            a1: b1,
            a2: (1.0 - v0 * k / q + kk) / d,
        }
    }
}

/// Second-order IIR filter.
///
/// Parameters are clamped on every setter: sample rate to `>= 1`, cutoff
/// to `[0.001, sample_rate / 2]`, Q to `>= 0.001`. There is no NaN or
/// infinity guard on the signal path.
///
/// # Example
///
/// ```rust
/// use crypta_core::{Biquad, FilterType};
///
/// let mut lp = Biquad::new(44100.0, 1000.0, 0.707, FilterType::Lowpass);
///
/// // DC passes through a lowpass
/// let mut out = 0.0;
/// for _ in 0..2000 {
///     out = lp.run(1.0);
/// }
/// assert!((out - 1.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: Coefficients,
    /// Internal state w[n], w[n-1], w[n-2]
    w: [f32; 3],
    output: f32,
    sample_rate: f32,
    cutoff: f32,
    q: f32,
    gain_db: f32,
    filter_type: FilterType,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(44100.0, 11025.0, 0.707, FilterType::Lowpass)
    }
}

impl Biquad {
    /// Creates a biquad with 0 dB gain.
    pub fn new(sample_rate: f32, cutoff: f32, q: f32, filter_type: FilterType) -> Self {
        Self::with_gain(sample_rate, cutoff, q, 0.0, filter_type)
    }

    /// Creates a biquad with a shelf/peak gain in dB.
    pub fn with_gain(
        sample_rate: f32,
        cutoff: f32,
        q: f32,
        gain_db: f32,
        filter_type: FilterType,
    ) -> Self {
        let mut filter = Self {
            coeffs: Coefficients {
                b0: 1.0,
                b1: 0.0,
                b2: 0.0,
                a1: 0.0,
                a2: 0.0,
            },
            w: [0.0; 3],
            output: 0.0,
            sample_rate: sample_rate.max(1.0),
            cutoff,
            q,
            gain_db,
            filter_type,
        };
        filter.update();
        filter
    }

    /// Process one sample (Direct Form II).
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        self.w[2] = self.w[1];
        self.w[1] = self.w[0];
        self.w[0] = input - c.a1 * self.w[1] - c.a2 * self.w[2];
        self.output = c.b0 * self.w[0] + c.b1 * self.w[1] + c.b2 * self.w[2];
        self.output
    }

    /// Sets the cutoff (or center) frequency in Hz.
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = cutoff;
        self.update();
    }

    /// Sets the quality factor.
    pub fn set_q(&mut self, q: f32) {
        self.q = q;
        self.update();
    }

    /// Sets the shelf/peak gain in dB.
    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.gain_db = gain_db;
        self.update();
    }

    /// Changes the response type.
    pub fn set_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        self.update();
    }

    /// Zeroes the filter history.
    pub fn clear(&mut self) {
        self.w = [0.0; 3];
        self.output = 0.0;
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns the clamped cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Returns the clamped quality factor.
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Returns the shelf/peak gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Returns the response type.
    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Returns the current coefficients.
    pub fn coefficients(&self) -> Coefficients {
        self.coeffs
    }

    /// Returns the most recent output.
    pub fn last_output(&self) -> f32 {
        self.output
    }

    fn update(&mut self) {
        self.cutoff = self.cutoff.clamp(0.001, self.sample_rate * 0.5);
        self.q = self.q.max(0.001);
        self.coeffs = Coefficients::compute(
            self.filter_type,
            self.cutoff.min(self.sample_rate * MAX_DESIGN_RATIO),
            self.q,
            self.gain_db,
            self.sample_rate,
        );
    }
}

impl Effect for Biquad {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.run(input)
    }

    /// Re-derives coefficients; the cutoff is re-clamped to the new Nyquist.
    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.update();
    }

    fn reset(&mut self) {
        self.clear();
    }
}
