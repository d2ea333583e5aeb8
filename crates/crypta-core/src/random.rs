//! Smoothed random modulator.
//!
//! Picks a new random target every `ceil(sample_rate / frequency)` samples
//! and glides linearly towards it, giving a wandering control signal that
//! never repeats. Each instance owns its own [`ChaCha8Rng`], so instances
//! are independent and a fixed seed reproduces the exact trajectory.
//!
//! # Seeding
//!
//! - [`RandomModulator::with_seed`] - reproducible
//! - [`RandomModulator::from_rng`] - caller-supplied generator
//! - [`RandomModulator::from_entropy`] - non-deterministic (requires `std`)

use libm::ceilf;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::Modulator;

/// Linearly interpolated random walk between uniform targets in `[-1, 1]`.
///
/// # Example
///
/// ```rust
/// use crypta_core::RandomModulator;
///
/// let mut a = RandomModulator::with_seed(44100.0, 0.091, 7);
/// let mut b = RandomModulator::with_seed(44100.0, 0.091, 7);
///
/// for _ in 0..1000 {
///     assert_eq!(a.run(), b.run());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomModulator {
    rng: ChaCha8Rng,
    sample_rate: f32,
    frequency: f32,
    /// Samples per segment
    steps: u32,
    /// Samples elapsed in the current segment
    elapsed: u32,
    current: f32,
    next: f32,
    output: f32,
}

impl RandomModulator {
    /// Creates a modulator seeded with `seed`.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz (clamped to >= 1)
    /// * `frequency` - New targets per second (clamped to `[0.001, sample_rate / 2]`)
    /// * `seed` - Generator seed
    pub fn with_seed(sample_rate: f32, frequency: f32, seed: u64) -> Self {
        Self::from_rng(sample_rate, frequency, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a modulator drawing from an existing generator.
    pub fn from_rng(sample_rate: f32, frequency: f32, rng: ChaCha8Rng) -> Self {
        let mut modulator = Self {
            rng,
            sample_rate: sample_rate.max(1.0),
            frequency,
            steps: 1,
            elapsed: 0,
            current: 0.0,
            next: 0.0,
            output: 0.0,
        };
        modulator.set_frequency(frequency);
        modulator.reset();
        modulator
    }

    /// Creates a modulator seeded from the thread-local generator.
    ///
    /// Output differs between runs.
    #[cfg(feature = "std")]
    pub fn from_entropy(sample_rate: f32, frequency: f32) -> Self {
        Self::from_rng(
            sample_rate,
            frequency,
            ChaCha8Rng::from_rng(&mut rand::rng()),
        )
    }

    /// Advance by one sample and return the interpolated value.
    #[inline]
    pub fn run(&mut self) -> f32 {
        self.elapsed += 1;
        if self.elapsed > self.steps {
            self.current = self.next;
            self.next = self.draw();
            self.elapsed = 0;
        }

        let r = self.elapsed as f32 / self.steps as f32;
        self.output = self.current * (1.0 - r) + self.next * r;
        self.output
    }

    /// Sets the target rate in Hz and restarts the current segment.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(0.001, (self.sample_rate * 0.5).max(0.001));
        self.steps = (ceilf(self.sample_rate / self.frequency) as u32).max(1);
        self.elapsed = 0;
    }

    /// Sets the sample rate (clamped to >= 1) and re-derives the segment length.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.set_frequency(self.frequency);
    }

    /// Zeroes the output and starting point, then draws a fresh target.
    pub fn reset(&mut self) {
        self.output = 0.0;
        self.current = 0.0;
        self.elapsed = 0;
        self.next = self.draw();
    }

    /// Returns the target rate in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Returns the segment length in samples.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Returns the most recent output.
    pub fn value(&self) -> f32 {
        self.output
    }

    fn draw(&mut self) -> f32 {
        self.rng.random::<f32>() * 2.0 - 1.0
    }
}

impl Modulator for RandomModulator {
    #[inline]
    fn next_value(&mut self) -> f32 {
        self.run()
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        RandomModulator::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        RandomModulator::reset(self);
    }
}
