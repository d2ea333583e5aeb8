//! Crypta Core - per-sample DSP primitives
//!
//! The building blocks of the crypta reverberator: delay-based filters,
//! a biquad, and the modulators that retune delay times while audio runs.
//! Everything processes one `f32` sample at a time and never allocates in
//! the audio path.
//!
//! # Core Abstractions
//!
//! ## Traits
//!
//! - [`Effect`] - Mono processor (`process`, `process_block`, `set_sample_rate`, `reset`)
//! - [`Modulator`] - Control-rate source with no input
//! - [`StereoEffect`] - Two-channel processor, implemented by the reverb crate
//!
//! ## Delay-Based Filters
//!
//! - [`DelayLine`] - Circular buffer with feedback and cosine-interpolated fractional reads
//! - [`CombFilter`] - Direct, feedforward and feedback paths over two delay lines
//! - [`AllpassFilter`] - Schroeder allpass over two delay lines
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR with eight [`FilterType`]s, including shelves and peak
//!
//! ## Modulators
//!
//! - [`Lfo`] - Sine/triangle/saw/pulse oscillator
//! - [`RandomModulator`] - Seeded, linearly smoothed random walk
//!
//! ## Utilities
//!
//! - Math functions: [`cosine_interp`], [`wet_dry_mix`], [`ms_to_samples`],
//!   [`flush_denormal`], [`db_to_linear`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build without the standard library.
//! Only [`RandomModulator::from_entropy`] is unavailable without `std`.
//!
//! ```toml
//! [dependencies]
//! crypta-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use crypta_core::{AllpassFilter, Biquad, CombFilter, Effect, FilterType};
//!
//! let mut comb = CombFilter::new(44100.0, 300.0, 277.0, 0.53, 0.45, 0.33);
//! let mut allpass = AllpassFilter::new(44100.0, 100.0, 97.0, 0.7);
//! let mut lowpass = Biquad::new(44100.0, 8000.0, 0.707, FilterType::Lowpass);
//!
//! let input = [1.0, 0.0, 0.0, 0.0];
//! let mut output = [0.0; 4];
//! for (x, y) in input.iter().zip(output.iter_mut()) {
//!     *y = lowpass.run(allpass.run(comb.run(*x)));
//! }
//!
//! // Or through the trait, one block at a time
//! comb.process_block_inplace(&mut output);
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature, buffer reallocations are reported at
//! `debug` level. Nothing is logged from per-sample code.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod biquad;
pub mod comb;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod random;

// Re-export main types at crate root
pub use allpass::AllpassFilter;
pub use biquad::{Biquad, Coefficients, FilterType};
pub use comb::CombFilter;
pub use delay::DelayLine;
pub use effect::{Effect, Modulator, StereoEffect};
pub use lfo::{Lfo, LfoWaveform};
pub use math::{
    cosine_interp, db_to_linear, flush_denormal, lerp, ms_to_samples, wet_dry_mix,
    wet_dry_mix_stereo,
};
pub use random::RandomModulator;

/// Re-exported so callers can build generators for [`RandomModulator::from_rng`].
pub use rand_chacha::ChaCha8Rng;
