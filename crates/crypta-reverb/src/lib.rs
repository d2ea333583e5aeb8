//! Crypta Reverb - four-block modulated stereo reverberator
//!
//! Built from the primitives in `crypta-core`:
//!
//! - [`Reverberator`] - The complete effect: four blocks, three wiring
//!   modes, per-block wet amounts and an output lowpass
//! - [`Block`] - One stereo block built from a [`tables::BlockSpec`]
//! - [`ReverbSettings`] / [`ReverbMode`] - Construction parameters
//! - [`tables`] - The stage, lowpass and modulation tables of the four blocks
//!
//! ## Example
//!
//! ```rust
//! use crypta_core::StereoEffect;
//! use crypta_reverb::{ReverbMode, ReverbSettings, Reverberator};
//!
//! let mut reverb = Reverberator::new(&ReverbSettings {
//!     sample_rate: 48000.0,
//!     mode: ReverbMode::Serial,
//!     seed: Some(7),
//!     ..ReverbSettings::default()
//! });
//!
//! let left = [0.5, 0.0, 0.0, 0.0];
//! let right = [0.5, 0.0, 0.0, 0.0];
//! let mut out_l = [0.0; 4];
//! let mut out_r = [0.0; 4];
//! reverb.process_block_stereo(&left, &right, &mut out_l, &mut out_r);
//! ```
//!
//! ## Determinism
//!
//! [`ReverbSettings::seed`] seeds the random modulators of block 4. With
//! `Some(seed)` two reverberators produce bit-identical output; with
//! `None` every instance draws its own seed (requires `std`, otherwise a
//! fixed fallback seed is used).
//!
//! ## Features
//!
//! - `std` (default) - entropy seeding
//! - `serde` - `Serialize`/`Deserialize` for [`ReverbSettings`] and [`ReverbMode`]
//! - `tracing` - debug events for construction, sample rate and mode changes

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod block;
pub mod reverberator;
pub mod settings;
pub mod tables;

pub use block::{Block, Stage};
pub use reverberator::{BLOCK_COUNT, Reverberator};
pub use settings::{ReverbMode, ReverbSettings};
pub use tables::{BLOCKS, BlockSpec, Channel};
