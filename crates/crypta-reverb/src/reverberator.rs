//! Four-block stereo reverberator.
//!
//! Owns one [`Block`] per entry of [`BLOCKS`] and wires them according to
//! the [`ReverbMode`]:
//!
//! ```text
//! Parallel:  in ─┬─ 1 ─┐
//!                ├─ 2 ─┤
//!                ├─ 3 ─┼─ avg ── lowpass ── out
//!                └─ 4 ─┘
//!
//! Serial:    in ── 1 ── 2 ── 3 ── 4 ── lowpass ── out
//!
//! Hybrid:    in ── 3 ── 4 ─┬─ 1 ─┐
//!                          └─ 2 ─┴─ avg ── lowpass ── out
//! ```
//!
//! Every block is blended against its own input with its wet amount, so
//! with all wets at 0 the reverberator reduces to the output lowpass.
//! All four blocks run on every frame in every mode, which keeps their
//! modulators in step across mode changes.

use crypta_core::{Biquad, Effect, FilterType, StereoEffect, wet_dry_mix_stereo};

use crate::block::{Block, derive_seed};
use crate::settings::{ReverbMode, ReverbSettings};
use crate::tables::BLOCKS;

/// Q of the output lowpass.
const OUTPUT_Q: f32 = 0.707;

/// Number of blocks.
pub const BLOCK_COUNT: usize = 4;

/// Modulated stereo reverberator.
///
/// # Example
///
/// ```rust
/// use crypta_reverb::{ReverbMode, ReverbSettings, Reverberator};
///
/// let mut reverb = Reverberator::new(&ReverbSettings {
///     mode: ReverbMode::Hybrid,
///     seed: Some(42),
///     ..ReverbSettings::default()
/// });
/// reverb.set_block_wet(0.5, 1);
///
/// let (l, r) = reverb.run(1.0, 1.0);
/// assert!(l.is_finite() && r.is_finite());
/// assert_eq!(reverb.outputs(), (l, r));
/// ```
#[derive(Debug, Clone)]
pub struct Reverberator {
    blocks: [Block; BLOCK_COUNT],
    lowpass: [Biquad; 2],
    block_wet: [f32; BLOCK_COUNT],
    lowpass_cutoff: f32,
    mode: ReverbMode,
    sample_rate: f32,
    seed: Option<u64>,
    outputs: (f32, f32),
}

impl Default for Reverberator {
    fn default() -> Self {
        Self::new(&ReverbSettings::default())
    }
}

impl Reverberator {
    /// Builds a reverberator. Out-of-range settings are clamped.
    pub fn new(settings: &ReverbSettings) -> Self {
        let sample_rate = settings.sample_rate.max(1.0);
        let lowpass_cutoff = settings.lowpass_cutoff.clamp(0.0, sample_rate * 0.5);

        let blocks = core::array::from_fn(|i| {
            let seed = settings.seed.map(|s| derive_seed(s, i as u64));
            Block::new(BLOCKS[i], sample_rate, seed)
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            mode = settings.mode.name(),
            seeded = settings.seed.is_some(),
            "reverberator: built"
        );

        Self {
            blocks,
            lowpass: core::array::from_fn(|_| {
                Biquad::new(sample_rate, lowpass_cutoff, OUTPUT_Q, FilterType::Lowpass)
            }),
            block_wet: settings.block_wet.map(|w| w.clamp(0.0, 1.0)),
            lowpass_cutoff,
            mode: settings.mode,
            sample_rate,
            seed: settings.seed,
            outputs: (0.0, 0.0),
        }
    }

    /// Process one stereo frame.
    #[inline]
    pub fn run(&mut self, left: f32, right: f32) -> (f32, f32) {
        let dry = (left, right);
        let [b1, b2, b3, b4] = &mut self.blocks;
        let [w1, w2, w3, w4] = self.block_wet;

        let (l, r) = match self.mode {
            ReverbMode::Parallel => {
                let m1 = blend(b1, w1, dry);
                let m2 = blend(b2, w2, dry);
                let m3 = blend(b3, w3, dry);
                let m4 = blend(b4, w4, dry);
                (
                    ((m1.0 + m2.0) + (m3.0 + m4.0)) * 0.25,
                    ((m1.1 + m2.1) + (m3.1 + m4.1)) * 0.25,
                )
            }
            ReverbMode::Serial => {
                let x = blend(b1, w1, dry);
                let x = blend(b2, w2, x);
                let x = blend(b3, w3, x);
                blend(b4, w4, x)
            }
            ReverbMode::Hybrid => {
                let mid = blend(b4, w4, blend(b3, w3, dry));
                let a = blend(b1, w1, mid);
                let b = blend(b2, w2, mid);
                ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5)
            }
        };

        self.outputs = (self.lowpass[0].run(l), self.lowpass[1].run(r));
        self.outputs
    }

    /// Silences every block and the output lowpass.
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
        for lp in &mut self.lowpass {
            lp.clear();
        }
        self.outputs = (0.0, 0.0);
    }

    /// Sets the sample rate (clamped to >= 1) on every block and the output
    /// lowpass, then re-clamps the cutoff to the new Nyquist.
    ///
    /// Destructive: all delay buffers are reallocated and zeroed.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        for block in &mut self.blocks {
            block.set_sample_rate(self.sample_rate);
        }
        for lp in &mut self.lowpass {
            lp.set_sample_rate(self.sample_rate);
            lp.clear();
        }
        self.set_lowpass_cutoff(self.lowpass_cutoff);
        self.outputs = (0.0, 0.0);
    }

    /// Sets the wet amount (clamped to `[0, 1]`) of block 1 to 4.
    ///
    /// Other block numbers are ignored.
    pub fn set_block_wet(&mut self, wet: f32, block: usize) {
        match block.checked_sub(1).and_then(|i| self.block_wet.get_mut(i)) {
            Some(slot) => *slot = wet.clamp(0.0, 1.0),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(block, "reverberator: ignoring wet for unknown block");
            }
        }
    }

    /// Sets the output lowpass cutoff in Hz, clamped to `[0, sample_rate / 2]`.
    pub fn set_lowpass_cutoff(&mut self, cutoff: f32) {
        self.lowpass_cutoff = cutoff.clamp(0.0, self.sample_rate * 0.5);
        for lp in &mut self.lowpass {
            lp.set_cutoff(self.lowpass_cutoff);
        }
    }

    /// Selects how the blocks are wired. Takes effect on the next frame;
    /// block state is kept.
    pub fn set_mode(&mut self, mode: ReverbMode) {
        #[cfg(feature = "tracing")]
        tracing::debug!(from = self.mode.name(), to = mode.name(), "reverberator: mode change");
        self.mode = mode;
    }

    /// Selects the mode by index; out-of-range indices select the last mode.
    pub fn set_mode_index(&mut self, index: u32) {
        self.set_mode(ReverbMode::from_index(index));
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Wet amount of block 1 to 4, or 0 for any other number.
    pub fn block_wet(&self, block: usize) -> f32 {
        block
            .checked_sub(1)
            .and_then(|i| self.block_wet.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Output lowpass cutoff in Hz.
    pub fn lowpass_cutoff(&self) -> f32 {
        self.lowpass_cutoff
    }

    /// Current mode.
    pub fn mode(&self) -> ReverbMode {
        self.mode
    }

    /// Most recent output frame.
    pub fn outputs(&self) -> (f32, f32) {
        self.outputs
    }

    /// Borrow a block by number (1 to 4).
    pub fn block(&self, block: usize) -> Option<&Block> {
        block.checked_sub(1).and_then(|i| self.blocks.get(i))
    }

    /// Snapshot of the current settings, with values as clamped.
    pub fn settings(&self) -> ReverbSettings {
        ReverbSettings {
            sample_rate: self.sample_rate,
            block_wet: self.block_wet,
            lowpass_cutoff: self.lowpass_cutoff,
            mode: self.mode,
            seed: self.seed,
        }
    }
}

impl StereoEffect for Reverberator {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.run(left, right)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        Reverberator::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// Runs a block and blends its output against its input.
#[inline]
fn blend(block: &mut Block, wet: f32, input: (f32, f32)) -> (f32, f32) {
    let out = block.run(input.0, input.1);
    wet_dry_mix_stereo(input, out, wet)
}
