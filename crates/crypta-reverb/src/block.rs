//! Table-driven stereo reverb block.
//!
//! A [`Block`] owns every filter and modulator of one [`BlockSpec`] by
//! value. Per frame it runs the stages in the spec's topology, lowpasses
//! each channel, applies the output gain and finally lets each modulator
//! retune its stage for the next frame.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec::Vec;

use crypta_core::{
    AllpassFilter, Biquad, CombFilter, Effect, FilterType, Lfo, Modulator, RandomModulator,
    StereoEffect,
};

use crate::tables::{
    BlockSpec, Channel, ModulationSource, ModulationSpec, StageKind, StageSpec, Topology,
};

/// Q of the per-channel lowpass.
const LOWPASS_Q: f32 = 0.707;

/// Scale of the sum/difference mix in the Hadamard topology.
const HADAMARD_SCALE: f32 = 0.707;

/// Seed used for random modulators when no seed is given and no entropy
/// source is available.
#[cfg(not(feature = "std"))]
const FALLBACK_SEED: u64 = 0x6372_7970_7461;

/// Mixes a stream index into a seed so that sibling generators get
/// unrelated sequences.
pub(crate) fn derive_seed(seed: u64, stream: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = seed ^ stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A comb or allpass stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Comb filter stage
    Comb(CombFilter),
    /// Allpass filter stage
    Allpass(AllpassFilter),
}

impl Stage {
    fn from_spec(spec: &StageSpec, sample_rate: f32) -> Self {
        match spec.kind {
            StageKind::Comb => Stage::Comb(CombFilter::new(
                sample_rate,
                spec.max_time,
                spec.time,
                spec.gain,
                spec.feedforward,
                spec.feedback,
            )),
            StageKind::Allpass => Stage::Allpass(AllpassFilter::new(
                sample_rate,
                spec.max_time,
                spec.time,
                spec.gain,
            )),
        }
    }

    /// Process one sample.
    #[inline]
    pub fn run(&mut self, input: f32) -> f32 {
        match self {
            Stage::Comb(f) => f.run(input),
            Stage::Allpass(f) => f.run(input),
        }
    }

    /// Jump the stage's read taps to a new delay time in ms.
    #[inline]
    pub fn retime_discontinuous(&mut self, time: f32) {
        match self {
            Stage::Comb(f) => f.retime_discontinuous(time),
            Stage::Allpass(f) => f.retime_discontinuous(time),
        }
    }

    /// Current delay time in ms.
    pub fn time(&self) -> f32 {
        match self {
            Stage::Comb(f) => f.time(),
            Stage::Allpass(f) => f.time(),
        }
    }

    fn effect_mut(&mut self) -> &mut dyn Effect {
        match self {
            Stage::Comb(f) => f,
            Stage::Allpass(f) => f,
        }
    }
}

#[derive(Debug, Clone)]
enum Source {
    Lfo(Lfo),
    Random(RandomModulator),
}

impl Source {
    fn modulator_mut(&mut self) -> &mut dyn Modulator {
        match self {
            Source::Lfo(m) => m,
            Source::Random(m) => m,
        }
    }
}

/// A modulator and the stage it drives.
#[derive(Debug, Clone)]
struct BoundModulator {
    source: Source,
    spec: ModulationSpec,
}

/// One stereo reverb block built from a [`BlockSpec`].
///
/// # Example
///
/// ```rust
/// use crypta_reverb::{Block, tables};
///
/// let mut block = Block::new(&tables::CHORUSED, 44100.0, Some(1));
///
/// let (l, r) = block.run(1.0, 1.0);
/// assert!(l.is_finite() && r.is_finite());
///
/// // The left LFO has already retuned stage 2 for the next frame
/// let t = block.stage_time(tables::Channel::Left, 2).unwrap();
/// assert!((77.0..=97.0).contains(&t));
/// ```
#[derive(Debug, Clone)]
pub struct Block {
    name: &'static str,
    topology: Topology,
    left: Vec<Stage>,
    right: Vec<Stage>,
    lowpass: [Biquad; 2],
    output_gain: f32,
    modulators: Vec<BoundModulator>,
    sample_rate: f32,
    outputs: (f32, f32),
}

impl Block {
    /// Builds a block.
    ///
    /// # Arguments
    ///
    /// * `spec` - Stage, lowpass and modulation tables
    /// * `sample_rate` - Sample rate in Hz (clamped to >= 1)
    /// * `seed` - Seed for the random modulators. `None` seeds them from
    ///   the thread-local generator when `std` is enabled, making output
    ///   differ between runs.
    pub fn new(spec: &BlockSpec, sample_rate: f32, seed: Option<u64>) -> Self {
        let sample_rate = sample_rate.max(1.0);
        let stages = |specs: &[StageSpec]| -> Vec<Stage> {
            specs.iter().map(|s| Stage::from_spec(s, sample_rate)).collect()
        };

        let modulators = spec
            .modulations
            .iter()
            .enumerate()
            .map(|(i, m)| BoundModulator {
                source: match m.source {
                    ModulationSource::Lfo { frequency } => {
                        Source::Lfo(Lfo::new(sample_rate, frequency))
                    }
                    ModulationSource::Random { frequency } => {
                        Source::Random(random_modulator(sample_rate, frequency, seed, i as u64))
                    }
                },
                spec: *m,
            })
            .collect();

        Self {
            name: spec.name,
            topology: spec.topology,
            left: stages(spec.left),
            right: stages(spec.right),
            lowpass: core::array::from_fn(|_| {
                Biquad::new(sample_rate, spec.lowpass_cutoff, LOWPASS_Q, FilterType::Lowpass)
            }),
            output_gain: spec.output_gain,
            modulators,
            sample_rate,
            outputs: (0.0, 0.0),
        }
    }

    /// Process one stereo frame.
    #[inline]
    pub fn run(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (l, r) = match self.topology {
            Topology::Hadamard => {
                let (l1, l2) = run_split(&mut self.left, left);
                let (r1, r2) = run_split(&mut self.right, right);
                (
                    HADAMARD_SCALE * ((l1 - l2) + (r1 - r2)),
                    HADAMARD_SCALE * ((l1 + l2) + (r1 + r2)),
                )
            }
            Topology::Serial => (
                run_serial(&mut self.left, left),
                run_serial(&mut self.right, right),
            ),
        };

        let out = (
            self.lowpass[0].run(l) * self.output_gain,
            self.lowpass[1].run(r) * self.output_gain,
        );

        for m in &mut self.modulators {
            let time = m.spec.time_for(m.source.modulator_mut().next_value());
            let stages = match m.spec.channel {
                Channel::Left => &mut self.left,
                Channel::Right => &mut self.right,
            };
            if let Some(stage) = stages.get_mut(m.spec.stage) {
                stage.retime_discontinuous(time);
            }
        }

        self.outputs = out;
        out
    }

    /// Silences every stage and lowpass and restarts every modulator.
    pub fn clear(&mut self) {
        for stage in self.left.iter_mut().chain(self.right.iter_mut()) {
            stage.effect_mut().reset();
        }
        for lp in &mut self.lowpass {
            lp.clear();
        }
        for m in &mut self.modulators {
            m.source.modulator_mut().reset();
        }
        self.outputs = (0.0, 0.0);
    }

    /// Propagates a new sample rate to every owned filter and modulator.
    ///
    /// Destructive: all delay buffers are reallocated and zeroed.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        for stage in self.left.iter_mut().chain(self.right.iter_mut()) {
            stage.effect_mut().set_sample_rate(self.sample_rate);
        }
        for lp in &mut self.lowpass {
            lp.set_sample_rate(self.sample_rate);
            lp.clear();
        }
        for m in &mut self.modulators {
            m.source.modulator_mut().set_sample_rate(self.sample_rate);
        }
        self.outputs = (0.0, 0.0);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            block = self.name,
            sample_rate = self.sample_rate,
            "block: sample rate propagated"
        );
    }

    /// Delay time in ms of a stage, or `None` for an invalid index.
    pub fn stage_time(&self, channel: Channel, index: usize) -> Option<f32> {
        let stages = match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        };
        stages.get(index).map(Stage::time)
    }

    /// Number of stages per channel.
    pub fn stage_count(&self) -> usize {
        self.left.len()
    }

    /// Table name the block was built from.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Most recent output frame.
    pub fn outputs(&self) -> (f32, f32) {
        self.outputs
    }
}

impl StereoEffect for Block {
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.run(left, right)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        Block::set_sample_rate(self, sample_rate);
    }

    fn reset(&mut self) {
        self.clear();
    }
}

/// Runs the first half of the stages, then the second half on its output.
/// Returns both intermediate signals.
#[inline]
fn run_split(stages: &mut [Stage], input: f32) -> (f32, f32) {
    let (first, second) = stages.split_at_mut(stages.len() / 2);
    let a = run_serial(first, input);
    let b = run_serial(second, a);
    (a, b)
}

#[inline]
fn run_serial(stages: &mut [Stage], input: f32) -> f32 {
    stages.iter_mut().fold(input, |x, stage| stage.run(x))
}

fn random_modulator(sample_rate: f32, frequency: f32, seed: Option<u64>, stream: u64) -> RandomModulator {
    match seed {
        Some(seed) => RandomModulator::with_seed(sample_rate, frequency, derive_seed(seed, stream)),
        #[cfg(feature = "std")]
        None => RandomModulator::from_entropy(sample_rate, frequency),
        #[cfg(not(feature = "std"))]
        None => RandomModulator::with_seed(
            sample_rate,
            frequency,
            derive_seed(FALLBACK_SEED, stream),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{BLOCKS, CHORUSED, DENSE, EARLY, SHIMMER};

    fn energy(block: &mut Block, range: core::ops::Range<usize>) -> f32 {
        let mut total = 0.0f32;
        for n in 0..range.end {
            let x = if n == 0 { 1.0 } else { 0.0 };
            let (l, r) = block.run(x, x);
            if range.contains(&n) {
                total += l * l + r * r;
            }
        }
        total
    }

    #[test]
    fn test_built_from_every_table() {
        for spec in BLOCKS {
            let block = Block::new(spec, 44100.0, Some(0));
            assert_eq!(block.stage_count(), spec.left.len());
            assert_eq!(block.name(), spec.name);
            assert_eq!(block.stage_time(Channel::Right, 0), Some(spec.right[0].time));
            assert_eq!(block.stage_time(Channel::Left, 99), None);
        }
    }

    #[test]
    fn test_hadamard_direct_path() {
        // Stage gains multiply through on the first frame; delayed paths are still empty
        let mut block = Block::new(&EARLY, 44100.0, Some(0));
        let (l, r) = block.run(1.0, 0.0);
        let l1 = 0.53 * 0.67;
        let l2 = l1 * 0.13 * 0.64;
        let b0 = block.lowpass[0].coefficients().b0;
        assert!((l - b0 * HADAMARD_SCALE * (l1 - l2)).abs() < 1e-6, "l = {l}");
        assert!((r - b0 * HADAMARD_SCALE * (l1 + l2)).abs() < 1e-6, "r = {r}");
    }

    #[test]
    fn test_serial_output_gain() {
        let mut block = Block::new(&CHORUSED, 44100.0, Some(0));
        let (l, _) = block.run(1.0, 0.0);
        let direct = -0.67 * 0.7 * -0.7 * -0.7;
        let b0 = block.lowpass[0].coefficients().b0;
        assert!((l - b0 * direct * 1.3).abs() < 1e-6, "l = {l}");
    }

    #[test]
    fn test_blocks_decay() {
        for spec in [&EARLY, &CHORUSED] {
            let mut early_block = Block::new(spec, 44100.0, Some(3));
            let mut late_block = early_block.clone();
            let early = energy(&mut early_block, 0..44100);
            let late = energy(&mut late_block, 400_000..441_000);
            assert!(late < early * 1e-3, "{}: early={early}, late={late}", spec.name);
        }
    }

    #[test]
    fn test_lfo_retunes_stage_every_frame() {
        let mut block = Block::new(&CHORUSED, 44100.0, Some(0));
        let mut previous = block.stage_time(Channel::Left, 2);
        let mut changes = 0;
        for _ in 0..1000 {
            block.run(0.0, 0.0);
            let t = block.stage_time(Channel::Left, 2);
            if t != previous {
                changes += 1;
            }
            previous = t;
            let rt = block.stage_time(Channel::Right, 2).unwrap();
            assert!((76.0..=96.0).contains(&rt));
        }
        assert!(changes > 900, "changes = {changes}");
        // Unmodulated stages keep their table time
        assert_eq!(block.stage_time(Channel::Left, 1), Some(97.0));
    }

    #[test]
    fn test_random_modulation_bounds() {
        let mut block = Block::new(&SHIMMER, 8000.0, Some(12));
        for _ in 0..50_000 {
            block.run(0.0, 0.0);
            let t = block.stage_time(Channel::Left, 5).unwrap();
            assert!((2134.0..=2172.0).contains(&t), "t = {t}");
            let t = block.stage_time(Channel::Right, 2).unwrap();
            assert!((81.0..=99.0).contains(&t), "t = {t}");
        }
    }

    #[test]
    fn test_seeded_blocks_match() {
        let mut a = Block::new(&SHIMMER, 44100.0, Some(77));
        let mut b = Block::new(&SHIMMER, 44100.0, Some(77));
        for n in 0..5000 {
            let x = if n % 700 == 0 { 1.0 } else { 0.0 };
            assert_eq!(a.run(x, -x), b.run(x, -x));
        }
    }

    #[test]
    fn test_derived_seeds_differ() {
        let seeds: Vec<u64> = (0..4).map(|i| derive_seed(5, i)).collect();
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                assert_ne!(seeds[i], seeds[j]);
            }
        }
        assert_ne!(derive_seed(5, 0), derive_seed(6, 0));
    }

    #[test]
    fn test_clear_silences() {
        let mut block = Block::new(&DENSE, 44100.0, Some(0));
        for n in 0..10_000 {
            block.run((n as f32 * 0.01).sin(), 0.5);
        }
        block.clear();
        assert_eq!(block.outputs(), (0.0, 0.0));
        for _ in 0..10_000 {
            assert_eq!(block.run(0.0, 0.0), (0.0, 0.0));
        }
    }

    #[test]
    fn test_set_sample_rate_propagates() {
        let mut block = Block::new(&SHIMMER, 44100.0, Some(0));
        for _ in 0..1000 {
            block.run(0.3, -0.3);
        }
        block.set_sample_rate(96000.0);
        assert_eq!(block.sample_rate(), 96000.0);
        assert_eq!(block.outputs(), (0.0, 0.0));
        assert_eq!(block.run(0.0, 0.0), (0.0, 0.0));

        block.set_sample_rate(0.0);
        assert_eq!(block.sample_rate(), 1.0);
        for _ in 0..100 {
            let (l, r) = block.run(1.0, 1.0);
            assert!(l.is_finite() && r.is_finite());
        }
    }
}
