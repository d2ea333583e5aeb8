//! Block tuning tables.
//!
//! Each reverb block is described by a [`BlockSpec`]: the filter stages of
//! both channels, how they are wired, the channel lowpass and the
//! modulators that retune delay times while audio runs. [`Block::new`]
//! builds any of them; the four tables below are the crypta voicing.
//!
//! | Block | Topology | Stages | Lowpass | Modulation |
//! |-------|----------|--------|---------|------------|
//! | [`EARLY`] | Hadamard | 4 combs | 15 kHz | - |
//! | [`DENSE`] | Hadamard | 4 combs | 12 kHz | - |
//! | [`CHORUSED`] | Serial | 4 allpasses | 8 kHz | sine LFO, stage 2 |
//! | [`SHIMMER`] | Serial | 6 allpasses | 4 kHz | random, stages 2 and 5 |
//!
//! All times are in milliseconds.
//!
//! [`Block::new`]: crate::Block::new

/// Filter type of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// [`CombFilter`](crypta_core::CombFilter)
    Comb,
    /// [`AllpassFilter`](crypta_core::AllpassFilter)
    Allpass,
}

/// One filter stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSpec {
    /// Filter type
    pub kind: StageKind,
    /// Buffer length in ms
    pub max_time: f32,
    /// Initial delay in ms
    pub time: f32,
    /// Direct gain (comb) or allpass coefficient
    pub gain: f32,
    /// Feedforward gain, combs only
    pub feedforward: f32,
    /// Feedback gain, combs only
    pub feedback: f32,
}

impl StageSpec {
    /// Comb stage.
    pub const fn comb(max_time: f32, time: f32, gain: f32, feedforward: f32, feedback: f32) -> Self {
        Self {
            kind: StageKind::Comb,
            max_time,
            time,
            gain,
            feedforward,
            feedback,
        }
    }

    /// Allpass stage.
    pub const fn allpass(max_time: f32, time: f32, gain: f32) -> Self {
        Self {
            kind: StageKind::Allpass,
            max_time,
            time,
            gain,
            feedforward: 0.0,
            feedback: 0.0,
        }
    }
}

/// How a block wires its stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Each channel runs its first half of stages, then its second half;
    /// the four intermediate signals are mixed by a 2x2 Hadamard-style
    /// sum/difference matrix scaled by 0.707 before the lowpass.
    Hadamard,
    /// Each channel runs all its stages in series, then the lowpass.
    Serial,
}

/// Stereo channel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Left channel
    Left,
    /// Right channel
    Right,
}

/// Control signal driving a modulated stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModulationSource {
    /// Sine [`Lfo`](crypta_core::Lfo) at the given rate in Hz
    Lfo {
        /// Rate in Hz
        frequency: f32,
    },
    /// [`RandomModulator`](crypta_core::RandomModulator) at the given rate in Hz
    Random {
        /// New targets per second
        frequency: f32,
    },
}

/// Binding of a modulator to one stage's delay time.
///
/// After each processed frame the stage is retuned to
/// `(value + bias) * depth + offset` ms, where `value` is the modulator
/// output in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationSpec {
    /// Channel of the modulated stage
    pub channel: Channel,
    /// Index of the modulated stage within its channel
    pub stage: usize,
    /// Modulator
    pub source: ModulationSource,
    /// Scale in ms
    pub depth: f32,
    /// Added to the modulator value before scaling
    pub bias: f32,
    /// Center offset in ms
    pub offset: f32,
}

impl ModulationSpec {
    /// Delay time in ms for a modulator value.
    #[inline]
    pub fn time_for(&self, value: f32) -> f32 {
        (value + self.bias) * self.depth + self.offset
    }
}

/// Complete description of one reverb block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockSpec {
    /// Short identifier used in logs
    pub name: &'static str,
    /// Stage wiring
    pub topology: Topology,
    /// Left channel stages, in processing order
    pub left: &'static [StageSpec],
    /// Right channel stages, in processing order
    pub right: &'static [StageSpec],
    /// Cutoff of the per-channel output lowpass, in Hz
    pub lowpass_cutoff: f32,
    /// Gain applied after the lowpass
    pub output_gain: f32,
    /// Delay-time modulators
    pub modulations: &'static [ModulationSpec],
}

const fn lfo(channel: Channel, stage: usize, frequency: f32, offset: f32) -> ModulationSpec {
    ModulationSpec {
        channel,
        stage,
        source: ModulationSource::Lfo { frequency },
        depth: 10.0,
        bias: 1.0,
        offset,
    }
}

const fn random(
    channel: Channel,
    stage: usize,
    frequency: f32,
    bias: f32,
    depth: f32,
    offset: f32,
) -> ModulationSpec {
    ModulationSpec {
        channel,
        stage,
        source: ModulationSource::Random { frequency },
        depth,
        bias,
        offset,
    }
}

/// Block 1: sparse early reflections from short and long combs.
pub const EARLY: BlockSpec = BlockSpec {
    name: "early",
    topology: Topology::Hadamard,
    left: &[
        StageSpec::comb(300.0, 277.0, 0.53, 0.45, 0.33),
        StageSpec::comb(30.0, 11.0, 0.67, -0.57, 0.77),
        StageSpec::comb(30.0, 13.0, 0.13, -0.71, 0.65),
        StageSpec::comb(300.0, 293.0, 0.64, 0.76, -0.75),
    ],
    right: &[
        StageSpec::comb(300.0, 233.0, 0.53, 0.33, 0.45),
        StageSpec::comb(30.0, 29.0, 0.67, 0.57, -0.77),
        StageSpec::comb(30.0, 5.0, 0.13, 0.71, -0.65),
        StageSpec::comb(300.0, 283.0, 0.64, -0.76, 0.75),
    ],
    lowpass_cutoff: 15000.0,
    output_gain: 1.0,
    modulations: &[],
};

/// Block 2: longer combs building echo density.
pub const DENSE: BlockSpec = BlockSpec {
    name: "dense",
    topology: Topology::Hadamard,
    left: &[
        StageSpec::comb(700.0, 677.0, 0.53, 0.45, 0.33),
        StageSpec::comb(1200.0, 1117.0, 0.67, -0.55, 0.77),
        StageSpec::comb(300.0, 293.0, 0.13, -0.71, 0.65),
        StageSpec::comb(900.0, 797.0, 0.64, 0.66, -0.65),
    ],
    right: &[
        StageSpec::comb(700.0, 691.0, 0.53, 0.33, 0.45),
        StageSpec::comb(1200.0, 1129.0, 0.65, 0.57, -0.77),
        StageSpec::comb(300.0, 281.0, 0.13, 0.71, -0.65),
        StageSpec::comb(900.0, 877.0, 0.64, -0.66, 0.65),
    ],
    lowpass_cutoff: 12000.0,
    output_gain: 1.0,
    modulations: &[],
};

/// Block 3: allpass diffusion with a slow sine sweep on stage 2.
pub const CHORUSED: BlockSpec = BlockSpec {
    name: "chorused",
    topology: Topology::Serial,
    left: &[
        StageSpec::allpass(10.0, 7.0, 0.67),
        StageSpec::allpass(100.0, 97.0, -0.7),
        StageSpec::allpass(200.0, 89.0, 0.7),
        StageSpec::allpass(20.0, 19.0, 0.7),
    ],
    right: &[
        StageSpec::allpass(10.0, 3.0, -0.67),
        StageSpec::allpass(100.0, 73.0, 0.7),
        StageSpec::allpass(200.0, 97.0, 0.7),
        StageSpec::allpass(20.0, 17.0, 0.7),
    ],
    lowpass_cutoff: 8000.0,
    output_gain: 1.3,
    modulations: &[
        lfo(Channel::Left, 2, 0.19, 77.0),
        lfo(Channel::Right, 2, 0.17, 76.0),
    ],
};

/// Block 4: long allpass chain with randomly wandering delay times.
pub const SHIMMER: BlockSpec = BlockSpec {
    name: "shimmer",
    topology: Topology::Serial,
    left: &[
        StageSpec::allpass(300.0, 233.0, -0.67),
        StageSpec::allpass(30.0, 29.0, -0.7),
        StageSpec::allpass(300.0, 89.0, 0.7),
        StageSpec::allpass(100.0, 97.0, 0.7),
        StageSpec::allpass(20.0, 17.0, 0.7),
        StageSpec::allpass(5000.0, 2153.0, 0.7),
    ],
    right: &[
        StageSpec::allpass(300.0, 239.0, 0.67),
        StageSpec::allpass(30.0, 23.0, 0.7),
        StageSpec::allpass(300.0, 97.0, 0.7),
        StageSpec::allpass(100.0, 89.0, 0.7),
        StageSpec::allpass(20.0, 19.0, -0.7),
        StageSpec::allpass(5000.0, 2129.0, -0.7),
    ],
    lowpass_cutoff: 4000.0,
    output_gain: 1.0,
    modulations: &[
        random(Channel::Left, 2, 0.091, 1.0, 9.0, 78.0),
        random(Channel::Left, 5, 0.11, 0.0, 19.0, 2153.0),
        random(Channel::Right, 2, 0.097, 1.0, 9.0, 81.0),
        random(Channel::Right, 5, 0.09, 0.0, 17.0, 2129.0),
    ],
};

/// The four blocks of the reverberator, in block-number order.
pub const BLOCKS: [&BlockSpec; 4] = [&EARLY, &DENSE, &CHORUSED, &SHIMMER];
