//! Property-based tests for crypta-core DSP primitives.
//!
//! Filter stability over the parameter space, delay line timing after
//! arbitrary wraps, and modulator bounds, using proptest for randomized
//! input generation.

use crypta_core::{
    AllpassFilter, Biquad, CombFilter, DelayLine, FilterType, Lfo, LfoWaveform, RandomModulator,
    cosine_interp,
};
use proptest::prelude::*;

const FILTER_TYPES: [FilterType; 8] = [
    FilterType::Lowpass,
    FilterType::Highpass,
    FilterType::Bandpass,
    FilterType::Bandreject,
    FilterType::Allpass,
    FilterType::LowShelf,
    FilterType::HighShelf,
    FilterType::Peak,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any cutoff (20-20000 Hz), Q (0.1-10) and gain (-24..24 dB), every
    /// biquad type produces finite output for random finite input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.1f32..10.0f32,
        gain_db in -24.0f32..24.0f32,
        variant in 0usize..8,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let filter_type = FILTER_TYPES[variant];
        let mut filter = Biquad::with_gain(48000.0, freq, q, gain_db, filter_type);

        for _ in 0..32 {
            for &sample in &input {
                let out = filter.run(sample);
                prop_assert!(
                    out.is_finite(),
                    "{:?} (freq={}, q={}, gain={}) produced {} for input {}",
                    filter_type, freq, q, gain_db, out, sample
                );
            }
        }
    }

    /// Whatever value is requested, the stored cutoff lies in [0.001, nyquist]
    /// and Q stays positive.
    #[test]
    fn biquad_parameters_clamped(
        sample_rate in -1000.0f32..192000.0f32,
        cutoff in -1.0e6f32..1.0e6f32,
        q in -10.0f32..10.0f32,
    ) {
        let filter = Biquad::new(sample_rate, cutoff, q, FilterType::Lowpass);
        prop_assert!(filter.sample_rate() >= 1.0);
        prop_assert!(filter.cutoff() >= 0.001);
        prop_assert!(filter.cutoff() <= filter.sample_rate() * 0.5);
        prop_assert!(filter.q() >= 0.001);
    }

    /// With zero feedback, an impulse comes out of the delay line at
    /// round(T * sr / 1000) samples regardless of how often the buffer wrapped.
    #[test]
    fn delay_impulse_position(
        time in 1.0f32..40.0f32,
        sr_index in 0usize..4,
        prewrap in 0usize..5000,
    ) {
        let sample_rate = [22050.0f32, 44100.0, 48000.0, 96000.0][sr_index];
        let exact = time * sample_rate / 1000.0;
        // Equal tap weights make the peak ambiguous
        prop_assume!((exact - libm::floorf(exact) - 0.5).abs() > 0.05);

        let mut delay = DelayLine::new(sample_rate, time + 5.0, time, 0.0);
        for _ in 0..prewrap {
            delay.run(0.0);
        }

        let expected = libm::roundf(exact) as usize;
        let mut peak = (0usize, 0.0f32);
        for n in 0..expected + 10 {
            let out = delay.run(if n == 0 { 1.0 } else { 0.0 });
            if out.abs() > peak.1 {
                peak = (n, out.abs());
            }
        }
        prop_assert_eq!(peak.0, expected);
    }

    /// Requested times are always clamped into [0, max_time].
    #[test]
    fn delay_time_clamped(max_time in 0.0f32..500.0f32, time in -1000.0f32..1000.0f32) {
        let mut delay = DelayLine::new(44100.0, max_time, 0.0, 0.0);
        delay.set_time(time);
        prop_assert!(delay.time() >= 0.0 && delay.time() <= delay.max_time());
        prop_assert!(delay.delay_samples() < delay.capacity());
    }

    /// Cosine interpolation never leaves the segment between its endpoints.
    #[test]
    fn cosine_interp_bounded(a in -10.0f32..10.0f32, b in -10.0f32..10.0f32, t in 0.0f32..1.0f32) {
        let y = cosine_interp(a, b, t);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        prop_assert!(y >= lo - 1e-5 && y <= hi + 1e-5, "{} not in [{}, {}]", y, lo, hi);
    }

    /// Combs with |feedback| < 1 and allpasses with |gain| < 1 stay finite
    /// while their delay times are retuned every sample.
    #[test]
    fn retuned_filters_stay_finite(
        feedback in -0.95f32..0.95f32,
        gain in -0.95f32..0.95f32,
        base in 2.0f32..50.0f32,
        depth in 0.0f32..10.0f32,
        rate in 0.05f32..5.0f32,
    ) {
        let mut comb = CombFilter::new(44100.0, 100.0, base, 0.5, 0.5, feedback);
        let mut allpass = AllpassFilter::new(44100.0, 100.0, base, gain);
        let mut lfo = Lfo::new(44100.0, rate).with_waveform(LfoWaveform::Triangle);

        for n in 0..4096 {
            let x = if n % 512 == 0 { 1.0 } else { 0.0 };
            let y = allpass.run(comb.run(x));
            prop_assert!(y.is_finite());
            let t = base + depth * lfo.next();
            comb.retime_discontinuous(t);
            allpass.retime_discontinuous(t);
        }
    }

    /// Random modulator output stays in [-1, 1] for any seed and rate.
    #[test]
    fn random_modulator_bounded(seed in any::<u64>(), freq in 0.001f32..2000.0f32) {
        let mut modulator = RandomModulator::with_seed(8000.0, freq, seed);
        for _ in 0..2048 {
            let v = modulator.run();
            prop_assert!((-1.0..=1.0).contains(&v), "v = {}", v);
        }
    }
}
