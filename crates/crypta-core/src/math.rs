//! Mathematical utility functions for DSP.
//!
//! Small, allocation-free helpers shared by the primitives and the reverb
//! crate. All functions are `no_std` friendly and use `libm` for
//! transcendental math.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] - Convert decibels to linear gain
//!
//! # Interpolation & Mixing
//!
//! - [`lerp`] - Linear interpolation
//! - [`cosine_interp`] - Two-point cosine interpolation (fractional delay reads)
//! - [`wet_dry_mix`] / [`wet_dry_mix_stereo`] - Dry/wet blend
//!
//! # Utilities
//!
//! - [`ms_to_samples`] - Time conversion
//! - [`flush_denormal`] - Subnormal flushing for feedback paths

use libm::{cosf, expf};

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use crypta_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cosine interpolation between two adjacent samples.
///
/// The weight follows half a cosine period, `(1 - cos(pi * t)) / 2`, so the
/// curve has zero slope at both endpoints. Used by [`DelayLine`](crate::DelayLine)
/// for its fractional read.
///
/// # Arguments
/// * `a` - Sample at the integer (floor) position
/// * `b` - Sample at the next (ceil) position
/// * `t` - Fractional position in \[0.0, 1.0\)
#[inline]
pub fn cosine_interp(a: f32, b: f32, t: f32) -> f32 {
    let weight = (1.0 - cosf(t * core::f32::consts::PI)) * 0.5;
    a * (1.0 - weight) + b * weight
}

/// Convert milliseconds to samples.
///
/// Divides by 1000 rather than multiplying by 0.001 so integer millisecond
/// and sample-rate pairs map to exact integer sample counts.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures. This function replaces values below
/// 1e-20 with zero, providing margin before the IEEE 754 subnormal range
/// begins. NaN is passed through unchanged.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals.
///
/// Equivalent to `wet * mix + (1 - mix) * dry` but uses one fewer multiply:
/// `dry + (wet - dry) * mix`.
///
/// # Arguments
///
/// * `dry` - Unprocessed signal
/// * `wet` - Processed signal
/// * `mix` - Blend factor in \[0.0, 1.0\]: 0.0 = all dry, 1.0 = all wet
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}

/// Stereo crossfade between dry and wet signals.
///
/// Applies [`wet_dry_mix`] independently to left and right channels.
#[inline]
pub fn wet_dry_mix_stereo(dry: (f32, f32), wet: (f32, f32), mix: f32) -> (f32, f32) {
    (wet_dry_mix(dry.0, wet.0, mix), wet_dry_mix(dry.1, wet.1, mix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_known_values() {
        // 0 dB = 1.0 linear
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        // -6 dB ≈ 0.5 linear
        assert!((db_to_linear(-6.0206) - 0.5).abs() < 0.001);
        // +6 dB ≈ 2.0 linear
        assert!((db_to_linear(6.0206) - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }

    #[test]
    fn test_cosine_interp_endpoints_and_midpoint() {
        assert!((cosine_interp(2.0, 4.0, 0.0) - 2.0).abs() < 1e-6);
        assert!((cosine_interp(2.0, 4.0, 0.5) - 3.0).abs() < 1e-5);
        // Approaches b as t → 1
        assert!((cosine_interp(2.0, 4.0, 0.999) - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_cosine_interp_is_monotonic() {
        let mut prev = cosine_interp(0.0, 1.0, 0.0);
        for i in 1..100 {
            let v = cosine_interp(0.0, 1.0, i as f32 / 100.0);
            assert!(v >= prev, "not monotonic at {i}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_ms_samples_conversion() {
        assert_eq!(ms_to_samples(10.0, 48000.0), 480.0);
        assert_eq!(ms_to_samples(10.0, 44100.0), 441.0);
    }

    #[test]
    fn test_wet_dry_mix() {
        // All dry
        assert_eq!(wet_dry_mix(1.0, 0.5, 0.0), 1.0);
        // All wet
        assert_eq!(wet_dry_mix(1.0, 0.5, 1.0), 0.5);
        // Equivalent to dry*(1-mix)+wet*mix
        let dry = 0.3;
        let wet = 0.8;
        let mix = 0.7;
        let expected = dry * (1.0 - mix) + wet * mix;
        assert!((wet_dry_mix(dry, wet, mix) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_wet_dry_mix_stereo() {
        let (l, r) = wet_dry_mix_stereo((1.0, 0.5), (0.0, 1.0), 0.5);
        assert!((l - 0.5).abs() < 1e-6);
        assert!((r - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);

        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-21), 0.0);
        assert_eq!(flush_denormal(1e-38), 0.0);
        assert!(flush_denormal(f32::NAN).is_nan());
    }
}
