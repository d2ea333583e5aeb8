//! Settings validation.
//!
//! The reverberator clamps every out-of-range value at runtime. Presets are
//! held to a stricter standard: a preset that would be clamped is reported
//! here instead of silently changing meaning.
//!
//! # Example
//!
//! ```rust
//! use crypta_config::{ValidationError, validate_settings};
//! use crypta_reverb::ReverbSettings;
//!
//! assert!(validate_settings(&ReverbSettings::default()).is_ok());
//!
//! let settings = ReverbSettings {
//!     lowpass_cutoff: 30000.0,
//!     ..ReverbSettings::default()
//! };
//! assert!(matches!(
//!     validate_settings(&settings),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use crypta_reverb::{ReverbMode, ReverbSettings};
use thiserror::Error;

/// Lowest accepted sample rate in Hz.
pub const MIN_SAMPLE_RATE: f32 = 1.0;

/// Highest accepted sample rate in Hz.
pub const MAX_SAMPLE_RATE: f32 = 768_000.0;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Unknown reverb mode name.
    #[error("unknown reverb mode: {0}")]
    InvalidMode(String),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check every field of `settings` against its accepted range.
///
/// - `sample_rate` in `[MIN_SAMPLE_RATE, MAX_SAMPLE_RATE]`
/// - each `block_wet` in `[0, 1]`
/// - `lowpass_cutoff` in `[0, sample_rate / 2]`
///
/// NaN fails every range. All failures are collected; more than one is
/// reported as [`ValidationError::Multiple`].
pub fn validate_settings(settings: &ReverbSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    check_range(
        &mut errors,
        "sample_rate",
        settings.sample_rate,
        MIN_SAMPLE_RATE,
        MAX_SAMPLE_RATE,
    );

    for (i, &wet) in settings.block_wet.iter().enumerate() {
        check_range(&mut errors, &format!("block_wet[{}]", i + 1), wet, 0.0, 1.0);
    }

    // Nyquist of the nearest valid rate
    let nyquist = settings.sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE) * 0.5;
    check_range(
        &mut errors,
        "lowpass_cutoff",
        settings.lowpass_cutoff,
        0.0,
        nyquist,
    );

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Parse a mode name (`parallel`, `serial`, `hybrid`, case-insensitive)
/// or index (`0`, `1`, `2`).
pub fn parse_mode(name: &str) -> ValidationResult<ReverbMode> {
    let normalized = name.trim().to_lowercase();
    ReverbMode::from_name(&normalized)
        .or_else(|| {
            normalized
                .parse::<u32>()
                .ok()
                .filter(|&i| i < ReverbMode::ALL.len() as u32)
                .map(ReverbMode::from_index)
        })
        .ok_or_else(|| ValidationError::InvalidMode(name.to_string()))
}

fn check_range(errors: &mut Vec<ValidationError>, param: &str, value: f32, min: f32, max: f32) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
}
