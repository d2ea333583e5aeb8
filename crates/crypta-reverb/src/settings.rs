//! Reverberator construction settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the four blocks are wired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReverbMode {
    /// Every block hears the dry input; the four results are averaged.
    #[default]
    Parallel,
    /// Blocks 1 -> 2 -> 3 -> 4, each blended against its own input.
    Serial,
    /// Blocks 3 -> 4 feed blocks 1 and 2 side by side; those two are averaged.
    Hybrid,
}

impl ReverbMode {
    /// All modes in index order.
    pub const ALL: [ReverbMode; 3] = [ReverbMode::Parallel, ReverbMode::Serial, ReverbMode::Hybrid];

    /// Mode for a numeric index, clamped to the last mode.
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => ReverbMode::Parallel,
            1 => ReverbMode::Serial,
            _ => ReverbMode::Hybrid,
        }
    }

    /// Numeric index (0 = parallel, 1 = serial, 2 = hybrid).
    pub fn index(self) -> u32 {
        match self {
            ReverbMode::Parallel => 0,
            ReverbMode::Serial => 1,
            ReverbMode::Hybrid => 2,
        }
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            ReverbMode::Parallel => "parallel",
            ReverbMode::Serial => "serial",
            ReverbMode::Hybrid => "hybrid",
        }
    }

    /// Mode for a lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// Parameters a [`Reverberator`](crate::Reverberator) is built from.
///
/// Out-of-range values are clamped at construction, never rejected.
/// `crypta-config` offers a strict validator for presets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReverbSettings {
    /// Sample rate in Hz
    pub sample_rate: f32,
    /// Wet amount of blocks 1 to 4, each in `[0, 1]`
    pub block_wet: [f32; 4],
    /// Cutoff of the final output lowpass in Hz
    pub lowpass_cutoff: f32,
    /// Block wiring
    pub mode: ReverbMode,
    /// Seed for the random modulators; `None` picks a fresh seed per
    /// instance (fixed fallback without `std`)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub seed: Option<u64>,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            block_wet: [1.0; 4],
            lowpass_cutoff: 16000.0,
            mode: ReverbMode::Parallel,
            seed: None,
        }
    }
}

impl ReverbSettings {
    /// Default settings at a given sample rate.
    pub fn with_sample_rate(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ReverbSettings::default();
        assert_eq!(s.sample_rate, 44100.0);
        assert_eq!(s.block_wet, [1.0; 4]);
        assert_eq!(s.lowpass_cutoff, 16000.0);
        assert_eq!(s.mode, ReverbMode::Parallel);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_mode_index_clamps() {
        assert_eq!(ReverbMode::from_index(0), ReverbMode::Parallel);
        assert_eq!(ReverbMode::from_index(1), ReverbMode::Serial);
        assert_eq!(ReverbMode::from_index(2), ReverbMode::Hybrid);
        assert_eq!(ReverbMode::from_index(u32::MAX), ReverbMode::Hybrid);
        for mode in ReverbMode::ALL {
            assert_eq!(ReverbMode::from_index(mode.index()), mode);
        }
    }

    #[test]
    fn test_mode_names() {
        for mode in ReverbMode::ALL {
            assert_eq!(ReverbMode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(ReverbMode::from_name("plate"), None);
    }
}
