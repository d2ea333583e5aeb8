//! Preset format and operations.

use crypta_reverb::{ReverbSettings, Reverberator};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, parse_mode, validate_settings};

/// A named set of reverberator settings.
///
/// Presets are exchanged as TOML. Missing settings take their defaults;
/// unknown keys are rejected.
///
/// # TOML Format
///
/// ```toml
/// name = "Cathedral"
/// description = "Long serial tail"
///
/// [settings]
/// sample_rate = 48000.0
/// block_wet = [0.9, 1.0, 0.8, 1.0]
/// lowpass_cutoff = 9000.0
/// mode = "serial"
/// seed = 7
/// ```
///
/// `mode` accepts `parallel`, `serial` or `hybrid` (any case) or the index
/// `0`, `1`, `2` as a string. `seed` is optional and must fit a TOML
/// integer (at most `i64::MAX`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverbPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reverberator settings.
    pub settings: ReverbSettings,
}

/// On-disk layout, read before the mode name is resolved.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPreset {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    settings: RawSettings,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    sample_rate: f32,
    block_wet: [f32; 4],
    lowpass_cutoff: f32,
    mode: String,
    seed: Option<u64>,
}

impl Default for RawSettings {
    fn default() -> Self {
        let defaults = ReverbSettings::default();
        Self {
            sample_rate: defaults.sample_rate,
            block_wet: defaults.block_wet,
            lowpass_cutoff: defaults.lowpass_cutoff,
            mode: defaults.mode.name().to_string(),
            seed: defaults.seed,
        }
    }
}

impl ReverbPreset {
    /// Create a preset with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings: ReverbSettings::default(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: ReverbSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Parse and validate a preset from a TOML string.
    ///
    /// Fails with [`ConfigError::TomlParse`] for malformed TOML or unknown
    /// keys, and with [`ConfigError::Validation`] for an unknown mode or
    /// out-of-range values.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawPreset = toml::from_str(toml_str)?;
        let preset = Self {
            name: raw.name,
            description: raw.description,
            settings: ReverbSettings {
                sample_rate: raw.settings.sample_rate,
                block_wet: raw.settings.block_wet,
                lowpass_cutoff: raw.settings.lowpass_cutoff,
                mode: parse_mode(&raw.settings.mode)?,
                seed: raw.settings.seed,
            },
        };
        preset.validate()?;
        Ok(preset)
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the settings against their accepted ranges.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(&self.settings)
    }

    /// Build a reverberator from the preset.
    pub fn build(&self) -> Reverberator {
        Reverberator::new(&self.settings)
    }

    /// Build a reverberator at a sample rate other than the preset's.
    pub fn build_at(&self, sample_rate: f32) -> Reverberator {
        Reverberator::new(&ReverbSettings {
            sample_rate,
            ..self.settings.clone()
        })
    }
}

impl From<&Reverberator> for ReverbPreset {
    /// Capture the current settings of a running reverberator.
    fn from(reverb: &Reverberator) -> Self {
        Self::new("Untitled").with_settings(reverb.settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;
    use crypta_reverb::ReverbMode;

    #[test]
    fn test_preset_new() {
        let preset = ReverbPreset::new("Test").with_description("desc");
        assert_eq!(preset.name, "Test");
        assert_eq!(preset.description.as_deref(), Some("desc"));
        assert_eq!(preset.settings, ReverbSettings::default());
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let preset = ReverbPreset::from_toml_str(r#"name = "Bare""#).expect("valid preset");
        assert_eq!(preset.name, "Bare");
        assert_eq!(preset.description, None);
        assert_eq!(preset.settings, ReverbSettings::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
name = "Cathedral"
description = "Long serial tail"

[settings]
sample_rate = 48000.0
block_wet = [0.5, 1.0, 0.25, 1.0]
lowpass_cutoff = 9000.0
mode = "Serial"
seed = 7
"#;
        let preset = ReverbPreset::from_toml_str(toml_str).expect("valid preset");
        assert_eq!(preset.settings.sample_rate, 48000.0);
        assert_eq!(preset.settings.block_wet, [0.5, 1.0, 0.25, 1.0]);
        assert_eq!(preset.settings.lowpass_cutoff, 9000.0);
        assert_eq!(preset.settings.mode, ReverbMode::Serial);
        assert_eq!(preset.settings.seed, Some(7));
    }

    #[test]
    fn test_mode_by_index() {
        let toml_str = "name = \"x\"\n[settings]\nmode = \"2\"\n";
        let preset = ReverbPreset::from_toml_str(toml_str).expect("valid preset");
        assert_eq!(preset.settings.mode, ReverbMode::Hybrid);
    }

    #[test]
    fn test_unknown_mode_is_validation_error() {
        let toml_str = "name = \"x\"\n[settings]\nmode = \"plate\"\n";
        let err = ReverbPreset::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::InvalidMode(ref m)) if m == "plate"
        ));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let toml_str = "name = \"x\"\n[settings]\nroom_size = 0.5\n";
        let err = ReverbPreset::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let err = ReverbPreset::from_toml_str("[settings]\nmode = \"serial\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_round_trip() {
        let preset = ReverbPreset::new("Round Trip")
            .with_description("all fields set")
            .with_settings(ReverbSettings {
                sample_rate: 96000.0,
                block_wet: [0.1, 0.2, 0.3, 0.4],
                lowpass_cutoff: 12345.0,
                mode: ReverbMode::Hybrid,
                seed: Some(99),
            });
        let toml_str = preset.to_toml_string().expect("serializes");
        assert!(toml_str.contains("mode = \"hybrid\""), "got:\n{toml_str}");
        let parsed = ReverbPreset::from_toml_str(&toml_str).expect("parses");
        assert_eq!(parsed, preset);
    }

    #[test]
    fn test_unseeded_omits_seed() {
        let toml_str = ReverbPreset::new("x").to_toml_string().expect("serializes");
        assert!(!toml_str.contains("seed"));
        assert!(!toml_str.contains("description"));
    }

    #[test]
    fn test_oversized_seed_fails_to_serialize() {
        let preset = ReverbPreset::new("x").with_settings(ReverbSettings {
            seed: Some(u64::MAX),
            ..ReverbSettings::default()
        });
        assert!(matches!(preset.to_toml_string(), Err(ConfigError::TomlSerialize(_))));
    }

    #[test]
    fn test_build_at_overrides_rate() {
        let preset = ReverbPreset::new("x");
        assert_eq!(preset.build().sample_rate(), 44100.0);
        assert_eq!(preset.build_at(48000.0).sample_rate(), 48000.0);
    }

    #[test]
    fn test_capture_from_reverberator() {
        let mut reverb = ReverbPreset::new("x").build();
        reverb.set_mode(ReverbMode::Serial);
        reverb.set_block_wet(0.5, 3);
        let captured = ReverbPreset::from(&reverb);
        assert_eq!(captured.settings.mode, ReverbMode::Serial);
        assert_eq!(captured.settings.block_wet[2], 0.5);
    }
}
