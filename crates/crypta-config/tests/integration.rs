//! Integration tests for crypta-config.
//!
//! These tests verify end-to-end functionality across modules: presets
//! parsed from TOML drive a real reverberator.

use crypta_config::{
    ConfigError, ReverbMode, ReverbPreset, ReverbSettings, ValidationError, factory_preset,
    factory_presets, get_factory_preset, validate_settings,
};
use crypta_core::StereoEffect;

/// Test that every factory preset validates and produces audio.
#[test]
fn test_factory_presets_process_audio() {
    let presets = factory_presets();
    assert_eq!(presets.len(), 4);

    for preset in presets {
        assert_eq!(validate_settings(&preset.settings), Ok(()), "{}", preset.name);

        let mut reverb = preset.build();
        assert_eq!(reverb.mode(), preset.settings.mode);

        let left: Vec<f32> = (0..1024).map(|i| (i as f32 * 0.01).sin() * 0.5).collect();
        let mut out_l = vec![0.0f32; 1024];
        let mut out_r = vec![0.0f32; 1024];
        reverb.process_block_stereo(&left, &left, &mut out_l, &mut out_r);

        assert!(out_l.iter().chain(&out_r).all(|s| s.is_finite()), "{}", preset.name);
        assert!(out_l.iter().any(|&s| s != 0.0), "{}", preset.name);
    }
}

/// Test that a preset survives a TOML round trip and drives identical output.
#[test]
fn test_round_trip_reproduces_output() {
    let mut original = get_factory_preset("cathedral").expect("cathedral should exist");
    original.settings.seed = Some(21);

    let toml_str = original.to_toml_string().expect("serializes");
    let restored = ReverbPreset::from_toml_str(&toml_str).expect("parses");
    assert_eq!(restored, original);

    let mut a = original.build();
    let mut b = restored.build();
    for n in 0..5000 {
        let x = if n % 1000 == 0 { 1.0 } else { 0.0 };
        assert_eq!(a.run(x, x), b.run(x, x));
    }
}

/// Test that a running reverberator can be captured as a preset.
#[test]
fn test_capture_running_reverberator() {
    let mut reverb = ReverbPreset::new("Live").build();
    reverb.set_mode(ReverbMode::Hybrid);
    reverb.set_lowpass_cutoff(7000.0);
    reverb.set_block_wet(0.4, 1);

    let mut captured = ReverbPreset::from(&reverb);
    captured.name = "Captured".to_string();
    let restored = ReverbPreset::from_toml_str(&captured.to_toml_string().expect("serializes"))
        .expect("parses");

    assert_eq!(restored.settings.mode, ReverbMode::Hybrid);
    assert_eq!(restored.settings.lowpass_cutoff, 7000.0);
    assert_eq!(restored.settings.block_wet[0], 0.4);
}

/// Test that out-of-range values in TOML are rejected, not clamped.
#[test]
fn test_out_of_range_rejected() {
    let toml_str = r#"
name = "Broken"

[settings]
sample_rate = 8000.0
block_wet = [1.0, 1.0, 1.0, 1.2]
lowpass_cutoff = 6000.0
"#;
    match ReverbPreset::from_toml_str(toml_str) {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2);
            let params: Vec<_> = errors
                .iter()
                .filter_map(|e| match e {
                    ValidationError::OutOfRange { param, .. } => Some(param.as_str()),
                    _ => None,
                })
                .collect();
            assert_eq!(params, ["block_wet[4]", "lowpass_cutoff"]);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

/// Test that the runtime clamps what validation rejects.
#[test]
fn test_runtime_clamps_invalid_settings() {
    let settings = ReverbSettings {
        block_wet: [2.0; 4],
        lowpass_cutoff: 40000.0,
        ..ReverbSettings::default()
    };
    assert!(validate_settings(&settings).is_err());

    let preset = ReverbPreset::new("Lenient").with_settings(settings);
    let reverb = preset.build();
    assert_eq!(reverb.block_wet(1), 1.0);
    assert_eq!(reverb.lowpass_cutoff(), 22050.0);
}

/// Test error reporting for lookups and malformed input.
#[test]
fn test_error_variants() {
    assert!(matches!(factory_preset("plate"), Err(ConfigError::PresetNotFound(_))));
    assert!(matches!(
        ReverbPreset::from_toml_str("name = [unclosed"),
        Err(ConfigError::TomlParse(_))
    ));
    assert!(matches!(
        ReverbPreset::from_toml_str("name = \"x\"\n[settings]\nmode = \"spring\"\n"),
        Err(ConfigError::Validation(ValidationError::InvalidMode(_)))
    ));
}

/// Test building a preset at a different sample rate.
#[test]
fn test_build_at_other_rate() {
    let preset = factory_preset("small_room").expect("small_room should exist");
    let mut reverb = preset.build_at(96000.0);
    assert_eq!(reverb.sample_rate(), 96000.0);
    assert_eq!(reverb.block_wet(2), 0.2);
    for _ in 0..1000 {
        let (l, r) = reverb.run(0.25, -0.25);
        assert!(l.is_finite() && r.is_finite());
    }
}
