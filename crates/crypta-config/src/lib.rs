//! Presets and validation for the crypta reverberator.
//!
//! Reverberator settings as named TOML presets. The DSP crates never fail
//! at runtime and clamp anything out of range; this crate is where a bad
//! value is reported instead.
//!
//! # Features
//!
//! - **Presets**: [`ReverbPreset`] to and from TOML strings
//! - **Validation**: strict range checks with [`validate_settings`]
//! - **Factory Presets**: built-in starting points, looked up by name
//!
//! Reading and writing preset files is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use crypta_config::{ReverbPreset, get_factory_preset};
//! use crypta_reverb::ReverbMode;
//!
//! let preset = ReverbPreset::from_toml_str(r#"
//! name = "Tunnel"
//!
//! [settings]
//! mode = "serial"
//! lowpass_cutoff = 6000.0
//! seed = 3
//! "#).unwrap();
//! assert_eq!(preset.settings.mode, ReverbMode::Serial);
//!
//! let mut reverb = preset.build();
//! let (l, r) = reverb.run(1.0, 1.0);
//! assert!(l.is_finite() && r.is_finite());
//!
//! let hall = get_factory_preset("shimmer_hall").unwrap();
//! let toml = hall.to_toml_string().unwrap();
//! assert!(toml.contains("mode = \"hybrid\""));
//! ```

mod error;
mod preset;

/// Settings validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset, factory_preset_names, factory_presets,
    get_factory_preset, is_factory_preset,
};
pub use preset::ReverbPreset;
pub use validation::{ValidationError, ValidationResult, parse_mode, validate_settings};

/// Re-export the settings types presets are built from
pub use crypta_reverb::{ReverbMode, ReverbSettings};
