//! Factory presets bundled with the crypta library.
//!
//! Built-in presets that are always available without external files.
//! They are stored as TOML and parsed on request, so they go through the
//! same validation as user presets.

use crate::{ConfigError, ReverbPreset};

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "cathedral", "shimmer_hall", "small_room"];

/// TOML content for factory presets.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("cathedral", CATHEDRAL_PRESET),
    ("shimmer_hall", SHIMMER_HALL_PRESET),
    ("small_room", SMALL_ROOM_PRESET),
];

/// Default preset - all four blocks in parallel at full wet.
const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "All four blocks in parallel, fully wet"

[settings]
sample_rate = 44100.0
block_wet = [1.0, 1.0, 1.0, 1.0]
lowpass_cutoff = 16000.0
mode = "parallel"
"#;

/// Cathedral preset - blocks chained for the longest tail.
const CATHEDRAL_PRESET: &str = r#"
name = "Cathedral"
description = "Blocks chained in series for a long, dark tail"

[settings]
sample_rate = 48000.0
block_wet = [0.9, 1.0, 0.8, 1.0]
lowpass_cutoff = 9000.0
mode = "serial"
"#;

/// Shimmer hall preset - diffusion blocks feeding the comb blocks.
const SHIMMER_HALL_PRESET: &str = r#"
name = "Shimmer Hall"
description = "Chorused and shimmer blocks feeding both comb blocks"

[settings]
sample_rate = 48000.0
block_wet = [0.6, 0.6, 1.0, 1.0]
lowpass_cutoff = 12000.0
mode = "hybrid"
"#;

/// Small room preset - mostly dry.
const SMALL_ROOM_PRESET: &str = r#"
name = "Small Room"
description = "Parallel blocks mixed low for a short ambience"

[settings]
sample_rate = 48000.0
block_wet = [0.35, 0.2, 0.25, 0.1]
lowpass_cutoff = 14000.0
mode = "parallel"
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use crypta_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {:?}", preset.name, preset.settings.mode);
/// }
/// ```
pub fn factory_presets() -> Vec<ReverbPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| ReverbPreset::from_toml_str(toml).ok())
        .collect()
}

/// Get a factory preset by name.
///
/// Matches the internal name (`shimmer_hall`) or the display name
/// (`Shimmer Hall`), case-insensitive.
///
/// # Example
///
/// ```rust
/// use crypta_config::get_factory_preset;
///
/// let preset = get_factory_preset("cathedral").expect("bundled");
/// assert_eq!(preset.name, "Cathedral");
/// ```
pub fn get_factory_preset(name: &str) -> Option<ReverbPreset> {
    let name_lower = name.to_lowercase();

    for (preset_name, toml) in FACTORY_PRESETS_TOML {
        if *preset_name == name_lower {
            return ReverbPreset::from_toml_str(toml).ok();
        }
    }

    // Also try matching against the preset's display name
    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get a factory preset by name, failing with [`ConfigError::PresetNotFound`].
pub fn factory_preset(name: &str) -> Result<ReverbPreset, ConfigError> {
    get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Get the internal names of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory preset (case-insensitive).
///
/// # Example
///
/// ```rust
/// use crypta_config::is_factory_preset;
///
/// assert!(is_factory_preset("small_room"));
/// assert!(is_factory_preset("Small Room"));
/// assert!(!is_factory_preset("plate"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}
