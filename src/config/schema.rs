use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cassette/config.toml` or `~/.config/cassette/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CASSETTE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub waveform: WaveformSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Library root. When unset, a `Music` folder next to the executable is
    /// used if it exists.
    pub root: Option<PathBuf>,
    /// Present years newest-first instead of oldest-first.
    pub newest_first: bool,
    /// When the last song of a show folder ends, continue with the next show
    /// folder of the same year.
    pub cross_show_boundaries: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            newest_first: false,
            cross_show_boundaries: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume the engine starts with, in `[0, 1]`.
    pub default_volume: f32,
    /// How often the control loop refreshes the position display (milliseconds).
    pub poll_interval_ms: u64,
    /// Step used by the `+` / `-` volume commands.
    pub volume_step: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            default_volume: 0.7,
            poll_interval_ms: 100,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaveformSettings {
    /// Route decoded audio through the waveform tap.
    pub enabled: bool,
    /// Samples folded into one peak value (1024 is ~23 ms at 44.1 kHz).
    pub window: usize,
    /// Number of peaks kept for display.
    pub bars: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            window: 1024,
            bars: 40,
        }
    }
}
