use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::schema::Settings;

/// Overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "CASSETTE_CONFIG_PATH";
/// Prefix for per-key overrides, e.g. `CASSETTE__PLAYBACK__DEFAULT_VOLUME`.
pub const ENV_PREFIX: &str = "CASSETTE";

impl Settings {
    /// Load from the config file found in the environment, then env overrides.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_from(config_path(|key| env::var_os(key)).as_deref())
    }

    /// Load from `file` (missing is fine) with `CASSETTE__*` overrides on top.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = file {
            debug!(path = %path.display(), "reading config");
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.playback.default_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(format!("playback.default_volume must be within 0..=1, got {volume}"));
        }
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if !(self.playback.volume_step > 0.0 && self.playback.volume_step <= 1.0) {
            return Err("playback.volume_step must be within (0, 1]".to_string());
        }
        if self.waveform.window == 0 {
            return Err("waveform.window must be >= 1".to_string());
        }
        if self.waveform.bars == 0 {
            return Err("waveform.bars must be >= 1".to_string());
        }
        if let Some(root) = &self.library.root {
            if root.as_os_str().is_empty() {
                return Err("library.root must not be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Where the config file lives, given an environment lookup.
///
/// `CASSETTE_CONFIG_PATH` wins, then `$XDG_CONFIG_HOME/cassette/config.toml`,
/// then `$HOME/.config/cassette/config.toml`.
pub fn config_path<F>(var: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(p) = var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(p));
    }
    let config_home = var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| var("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("cassette").join("config.toml"))
}
