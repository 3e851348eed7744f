//! Configuration loader and schema types.
//!
//! This module exposes the settings that drive the library root, playback
//! defaults and the waveform tap, plus helpers to load them from disk.

mod load;
mod schema;

pub use load::{CONFIG_PATH_VAR, ENV_PREFIX, config_path};
pub use schema::*;
