//! Playback engine and library navigation for a folder-organised audio
//! library laid out as `collection/year/[show/]track`.
//!
//! The crate is split the way the player is wired at runtime:
//! - [`library`] answers hierarchy queries over the library root,
//! - [`audio`] owns the single active playback session and the waveform tap,
//! - [`playlist`] models the on-screen list and resolves "what plays next",
//! - [`runtime`] is the thin control loop that drives all of the above.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod playlist;
pub mod runtime;

pub use error::{Error, PlaybackError, Result};
