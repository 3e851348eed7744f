//! Audio module: playback engine, backend seam and waveform tap.
//!
//! The engine is owned by the control loop and called synchronously; the
//! backend renders on its own output thread, where the waveform tap runs.

mod backend;
mod engine;
mod sink;
mod types;
mod waveform;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{AudioBackend, AudioSession};
pub use engine::PlaybackEngine;
pub use sink::{RodioBackend, RodioSession};
pub use types::{PlaybackInfo, PlaybackState, PlayerEvent};
pub use waveform::{DEFAULT_WINDOW, PeakDecimator, WaveformBuffer, WaveformSink, WaveformTap};
