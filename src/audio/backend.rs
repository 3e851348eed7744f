//! The seam between the engine and whatever renders PCM.
//!
//! A backend opens a file into a session; the session owns the device sink
//! and the decoded stream until it is stopped and dropped.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::error::PlaybackError;

use super::waveform::WaveformSink;

pub trait AudioBackend {
    type Session: AudioSession;

    /// Open `path` into a paused session.
    ///
    /// When `waveform` is given, decoded frames pass through a waveform tap
    /// on their way to the device; otherwise they go straight to it.
    fn open(
        &self,
        path: &Path,
        waveform: Option<Arc<dyn WaveformSink>>,
    ) -> Result<Self::Session, PlaybackError>;
}

/// One opened file bound to a device sink.
pub trait AudioSession {
    fn total_duration(&self) -> Duration;
    fn position(&self) -> Duration;
    /// Returns `false` when the stream could not seek.
    fn seek(&mut self, to: Duration) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop output and release the decoder. The session is dead afterwards.
    fn stop(&mut self);
    fn set_volume(&mut self, volume: f32);
    /// The stream has been fully rendered.
    fn is_finished(&self) -> bool;
}
