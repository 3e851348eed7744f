//! `rodio` implementation of the audio backend.
//!
//! Opening a file decodes it into a paused `Sink` on the default output
//! stream, optionally routed through a [`WaveformTap`].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, warn};

use crate::error::PlaybackError;
use crate::library::probe_duration;

use super::backend::{AudioBackend, AudioSession};
use super::waveform::{DEFAULT_WINDOW, WaveformSink, WaveformTap};

pub struct RodioBackend {
    stream: OutputStream,
    waveform_window: usize,
}

impl RodioBackend {
    /// Open the default output device.
    pub fn open_default() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::NoOutputDevice(e.to_string()))?;
        // rodio reports the stream drop on stderr; that only adds noise here.
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            waveform_window: DEFAULT_WINDOW,
        })
    }

    pub fn with_waveform_window(mut self, window: usize) -> Self {
        self.waveform_window = window.max(1);
        self
    }
}

impl AudioBackend for RodioBackend {
    type Session = RodioSession;

    fn open(
        &self,
        path: &Path,
        waveform: Option<Arc<dyn WaveformSink>>,
    ) -> Result<RodioSession, PlaybackError> {
        let file = File::open(path).map_err(|e| PlaybackError::open_failed(path, e))?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::open_failed(path, e))?;

        let total = source
            .total_duration()
            .or_else(|| probe_duration(path))
            .unwrap_or(Duration::ZERO);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        match waveform {
            Some(w) => sink.append(WaveformTap::new(source, self.waveform_window, w)),
            None => sink.append(source),
        }
        debug!(path = %path.display(), ?total, "opened audio session");

        Ok(RodioSession { sink, total })
    }
}

pub struct RodioSession {
    sink: Sink,
    total: Duration,
}

impl AudioSession for RodioSession {
    fn total_duration(&self) -> Duration {
        self.total
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn seek(&mut self, to: Duration) -> bool {
        match self.sink.try_seek(to) {
            Ok(()) => true,
            Err(err) => {
                warn!(?to, error = %err, "seek failed");
                false
            }
        }
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
