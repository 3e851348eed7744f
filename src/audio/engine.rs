use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::PlaybackError;
use crate::library::Track;

use super::backend::{AudioBackend, AudioSession};
use super::types::{PlaybackInfo, PlaybackState, PlayerEvent};
use super::waveform::WaveformSink;

struct ActiveSession<S> {
    track: Track,
    handle: S,
    waveform: Option<Arc<dyn WaveformSink>>,
}

impl<S> ActiveSession<S> {
    /// Flatten the visualization; a no-op when the tap was bypassed.
    fn clear_waveform(&self) {
        if let Some(w) = &self.waveform {
            w.clear();
        }
    }
}

/// Single authority over what is playing and how loud.
///
/// At most one backend session is alive at any time: starting a track tears
/// the previous one down before the new file is opened. Disallowed
/// transitions (pausing while stopped, resuming while playing, ...) are
/// silently ignored.
pub struct PlaybackEngine<B: AudioBackend> {
    backend: B,
    session: Option<ActiveSession<B::Session>>,
    state: PlaybackState,
    volume: f32,
    is_muted: bool,
    volume_before_mute: f32,
    subscribers: Vec<Sender<PlayerEvent>>,
}

impl<B: AudioBackend> PlaybackEngine<B> {
    pub fn new(backend: B, volume: f32) -> Self {
        let volume = clamp_volume(volume);
        Self {
            backend,
            session: None,
            state: PlaybackState::Stopped,
            volume,
            is_muted: false,
            volume_before_mute: volume,
            subscribers: Vec::new(),
        }
    }

    /// Register a listener. Disconnected listeners are pruned on the next event.
    pub fn subscribe(&mut self) -> Receiver<PlayerEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Start `path`, replacing whatever was loaded.
    ///
    /// `start_at` is honoured only when it lies before the end of the track.
    /// On failure the engine is left `Stopped` and the error names the file.
    pub fn play(
        &mut self,
        path: &Path,
        start_at: Option<Duration>,
        waveform: Option<Arc<dyn WaveformSink>>,
    ) -> Result<(), PlaybackError> {
        let was_live = self.state != PlaybackState::Stopped;
        self.teardown();
        self.state = PlaybackState::Stopped;

        let opened = Track::from_path(path)
            .ok_or_else(|| PlaybackError::open_failed(path, "unsupported format"))
            .and_then(|track| {
                let handle = self.backend.open(path, waveform.clone())?;
                Ok((track, handle))
            });
        let (track, mut handle) = match opened {
            Ok(ok) => ok,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "playback failed to start");
                if was_live {
                    self.emit(PlayerEvent::Stopped);
                    self.emit_state(None);
                }
                return Err(err);
            }
        };

        if let Some(start) = start_at {
            if start < handle.total_duration() {
                handle.seek(start);
            } else {
                debug!(?start, "start position beyond track end, starting from zero");
            }
        }
        handle.set_volume(self.effective_volume());
        handle.play();

        info!(path = %path.display(), ?start_at, "playing");
        self.session = Some(ActiveSession {
            track,
            handle,
            waveform,
        });
        self.state = PlaybackState::Playing;
        self.emit_state(Some(path.to_path_buf()));
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.handle.pause();
        session.clear_waveform();
        let path = session.track.path.clone();
        self.state = PlaybackState::Paused;
        self.emit_state(Some(path));
    }

    pub fn resume(&mut self) {
        if self.state != PlaybackState::Paused {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.handle.play();
        let path = session.track.path.clone();
        self.state = PlaybackState::Playing;
        self.emit_state(Some(path));
    }

    /// Stop and release the session. Stopping an idle engine emits nothing.
    pub fn stop(&mut self) {
        let previous = self.state;
        self.teardown();
        self.state = PlaybackState::Stopped;
        if previous != PlaybackState::Stopped {
            info!("stopped");
            self.emit(PlayerEvent::Stopped);
            self.emit_state(None);
        }
    }

    /// Seek within the loaded track. Returns whether the seek was applied.
    pub fn set_position(&mut self, to: Duration) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if to > session.handle.total_duration() {
            debug!(?to, "seek past end ignored");
            return false;
        }
        session.handle.seek(to)
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = clamp_volume(volume);
        self.volume = volume;
        if self.is_muted {
            // Unmuting lands on the latest requested level.
            self.volume_before_mute = volume;
        } else if let Some(session) = self.session.as_mut() {
            session.handle.set_volume(volume);
        }
        self.emit(PlayerEvent::VolumeChanged {
            volume,
            is_muted: self.is_muted,
        });
    }

    pub fn set_muted(&mut self, muted: bool) {
        if muted == self.is_muted {
            return;
        }
        if muted {
            self.volume_before_mute = self.volume;
        } else {
            self.volume = self.volume_before_mute;
        }
        self.is_muted = muted;
        let applied = self.effective_volume();
        if let Some(session) = self.session.as_mut() {
            session.handle.set_volume(applied);
        }
        self.emit(PlayerEvent::VolumeChanged {
            volume: self.volume,
            is_muted: muted,
        });
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.is_muted);
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.session.as_ref().map(|s| &s.track)
    }

    pub fn current_path(&self) -> Option<PathBuf> {
        self.current_track().map(|t| t.path.clone())
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn position(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.handle.position())
            .unwrap_or(Duration::ZERO)
    }

    pub fn total_duration(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.handle.total_duration())
            .unwrap_or(Duration::ZERO)
    }

    /// The playing track has rendered to its end.
    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Playing
            && self.session.as_ref().is_some_and(|s| s.handle.is_finished())
    }

    pub fn info(&self) -> PlaybackInfo {
        PlaybackInfo {
            track: self.current_track().cloned(),
            state: self.state,
            volume: self.volume,
            is_muted: self.is_muted,
            position: self.position(),
            total: self.total_duration(),
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.is_muted { 0.0 } else { self.volume }
    }

    /// Stop the device sink, flatten the waveform and drop the decoder.
    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.handle.stop();
            session.clear_waveform();
            debug!(path = %session.track.path.display(), "session released");
        }
    }

    fn emit_state(&mut self, path: Option<PathBuf>) {
        let state = self.state;
        self.emit(PlayerEvent::StateChanged { state, path });
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl<B: AudioBackend> Drop for PlaybackEngine<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
