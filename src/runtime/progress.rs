use std::time::Duration;

use crate::audio::{AudioBackend, PlaybackEngine, PlaybackState, PlayerEvent};

/// Position display refresh, gated while the user drags the seek control.
///
/// While seeking, polls return nothing and only the final value passed to
/// [`ProgressPoller::end_seek`] reaches the engine.
#[derive(Debug, Clone)]
pub struct ProgressPoller {
    interval: Duration,
    is_seeking: bool,
    preview: Option<Duration>,
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            is_seeking: false,
            preview: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    pub fn begin_seek(&mut self) {
        self.is_seeking = true;
    }

    /// Position shown while dragging; the engine is not touched.
    pub fn preview_seek(&mut self, to: Duration) -> Option<Duration> {
        if !self.is_seeking {
            return None;
        }
        self.preview = Some(to);
        self.preview
    }

    /// Apply the final seek and resume polling. Returns whether it was applied.
    pub fn end_seek<B: AudioBackend>(&mut self, engine: &mut PlaybackEngine<B>, to: Duration) -> bool {
        let applied = engine.set_position(to);
        self.is_seeking = false;
        self.preview = None;
        applied
    }

    /// One poll tick: a progress event while playing and not seeking.
    pub fn poll<B: AudioBackend>(&self, engine: &PlaybackEngine<B>) -> Option<PlayerEvent> {
        if self.is_seeking || engine.state() != PlaybackState::Playing {
            return None;
        }
        Some(PlayerEvent::ProgressChanged {
            current: engine.position(),
            total: engine.total_duration(),
        })
    }
}

/// `mm:ss`, or `h:mm:ss` past the hour.
pub fn format_time(t: Duration) -> String {
    let secs = t.as_secs();
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
