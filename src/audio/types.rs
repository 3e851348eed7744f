//! Audio-related small types.
//!
//! This module defines the playback state, the events the engine publishes
//! and the snapshot the control loop polls.

use std::path::PathBuf;
use std::time::Duration;

use crate::library::Track;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Events published to engine subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// State transition. `path` is `None` once stopped.
    StateChanged {
        state: PlaybackState,
        path: Option<PathBuf>,
    },
    /// Position refresh. Produced by the control loop's poller, never pushed
    /// by the engine itself.
    ProgressChanged { current: Duration, total: Duration },
    VolumeChanged { volume: f32, is_muted: bool },
    /// A live session was stopped.
    Stopped,
}

/// Snapshot of the playback session shared with the UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackInfo {
    pub track: Option<Track>,
    pub state: PlaybackState,
    pub volume: f32,
    pub is_muted: bool,
    pub position: Duration,
    pub total: Duration,
}
