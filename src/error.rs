use std::path::PathBuf;

/// Result alias carrying the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the playback engine and its audio backend.
///
/// Library queries never produce one of these: filesystem trouble there is
/// logged and turned into an empty result.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// The backend could not open or decode the file (missing, corrupt or an
    /// unsupported codec). The engine is left `Stopped`.
    #[error("could not open {}: {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },
    /// No output device could be acquired when building the backend.
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
}

impl PlaybackError {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::OpenFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Crate-level error used by the binary and the runtime.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error("config: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
