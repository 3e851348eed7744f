use std::path::PathBuf;

use tracing::{info, warn};

use crate::audio::RodioBackend;
use crate::config;
use crate::error::Result;
use crate::library::LibraryIndex;

/// Library root by precedence: command line, config, `Music` beside the binary.
pub fn resolve_root(root_arg: Option<PathBuf>, settings: &config::Settings) -> Option<PathBuf> {
    let root = root_arg
        .or_else(|| settings.library.root.clone())
        .or_else(LibraryIndex::default_root);
    match &root {
        Some(path) if !LibraryIndex::validate_root(path) => {
            warn!(root = %path.display(), "library root has no collections");
        }
        Some(path) => info!(root = %path.display(), "library root"),
        None => info!("no library root configured"),
    }
    root
}

/// Open the default output device, tapped the way the settings ask.
pub fn open_backend(settings: &config::Settings) -> Result<RodioBackend> {
    let backend = RodioBackend::open_default()?.with_waveform_window(settings.waveform.window);
    Ok(backend)
}
