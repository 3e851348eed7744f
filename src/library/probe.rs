use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use tracing::debug;

/// Read the total duration from the file's stream properties.
///
/// Decoders cannot always report a length up front (VBR MP3 in particular),
/// so random start offsets rely on this instead.
pub fn probe_duration(path: &Path) -> Option<Duration> {
    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration = tagged.properties().duration();
            (!duration.is_zero()).then_some(duration)
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "could not read stream properties");
            None
        }
    }
}
