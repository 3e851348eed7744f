//! Low-level directory listing used by the index.
//!
//! Everything here returns `io::Result`; the index decides how to degrade.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use super::model::AudioFormat;

pub(super) fn is_audio_file(path: &Path) -> bool {
    path.is_file() && AudioFormat::from_path(path).is_some()
}

/// Entries of `dir`. Only failing to open `dir` is an error; an entry that
/// cannot be read is skipped and logged.
fn entries(dir: &Path) -> io::Result<impl Iterator<Item = PathBuf>> {
    let dir_name = dir.to_path_buf();
    Ok(fs::read_dir(dir)?.filter_map(move |entry| match entry {
        Ok(e) => Some(e.path()),
        Err(err) => {
            warn!(dir = %dir_name.display(), error = %err, "skipping unreadable entry");
            None
        }
    }))
}

/// Immediate sub-directories of `dir`, sorted by name.
pub(super) fn subdirectories(dir: &Path) -> io::Result<Vec<PathBuf>> {
    // `is_dir` follows symlinks, like the walker below.
    let mut dirs: Vec<PathBuf> = entries(dir)?.filter(|p| p.is_dir()).collect();
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(dirs)
}

/// Audio files directly inside `dir`, sorted by file name.
pub(super) fn audio_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = entries(dir)?.filter(|p| is_audio_file(p)).collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Every audio file below `root`. Unreadable entries are skipped and logged.
pub(super) fn walk_audio_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(root = %root.display(), error = %err, "skipping unreadable library entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| AudioFormat::from_path(p).is_some())
        .collect()
}
