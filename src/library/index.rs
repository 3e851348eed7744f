use std::env;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use super::model::{LibraryContent, LibraryEvent, NavigationPath, ShowFolder, Track};
use super::scan::{audio_files, subdirectories, walk_audio_files};

/// Read-only view of a `collection/year/[show/]track` library.
///
/// Nothing is cached between calls: every query lists the filesystem again,
/// so a changed root or changed directory contents show up on the next call.
/// Filesystem errors are logged and turned into empty results.
#[derive(Debug, Default)]
pub struct LibraryIndex {
    root: Option<PathBuf>,
    subscribers: Vec<Sender<LibraryEvent>>,
}

impl LibraryIndex {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            subscribers: Vec::new(),
        }
    }

    /// A `Music` folder next to the running executable, if there is one.
    pub fn default_root() -> Option<PathBuf> {
        let exe = env::current_exe().ok()?;
        let candidate = exe.parent()?.join("Music");
        if candidate.is_dir() {
            debug!(path = %candidate.display(), "found default music folder");
            Some(candidate)
        } else {
            debug!(path = %candidate.display(), "no default music folder");
            None
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Change the library root. Subscribers are told only when it actually changes.
    pub fn set_root(&mut self, root: Option<PathBuf>) {
        if self.root == root {
            return;
        }
        info!(root = ?root, "library root changed");
        self.root = root.clone();
        let event = LibraryEvent::LibraryChanged { new_root: root };
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscribe(&mut self) -> Receiver<LibraryEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Root is set and is a directory.
    pub fn has_valid_library(&self) -> bool {
        self.valid_root().is_some()
    }

    /// A usable library root is an existing directory with at least one sub-folder.
    pub fn validate_root(path: &Path) -> bool {
        path.is_dir() && subdirectories(path).map(|d| !d.is_empty()).unwrap_or(false)
    }

    fn valid_root(&self) -> Option<&Path> {
        self.root.as_deref().filter(|r| r.is_dir())
    }

    /// Folder of `collection/year`, when the library is usable.
    pub fn year_dir(&self, collection: &str, year: &str) -> Option<PathBuf> {
        if collection.is_empty() || year.is_empty() {
            return None;
        }
        Some(self.valid_root()?.join(collection).join(year))
    }

    /// Folder of `collection/year/show`, when the library is usable.
    pub fn show_dir(&self, collection: &str, year: &str, show: &str) -> Option<PathBuf> {
        if show.is_empty() {
            return None;
        }
        Some(self.year_dir(collection, year)?.join(show))
    }

    /// Top-level folders, alphabetical.
    pub fn collections(&self) -> Vec<String> {
        let Some(root) = self.valid_root() else {
            return Vec::new();
        };
        match subdirectories(root) {
            Ok(dirs) => dirs.iter().filter_map(|d| file_name(d)).collect(),
            Err(err) => {
                warn!(root = %root.display(), error = %err, "error loading collections");
                Vec::new()
            }
        }
    }

    /// Numeric sub-folders of `collection`, ascending by value.
    pub fn years(&self, collection: &str) -> Vec<String> {
        let Some(root) = self.valid_root() else {
            return Vec::new();
        };
        if collection.is_empty() {
            return Vec::new();
        }
        let dir = root.join(collection);
        if !dir.is_dir() {
            return Vec::new();
        }
        match subdirectories(&dir) {
            Ok(dirs) => {
                let mut years: Vec<(i64, String)> = dirs
                    .iter()
                    .filter_map(|d| file_name(d))
                    .filter_map(|name| name.parse::<i64>().ok().map(|n| (n, name)))
                    .collect();
                years.sort();
                years.into_iter().map(|(_, name)| name).collect()
            }
            Err(err) => {
                warn!(collection, error = %err, "error loading years");
                Vec::new()
            }
        }
    }

    /// Direct tracks of a year, or its show folders when it has no direct tracks.
    pub fn shows(&self, collection: &str, year: &str) -> LibraryContent {
        let Some(dir) = self.year_dir(collection, year) else {
            return LibraryContent::default();
        };
        if !dir.is_dir() {
            return LibraryContent::default();
        }
        load_year(&dir).unwrap_or_else(|err| {
            warn!(collection, year, error = %err, "error loading shows");
            LibraryContent::default()
        })
    }

    /// Songs directly inside a show folder, sorted by file name.
    pub fn songs_in_show(&self, show_dir: &Path) -> Vec<Track> {
        if !show_dir.is_dir() {
            return Vec::new();
        }
        match audio_files(show_dir) {
            Ok(files) => files.into_iter().filter_map(Track::from_path).collect(),
            Err(err) => {
                warn!(path = %show_dir.display(), error = %err, "error loading songs");
                Vec::new()
            }
        }
    }

    /// Every audio file under the root, in no particular order.
    pub fn all_audio_files(&self) -> Vec<PathBuf> {
        match self.valid_root() {
            Some(root) => walk_audio_files(root),
            None => Vec::new(),
        }
    }

    /// Map an absolute file path to its place in the hierarchy.
    ///
    /// Needs at least `collection/year/file`; returns `None` for paths outside
    /// the root or too shallow to resolve.
    pub fn navigate_to_file(&self, path: &Path) -> Option<NavigationPath> {
        let root = self.valid_root()?;
        let Ok(relative) = path.strip_prefix(root) else {
            debug!(path = %path.display(), "file is outside the library root");
            return None;
        };
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        match parts.as_slice() {
            [collection, year, file] => Some(NavigationPath {
                collection: collection.clone(),
                year: year.clone(),
                show_folder: None,
                file_name: file.clone(),
            }),
            [collection, year, show, file, ..] => Some(NavigationPath {
                collection: collection.clone(),
                year: year.clone(),
                show_folder: Some(show.clone()),
                file_name: file.clone(),
            }),
            _ => {
                debug!(path = %path.display(), "file is too shallow to place in the library");
                None
            }
        }
    }
}

fn load_year(dir: &Path) -> io::Result<LibraryContent> {
    let direct = audio_files(dir)?;
    if !direct.is_empty() {
        return Ok(LibraryContent {
            tracks: direct.into_iter().filter_map(Track::from_path).collect(),
            show_folders: Vec::new(),
        });
    }

    let mut show_folders = Vec::new();
    for sub in subdirectories(dir)? {
        let count = match audio_files(&sub) {
            Ok(files) => files.len(),
            Err(err) => {
                warn!(path = %sub.display(), error = %err, "skipping unreadable show folder");
                0
            }
        };
        if count == 0 {
            continue;
        }
        if let Some(name) = file_name(&sub) {
            show_folders.push(ShowFolder {
                name,
                path: sub,
                track_count: count,
            });
        }
    }
    Ok(LibraryContent {
        tracks: Vec::new(),
        show_folders,
    })
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().into_owned())
}
