use std::fmt;
use std::path::{Path, PathBuf};

/// Audio container formats the library recognises.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Classify `path` by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp3 => f.write_str("MP3"),
            Self::Flac => f.write_str("FLAC"),
        }
    }
}

/// A playable file, identified by its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    pub path: PathBuf,
    /// File name without extension.
    pub display_name: String,
    pub format: AudioFormat,
}

impl Track {
    /// Build a track from a path with a recognised audio extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = AudioFormat::from_path(&path)?;
        let display_name = path.file_stem()?.to_string_lossy().into_owned();
        Some(Self {
            path,
            display_name,
            format,
        })
    }
}

/// A sub-folder of a year that groups individual songs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowFolder {
    pub name: String,
    pub path: PathBuf,
    pub track_count: usize,
}

/// Contents of a year folder: either direct tracks or show folders, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryContent {
    pub tracks: Vec<Track>,
    pub show_folders: Vec<ShowFolder>,
}

impl LibraryContent {
    pub fn has_content(&self) -> bool {
        !self.tracks.is_empty() || !self.show_folders.is_empty()
    }

    /// `collection/year/track` layout.
    pub fn is_three_level_structure(&self) -> bool {
        !self.tracks.is_empty() && self.show_folders.is_empty()
    }

    /// `collection/year/show/track` layout.
    pub fn is_four_level_structure(&self) -> bool {
        self.tracks.is_empty() && !self.show_folders.is_empty()
    }
}

/// Where a file sits in the hierarchy, relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPath {
    pub collection: String,
    pub year: String,
    /// Absent for flat (3-level) years.
    pub show_folder: Option<String>,
    /// File name including its extension.
    pub file_name: String,
}

impl NavigationPath {
    pub fn is_direct_file(&self) -> bool {
        self.show_folder.is_none()
    }

    /// `collection/year[/show]/file` relative to the library root.
    pub fn relative_path(&self) -> PathBuf {
        let mut p = PathBuf::from(&self.collection);
        p.push(&self.year);
        if let Some(show) = &self.show_folder {
            p.push(show);
        }
        p.push(&self.file_name);
        p
    }
}

/// Notifications published by the library index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryEvent {
    /// The library root changed; `None` means it was unset.
    LibraryChanged { new_root: Option<PathBuf> },
}
