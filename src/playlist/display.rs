use std::path::{Path, PathBuf};

use crate::library::{LibraryContent, NavigationPath, Track};

/// One entry of the on-screen list. Only [`DisplayItem::Track`] is playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    /// A playable file, shown by its name without extension. `path` is its
    /// identity: two files may share a name.
    Track { name: String, path: PathBuf },
    /// A show folder inside a grouped year.
    ShowFolder { name: String, track_count: usize },
    /// Leave the current show folder.
    Back,
    Separator,
    Info(String),
    Message(String),
}

impl DisplayItem {
    pub fn track(track: &Track) -> Self {
        Self::Track {
            name: track.display_name.clone(),
            path: track.path.clone(),
        }
    }

    pub fn is_playable(&self) -> bool {
        matches!(self, Self::Track { .. })
    }

    pub fn track_name(&self) -> Option<&str> {
        match self {
            Self::Track { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn track_path(&self) -> Option<&Path> {
        match self {
            Self::Track { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Text for a plain line-oriented list.
    pub fn label(&self) -> String {
        match self {
            Self::Track { name, .. } => format!("🎵 {name}"),
            Self::ShowFolder { name, track_count } => format!("📁 {name} ({track_count})"),
            Self::Back => "⬅ ..".to_string(),
            Self::Separator => "────────".to_string(),
            Self::Info(text) | Self::Message(text) => text.clone(),
        }
    }
}

/// Where the list the user is looking at came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseContext {
    /// Tracks directly inside a year.
    Year { collection: String, year: String },
    /// Songs inside one show folder.
    Show {
        collection: String,
        year: String,
        show: String,
    },
}

impl BrowseContext {
    pub fn collection(&self) -> &str {
        match self {
            Self::Year { collection, .. } | Self::Show { collection, .. } => collection,
        }
    }

    pub fn year(&self) -> &str {
        match self {
            Self::Year { year, .. } | Self::Show { year, .. } => year,
        }
    }
}

impl From<&NavigationPath> for BrowseContext {
    fn from(nav: &NavigationPath) -> Self {
        match &nav.show_folder {
            Some(show) => Self::Show {
                collection: nav.collection.clone(),
                year: nav.year.clone(),
                show: show.clone(),
            },
            None => Self::Year {
                collection: nav.collection.clone(),
                year: nav.year.clone(),
            },
        }
    }
}

/// Shown when there is no usable library yet.
pub fn greeting() -> Vec<DisplayItem> {
    [
        "GREETINGS PROFESSOR FALKEN,",
        "   SHALL WE PLAY SOME MUSIC?",
        "1. CLICK THE STAR,",
        "2. SELECT YOUR MUSIC LIBRARY,",
        "3. SELECT A SHOW OR ROLL DICE,",
    ]
    .into_iter()
    .map(|line| DisplayItem::Message(line.to_string()))
    .collect()
}

/// Two-line apology used for empty selections.
pub fn sorry(reason: &str) -> Vec<DisplayItem> {
    vec![
        DisplayItem::Message("I'M SORRY DAVE,".to_string()),
        DisplayItem::Message(reason.to_string()),
    ]
}

/// Contents of a year: tracks for a flat year, folders for a grouped one.
pub fn year_listing(content: &LibraryContent) -> Vec<DisplayItem> {
    if !content.has_content() {
        return sorry("NO AUDIO FILES FOUND");
    }
    if content.is_three_level_structure() {
        return content
            .tracks
            .iter()
            .map(DisplayItem::track)
            .collect();
    }
    content
        .show_folders
        .iter()
        .map(|f| DisplayItem::ShowFolder {
            name: f.name.clone(),
            track_count: f.track_count,
        })
        .collect()
}

/// Songs of one show folder, framed by navigation and a summary line.
pub fn show_listing(show: &str, songs: &[Track]) -> Vec<DisplayItem> {
    let mut items = Vec::with_capacity(songs.len() + 3);
    items.push(DisplayItem::Back);
    items.push(DisplayItem::Separator);
    items.extend(songs.iter().map(DisplayItem::track));
    let noun = if songs.len() == 1 { "SONG" } else { "SONGS" };
    items.push(DisplayItem::Info(format!("{show}: {} {noun}", songs.len())));
    items
}

/// Years in presentation order.
pub fn order_years(mut years: Vec<String>, newest_first: bool) -> Vec<String> {
    if newest_first {
        years.reverse();
    }
    years
}
