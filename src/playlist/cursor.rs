use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::library::{LibraryIndex, Track, probe_duration};

use super::display::{BrowseContext, DisplayItem};

/// A shuffle pick: what to play and where to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomPick {
    pub track: Track,
    pub start_at: Duration,
}

/// Decides what plays after the current track, and what a shuffle pick plays.
pub struct PlaylistCursor<'a> {
    index: &'a LibraryIndex,
    cross_show_boundaries: bool,
}

impl<'a> PlaylistCursor<'a> {
    pub fn new(index: &'a LibraryIndex, cross_show_boundaries: bool) -> Self {
        Self {
            index,
            cross_show_boundaries,
        }
    }

    /// Next playable track after `current` in the displayed list.
    ///
    /// `current` is matched by path, so files sharing a name stay distinct.
    /// Entries whose file vanished since the list was built are skipped.
    /// Returns `None` when `current` is not in the list or nothing playable
    /// follows it; the caller then stops playback. In a show-folder list the
    /// search may continue into the next show folder of the same year.
    pub fn play_next_song(
        &self,
        context: &BrowseContext,
        items: &[DisplayItem],
        current: &Path,
    ) -> Option<Track> {
        let Some(pos) = position_of(items, current) else {
            debug!(current = %current.display(), "current track is not in the displayed list");
            return None;
        };

        let found = items[pos + 1..]
            .iter()
            .filter_map(DisplayItem::track_path)
            .find_map(playable);
        if found.is_some() {
            return found;
        }

        match context {
            BrowseContext::Show {
                collection,
                year,
                show,
            } if self.cross_show_boundaries => self.first_song_after_show(collection, year, show),
            _ => None,
        }
    }

    /// Uniform pick over `all`, with a random start inside flat recordings.
    pub fn pick_random<R: Rng + ?Sized>(&self, all: &[PathBuf], rng: &mut R) -> Option<RandomPick> {
        self.pick_random_with(all, rng, probe_duration)
    }

    /// [`Self::pick_random`] with an explicit duration lookup.
    ///
    /// Files directly inside a year are long continuous recordings and start
    /// anywhere in `[0, duration)`; songs inside a show folder start at zero.
    pub fn pick_random_with<R, F>(&self, all: &[PathBuf], rng: &mut R, duration_of: F) -> Option<RandomPick>
    where
        R: Rng + ?Sized,
        F: Fn(&Path) -> Option<Duration>,
    {
        let path = all.choose(rng)?;
        let track = Track::from_path(path.clone())?;

        let flat = self
            .index
            .navigate_to_file(path)
            .is_some_and(|nav| nav.is_direct_file());
        let start_at = if flat {
            duration_of(path)
                .map(|total| total.as_millis() as u64)
                .filter(|&ms| ms > 0)
                .map(|ms| Duration::from_millis(rng.random_range(0..ms)))
                .unwrap_or(Duration::ZERO)
        } else {
            Duration::ZERO
        };

        debug!(path = %path.display(), ?start_at, "random pick");
        Some(RandomPick { track, start_at })
    }

    fn first_song_after_show(&self, collection: &str, year: &str, show: &str) -> Option<Track> {
        let content = self.index.shows(collection, year);
        let pos = content.show_folders.iter().position(|f| f.name == show)?;
        content.show_folders[pos + 1..]
            .iter()
            .find_map(|f| self.index.songs_in_show(&f.path).into_iter().next())
    }
}

/// Index of the playable entry for `path`.
pub fn position_of(items: &[DisplayItem], path: &Path) -> Option<usize> {
    items.iter().position(|i| i.track_path() == Some(path))
}

fn playable(path: &Path) -> Option<Track> {
    if !path.is_file() {
        debug!(path = %path.display(), "listed track is gone, skipping");
        return None;
    }
    Track::from_path(path)
}
