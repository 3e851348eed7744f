use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::audio::{AudioBackend, PlaybackEngine, PlaybackState, PlayerEvent, WaveformBuffer, WaveformSink};
use crate::config;
use crate::error::Result;
use crate::library::{LibraryEvent, LibraryIndex, Track};
use crate::playlist::{
    BrowseContext, DisplayItem, PlaylistCursor, greeting, order_years, show_listing, sorry, year_listing,
};

use super::commands::{Command, HELP};
use super::progress::{ProgressPoller, format_time};

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the control loop owns: the library, the engine and the list the
/// user is currently looking at.
pub struct Runtime<B: AudioBackend, W: Write> {
    settings: config::Settings,
    library: LibraryIndex,
    library_events: Receiver<LibraryEvent>,
    engine: PlaybackEngine<B>,
    player_events: Receiver<PlayerEvent>,
    poller: ProgressPoller,
    waveform: Option<Arc<WaveformBuffer>>,
    view: Option<BrowseContext>,
    items: Vec<DisplayItem>,
    last_progress: Option<(Duration, Duration)>,
    out: W,
}

impl<B: AudioBackend, W: Write> Runtime<B, W> {
    pub fn new(settings: config::Settings, mut library: LibraryIndex, backend: B, out: W) -> Self {
        let library_events = library.subscribe();
        let mut engine = PlaybackEngine::new(backend, settings.playback.default_volume);
        let player_events = engine.subscribe();
        let poller = ProgressPoller::new(Duration::from_millis(settings.playback.poll_interval_ms.max(1)));
        let waveform = settings
            .waveform
            .enabled
            .then(|| Arc::new(WaveformBuffer::new(settings.waveform.bars)));
        Self {
            settings,
            library,
            library_events,
            engine,
            player_events,
            poller,
            waveform,
            view: None,
            items: Vec::new(),
            last_progress: None,
            out,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<B> {
        &self.engine
    }

    pub fn library(&self) -> &LibraryIndex {
        &self.library
    }

    pub fn view(&self) -> Option<&BrowseContext> {
        self.view.as_ref()
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn last_progress(&self) -> Option<(Duration, Duration)> {
        self.last_progress
    }

    /// Greeting for an unusable library, the collection list otherwise.
    pub fn welcome(&mut self) -> Result<()> {
        self.list(&[])
    }

    pub fn handle(&mut self, cmd: Command) -> Result<Flow> {
        match cmd {
            Command::Play(path) => self.play(&path, None)?,
            Command::Select(name) => self.select(&name)?,
            Command::Pause => self.engine.pause(),
            Command::Resume => self.engine.resume(),
            Command::TogglePause => match self.engine.state() {
                PlaybackState::Playing => self.engine.pause(),
                PlaybackState::Paused => self.engine.resume(),
                PlaybackState::Stopped => writeln!(self.out, "nothing is loaded")?,
            },
            Command::Stop => self.engine.stop(),
            Command::Seek(to) => self.seek(to)?,
            Command::Volume(pct) => self.engine.set_volume(f32::from(pct) / 100.0),
            Command::VolumeUp => {
                let v = self.engine.volume() + self.settings.playback.volume_step;
                self.engine.set_volume(v);
            }
            Command::VolumeDown => {
                let v = self.engine.volume() - self.settings.playback.volume_step;
                self.engine.set_volume(v);
            }
            Command::ToggleMute => self.engine.toggle_mute(),
            Command::Random => self.random()?,
            Command::Next => {
                if !self.advance()? {
                    writeln!(self.out, "nothing to play next")?;
                }
            }
            Command::List(parts) => self.list(&parts)?,
            Command::Root(path) => self.change_root(path)?,
            Command::Status => self.status()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        self.drain_events();
        Ok(Flow::Continue)
    }

    /// One timer tick: auto-advance a drained track, then refresh the position.
    pub fn tick(&mut self) -> Result<()> {
        if self.engine.is_finished() {
            debug!("track finished");
            if !self.advance()? {
                self.engine.stop();
            }
        }
        if let Some(PlayerEvent::ProgressChanged { current, total }) = self.poller.poll(&self.engine) {
            trace!(current = %format_time(current), total = %format_time(total), "progress");
            self.last_progress = Some((current, total));
        }
        self.drain_events();
        Ok(())
    }

    /// Start `path`; on success the view follows it to its year or show.
    fn play(&mut self, path: &Path, start_at: Option<Duration>) -> Result<()> {
        let sink = self.waveform.clone().map(|w| w as Arc<dyn WaveformSink>);
        match self.engine.play(path, start_at, sink) {
            Ok(()) => {
                self.follow(path);
                let name = self.engine.current_track().map(|t| t.display_name.clone()).unwrap_or_default();
                writeln!(self.out, "▶ {name}")?;
            }
            Err(err) => writeln!(self.out, "{err}")?,
        }
        Ok(())
    }

    /// Play whatever comes after the current track. Returns whether something started.
    fn advance(&mut self) -> Result<bool> {
        let (Some(current), Some(view)) = (self.engine.current_path(), self.view.clone()) else {
            return Ok(false);
        };
        let cursor = PlaylistCursor::new(&self.library, self.settings.library.cross_show_boundaries);
        let Some(next) = cursor.play_next_song(&view, &self.items, &current) else {
            info!(current = %current.display(), "no playable next track");
            return Ok(false);
        };
        self.play(&next.path, None)?;
        Ok(self.engine.state() == PlaybackState::Playing)
    }

    fn random(&mut self) -> Result<()> {
        let all = self.library.all_audio_files();
        let cursor = PlaylistCursor::new(&self.library, self.settings.library.cross_show_boundaries);
        match cursor.pick_random(&all, &mut rand::rng()) {
            Some(pick) => self.play(&pick.track.path, Some(pick.start_at)),
            None => self.print_items(&sorry("NO AUDIO FILES FOUND")),
        }
    }

    fn seek(&mut self, to: Duration) -> Result<()> {
        self.poller.begin_seek();
        self.poller.preview_seek(to);
        if !self.poller.end_seek(&mut self.engine, to) {
            writeln!(self.out, "cannot seek to {}", format_time(to))?;
        }
        Ok(())
    }

    fn select(&mut self, name: &str) -> Result<()> {
        let Some(view) = self.view.clone() else {
            return self.print_items(&sorry("NO SHOW SELECTED"));
        };
        let is_folder = self
            .items
            .iter()
            .any(|i| matches!(i, DisplayItem::ShowFolder { name: n, .. } if n == name));
        if is_folder {
            let parts = [view.collection().to_string(), view.year().to_string(), name.to_string()];
            return self.list(&parts);
        }

        // A bare name picks the first entry with that name; a full file name
        // tells apart files that differ only by extension.
        let chosen = self
            .items
            .iter()
            .filter_map(|i| Some((i.track_name()?, i.track_path()?)))
            .find(|(n, p)| *n == name || p.file_name().is_some_and(|f| f == name))
            .map(|(_, p)| p.to_path_buf());
        match chosen.filter(|p| p.is_file()) {
            Some(path) => self.play(&path, None),
            None => self.print_items(&sorry("TRACK NOT FOUND")),
        }
    }

    /// Browse by `collection`, `collection/year` or `collection/year/show`.
    fn list(&mut self, parts: &[String]) -> Result<()> {
        if !self.library.has_valid_library() {
            return self.print_items(&greeting());
        }
        match parts {
            [] => {
                let lines: Vec<_> = self.library.collections().into_iter().map(DisplayItem::Info).collect();
                self.print_items(&lines)
            }
            [collection] => {
                let years = order_years(self.library.years(collection), self.settings.library.newest_first);
                if years.is_empty() {
                    return self.print_items(&sorry("COLLECTION NOT FOUND"));
                }
                let lines: Vec<_> = years.into_iter().map(DisplayItem::Info).collect();
                self.print_items(&lines)
            }
            [collection, year] => {
                let items = year_listing(&self.library.shows(collection, year));
                self.set_view(
                    BrowseContext::Year {
                        collection: collection.clone(),
                        year: year.clone(),
                    },
                    items,
                )
            }
            [collection, year, show, ..] => {
                let Some(dir) = self.library.show_dir(collection, year, show) else {
                    return self.print_items(&sorry("FOLDER NOT FOUND"));
                };
                let items = show_listing(show, &self.library.songs_in_show(&dir));
                self.set_view(
                    BrowseContext::Show {
                        collection: collection.clone(),
                        year: year.clone(),
                        show: show.clone(),
                    },
                    items,
                )
            }
        }
    }

    fn change_root(&mut self, path: std::path::PathBuf) -> Result<()> {
        if !LibraryIndex::validate_root(&path) {
            return self.print_items(&sorry("THAT FOLDER HAS NO COLLECTIONS"));
        }
        self.library.set_root(Some(path));
        self.drain_events();
        self.welcome()
    }

    /// Point the view at the year or show holding `path`.
    fn follow(&mut self, path: &Path) {
        let Some(nav) = self.library.navigate_to_file(path) else {
            debug!(path = %path.display(), "playing file is outside the library");
            return;
        };
        debug!(at = %nav.relative_path().display(), "view follows playback");
        let context = BrowseContext::from(&nav);
        self.items = match &context {
            BrowseContext::Year { collection, year } => year_listing(&self.library.shows(collection, year)),
            BrowseContext::Show {
                collection,
                year,
                show,
            } => {
                let songs = self
                    .library
                    .show_dir(collection, year, show)
                    .map(|dir| self.library.songs_in_show(&dir))
                    .unwrap_or_default();
                show_listing(show, &songs)
            }
        };
        self.view = Some(context);
    }

    fn set_view(&mut self, context: BrowseContext, items: Vec<DisplayItem>) -> Result<()> {
        self.print_items(&items)?;
        self.view = Some(context);
        self.items = items;
        Ok(())
    }

    fn status(&mut self) -> Result<()> {
        let info = self.engine.info();
        let name = info
            .track
            .as_ref()
            .map(|t: &Track| format!("{} [{}]", t.display_name, t.format))
            .unwrap_or_else(|| "-".to_string());
        let mute = if info.is_muted { " (muted)" } else { "" };
        writeln!(
            self.out,
            "{:?} {name} {}/{} vol {:.0}%{mute}",
            info.state,
            format_time(info.position),
            format_time(info.total),
            info.volume * 100.0,
        )?;
        if let Some(w) = &self.waveform {
            writeln!(self.out, "{}", render_bars(&w.snapshot()))?;
        }
        Ok(())
    }

    fn print_items(&mut self, items: &[DisplayItem]) -> Result<()> {
        for item in items {
            writeln!(self.out, "{}", item.label())?;
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.player_events.try_recv() {
            match &event {
                PlayerEvent::Stopped => self.last_progress = None,
                PlayerEvent::ProgressChanged { current, total } => self.last_progress = Some((*current, *total)),
                _ => {}
            }
            debug!(?event, "player event");
        }
        while let Ok(LibraryEvent::LibraryChanged { new_root }) = self.library_events.try_recv() {
            info!(root = ?new_root, "library changed, resetting view");
            self.view = None;
            self.items.clear();
        }
    }
}

/// Drive `runtime` from `commands` until quit or the sender hangs up.
pub fn run<B: AudioBackend, W: Write>(runtime: &mut Runtime<B, W>, commands: &Receiver<Command>) -> Result<()> {
    runtime.welcome()?;
    loop {
        match commands.recv_timeout(runtime.poller.interval()) {
            Ok(cmd) => {
                if runtime.handle(cmd)? == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        runtime.tick()?;
    }
    runtime.engine.stop();
    runtime.drain_events();
    Ok(())
}

/// Peaks as a row of block characters.
pub fn render_bars(peaks: &[f32]) -> String {
    const LEVELS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    peaks
        .iter()
        .map(|p| LEVELS[(p.clamp(0.0, 1.0) * 8.0).round() as usize])
        .collect()
}
