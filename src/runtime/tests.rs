use super::*;
use crate::audio::mock::MockBackend;
use crate::audio::{PlaybackEngine, PlaybackState, PlayerEvent};
use crate::playlist::{BrowseContext, DisplayItem};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn touch(root: &Path, rel: &str) -> PathBuf {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(&p, b"not real audio").unwrap();
    p
}

fn output(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).into_owned()
}

#[test]
fn poller_reports_only_while_playing() {
    let (backend, _rec) = MockBackend::new(Duration::from_secs(60));
    let mut engine = PlaybackEngine::new(backend, 0.5);
    let poller = ProgressPoller::new(Duration::from_millis(100));

    assert!(poller.poll(&engine).is_none());
    engine.play(Path::new("/m/A/1995/x.mp3"), None, None).unwrap();
    assert_eq!(
        poller.poll(&engine),
        Some(PlayerEvent::ProgressChanged {
            current: Duration::ZERO,
            total: Duration::from_secs(60)
        })
    );
    engine.pause();
    assert!(poller.poll(&engine).is_none());
}

#[test]
fn seeking_suspends_polling_until_the_final_value_lands() {
    let (backend, rec) = MockBackend::new(Duration::from_secs(60));
    let mut engine = PlaybackEngine::new(backend, 0.5);
    let mut poller = ProgressPoller::new(Duration::from_millis(100));
    engine.play(Path::new("/m/A/1995/x.mp3"), None, None).unwrap();

    assert!(poller.preview_seek(Duration::from_secs(5)).is_none());
    poller.begin_seek();
    assert!(poller.is_seeking());
    assert_eq!(poller.preview_seek(Duration::from_secs(20)), Some(Duration::from_secs(20)));
    assert!(poller.poll(&engine).is_none());
    assert!(!rec.calls().iter().any(|c| c.starts_with("seek")));

    assert!(poller.end_seek(&mut engine, Duration::from_secs(30)));
    assert!(!poller.is_seeking());
    assert_eq!(rec.calls().iter().filter(|c| c.starts_with("seek")).count(), 1);
    assert_eq!(engine.position(), Duration::from_secs(30));
    assert!(poller.poll(&engine).is_some());
}

#[test]
fn format_time_switches_to_hours() {
    assert_eq!(format_time(Duration::from_secs(75)), "01:15");
    assert_eq!(format_time(Duration::from_secs(3725)), "1:02:05");
}

#[test]
fn render_bars_scales_peaks() {
    assert_eq!(render_bars(&[0.0, 0.5, 1.0, 3.0]), " ▄██");
}

#[test]
fn empty_library_shows_the_greeting() {
    let mut out = Vec::new();
    {
        let (backend, _rec) = MockBackend::new(Duration::from_secs(10));
        let mut rt = Runtime::new(config::Settings::default(), LibraryIndex::new(None), backend, &mut out);
        rt.welcome().unwrap();
        assert_eq!(rt.handle(Command::Random).unwrap(), Flow::Continue);
    }
    let text = output(&out);
    assert!(text.contains("GREETINGS PROFESSOR FALKEN,"));
    assert!(text.contains("NO AUDIO FILES FOUND"));
}

#[test]
fn finished_track_advances_then_stops_at_the_end_of_the_year() {
    let dir = tempdir().unwrap();
    let a = touch(dir.path(), "BandA/1995/Show1/a.mp3");
    let b = touch(dir.path(), "BandA/1995/Show1/b.mp3");
    touch(dir.path(), "BandA/1996/Show9/z.mp3");
    let total = Duration::from_secs(10);
    let (backend, _rec) = MockBackend::new(total);
    let mut out = Vec::new();
    let mut rt = Runtime::new(
        config::Settings::default(),
        LibraryIndex::new(Some(dir.path().to_path_buf())),
        backend,
        &mut out,
    );

    rt.handle(Command::Play(a.clone())).unwrap();
    assert_eq!(
        rt.view(),
        Some(&BrowseContext::Show {
            collection: "BandA".into(),
            year: "1995".into(),
            show: "Show1".into()
        })
    );

    rt.tick().unwrap();
    assert_eq!(rt.engine().current_path(), Some(a));
    assert!(rt.last_progress().is_some());

    rt.handle(Command::Seek(total)).unwrap();
    rt.tick().unwrap();
    assert_eq!(rt.engine().current_path(), Some(b));
    assert_eq!(rt.engine().state(), PlaybackState::Playing);

    rt.handle(Command::Seek(total)).unwrap();
    rt.tick().unwrap();
    assert_eq!(rt.engine().state(), PlaybackState::Stopped);
}

#[test]
fn select_opens_folders_and_plays_tracks() {
    let dir = tempdir().unwrap();
    touch(dir.path(), "BandA/1995/Show1/a.mp3");
    let b = touch(dir.path(), "BandA/1995/Show1/b.flac");
    let (backend, rec) = MockBackend::new(Duration::from_secs(10));
    let mut out = Vec::new();
    {
        let mut rt = Runtime::new(
            config::Settings::default(),
            LibraryIndex::new(Some(dir.path().to_path_buf())),
            backend,
            &mut out,
        );

        rt.handle(Command::List(vec!["BandA".into(), "1995".into()])).unwrap();
        assert_eq!(
            rt.items(),
            &[DisplayItem::ShowFolder {
                name: "Show1".into(),
                track_count: 2
            }]
        );

        rt.handle(Command::Select("Show1".into())).unwrap();
        assert!(matches!(rt.view(), Some(BrowseContext::Show { .. })));

        rt.handle(Command::Select("nope".into())).unwrap();
        assert_eq!(rt.engine().state(), PlaybackState::Stopped);

        rt.handle(Command::Select("b".into())).unwrap();
        assert_eq!(rt.engine().current_path(), Some(b.clone()));
    }
    assert!(rec.calls().contains(&format!("open {}", b.display())));
    assert!(output(&out).contains("TRACK NOT FOUND"));
}

#[test]
fn select_and_advance_follow_listed_files_not_guessed_names() {
    let dir = tempdir().unwrap();
    let a_flac = touch(dir.path(), "BandA/1995/a.flac");
    let a_mp3 = touch(dir.path(), "BandA/1995/a.mp3");
    let b = touch(dir.path(), "BandA/1995/b.MP3");
    let total = Duration::from_secs(10);
    let (backend, _rec) = MockBackend::new(total);
    let mut rt = Runtime::new(
        config::Settings::default(),
        LibraryIndex::new(Some(dir.path().to_path_buf())),
        backend,
        Vec::new(),
    );
    rt.handle(Command::List(vec!["BandA".into(), "1995".into()])).unwrap();

    rt.handle(Command::Select("b".into())).unwrap();
    assert_eq!(rt.engine().current_path(), Some(b));

    rt.handle(Command::Select("a.mp3".into())).unwrap();
    assert_eq!(rt.engine().current_path(), Some(a_mp3.clone()));

    rt.handle(Command::Select("a".into())).unwrap();
    assert_eq!(rt.engine().current_path(), Some(a_flac));
    rt.handle(Command::Seek(total)).unwrap();
    rt.tick().unwrap();
    assert_eq!(rt.engine().current_path(), Some(a_mp3));
}

#[test]
fn failed_play_reports_the_file_and_leaves_the_engine_stopped() {
    let dir = tempdir().unwrap();
    let bad = touch(dir.path(), "BandA/1995/broken.mp3");
    let (backend, rec) = MockBackend::new(Duration::from_secs(10));
    rec.fail_on(bad.clone());
    let mut out = Vec::new();
    {
        let mut rt = Runtime::new(
            config::Settings::default(),
            LibraryIndex::new(Some(dir.path().to_path_buf())),
            backend,
            &mut out,
        );
        rt.handle(Command::Play(bad)).unwrap();
        assert_eq!(rt.engine().state(), PlaybackState::Stopped);
        assert!(rt.view().is_none());
    }
    let text = output(&out);
    assert!(text.contains("could not open"));
    assert!(text.contains("broken.mp3"));
}

#[test]
fn volume_steps_clamp_and_mute_toggles() {
    let (backend, _rec) = MockBackend::new(Duration::from_secs(10));
    let mut rt = Runtime::new(config::Settings::default(), LibraryIndex::new(None), backend, Vec::new());

    rt.handle(Command::Volume(100)).unwrap();
    rt.handle(Command::VolumeUp).unwrap();
    assert_eq!(rt.engine().volume(), 1.0);
    rt.handle(Command::Volume(0)).unwrap();
    rt.handle(Command::VolumeDown).unwrap();
    assert_eq!(rt.engine().volume(), 0.0);

    rt.handle(Command::ToggleMute).unwrap();
    assert!(rt.engine().is_muted());
    rt.handle(Command::ToggleMute).unwrap();
    assert!(!rt.engine().is_muted());
}

#[test]
fn changing_root_resets_the_view() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    touch(first.path(), "BandA/1995/x.mp3");
    touch(second.path(), "BandB/2001/y.mp3");
    let (backend, _rec) = MockBackend::new(Duration::from_secs(10));
    let mut rt = Runtime::new(
        config::Settings::default(),
        LibraryIndex::new(Some(first.path().to_path_buf())),
        backend,
        Vec::new(),
    );

    rt.handle(Command::List(vec!["BandA".into(), "1995".into()])).unwrap();
    assert!(rt.view().is_some());

    rt.handle(Command::Root(first.path().join("BandA/1995/x.mp3"))).unwrap();
    assert!(rt.view().is_some());
    assert_eq!(rt.library().root(), Some(first.path()));

    rt.handle(Command::Root(second.path().to_path_buf())).unwrap();
    assert!(rt.view().is_none());
    assert_eq!(rt.library().collections(), vec!["BandB".to_string()]);
}

#[test]
fn run_stops_playback_on_quit() {
    let (backend, rec) = MockBackend::new(Duration::from_secs(10));
    let mut settings = config::Settings::default();
    settings.playback.poll_interval_ms = 1;
    let mut rt = Runtime::new(settings, LibraryIndex::new(None), backend, Vec::new());
    let (tx, rx) = mpsc::channel();
    tx.send(Command::Play("/m/A/1995/x.mp3".into())).unwrap();
    tx.send(Command::Quit).unwrap();

    event_loop::run(&mut rt, &rx).unwrap();
    assert_eq!(rt.engine().state(), PlaybackState::Stopped);
    assert_eq!(rec.live(), 0);
}

#[test]
fn command_line_root_wins_over_config() {
    let dir = tempdir().unwrap();
    let mut settings = config::Settings::default();
    settings.library.root = Some(PathBuf::from("/configured"));
    assert_eq!(
        resolve_root(Some(dir.path().to_path_buf()), &settings),
        Some(dir.path().to_path_buf())
    );
    assert_eq!(resolve_root(None, &settings), Some(PathBuf::from("/configured")));
}
