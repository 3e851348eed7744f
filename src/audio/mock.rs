//! Recording backend for tests: no device, just a log of what was asked.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::PlaybackError;

use super::backend::{AudioBackend, AudioSession};
use super::waveform::WaveformSink;

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub calls: Mutex<Vec<String>>,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub last_volume: Mutex<Option<f32>>,
    pub tapped: AtomicBool,
    pub failing: Mutex<HashSet<PathBuf>>,
}

impl Recorder {
    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn last_volume(&self) -> Option<f32> {
        *self.last_volume.lock().unwrap()
    }

    pub fn fail_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }
}

pub(crate) struct MockBackend {
    pub recorder: Arc<Recorder>,
    pub total: Duration,
}

impl MockBackend {
    pub fn new(total: Duration) -> (Self, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (
            Self {
                recorder: recorder.clone(),
                total,
            },
            recorder,
        )
    }
}

impl AudioBackend for MockBackend {
    type Session = MockSession;

    fn open(
        &self,
        path: &Path,
        waveform: Option<Arc<dyn WaveformSink>>,
    ) -> Result<MockSession, PlaybackError> {
        let rec = &self.recorder;
        if rec.failing.lock().unwrap().contains(path) {
            rec.log(format!("open-failed {}", path.display()));
            return Err(PlaybackError::open_failed(path, "corrupt stream"));
        }
        rec.log(format!("open {}", path.display()));
        rec.tapped.store(waveform.is_some(), Ordering::SeqCst);
        let live = rec.live.fetch_add(1, Ordering::SeqCst) + 1;
        rec.max_live.fetch_max(live, Ordering::SeqCst);
        Ok(MockSession {
            recorder: rec.clone(),
            total: self.total,
            position: Duration::ZERO,
            finished: false,
        })
    }
}

pub(crate) struct MockSession {
    recorder: Arc<Recorder>,
    total: Duration,
    position: Duration,
    pub finished: bool,
}

impl AudioSession for MockSession {
    fn total_duration(&self) -> Duration {
        self.total
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn seek(&mut self, to: Duration) -> bool {
        self.recorder.log(format!("seek {}", to.as_secs()));
        self.position = to;
        true
    }

    fn play(&mut self) {
        self.recorder.log("play".into());
    }

    fn pause(&mut self) {
        self.recorder.log("pause".into());
    }

    fn stop(&mut self) {
        self.recorder.log("stop".into());
        self.finished = true;
    }

    fn set_volume(&mut self, volume: f32) {
        *self.recorder.last_volume.lock().unwrap() = Some(volume);
    }

    fn is_finished(&self) -> bool {
        self.finished || self.position >= self.total
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.recorder.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Waveform sink that counts what it receives.
#[derive(Debug, Default)]
pub(crate) struct CountingSink {
    pub samples: Mutex<Vec<f32>>,
    pub clears: AtomicUsize,
}

impl WaveformSink for CountingSink {
    fn add_sample(&self, peak: f32) {
        self.samples.lock().unwrap().push(peak);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
