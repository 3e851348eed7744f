//! Peak-amplitude tap for the waveform display.
//!
//! The tap runs inside the audio output thread, so nothing here may block:
//! sinks drop a sample rather than wait for a lock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rodio::source::SeekError;
use rodio::{ChannelCount, Sample, SampleRate, Source};

/// Samples folded into one peak (~23 ms at 44.1 kHz).
pub const DEFAULT_WINDOW: usize = 1024;

/// Receiver of peak values, usually a display widget.
pub trait WaveformSink: Send + Sync {
    /// Called from the audio thread with a peak in `[0, 1]`. Must not block.
    fn add_sample(&self, peak: f32);
    /// Reset to a flat, silent display.
    fn clear(&self);
}

/// Running peak over a fixed window of samples.
#[derive(Debug, Clone)]
pub struct PeakDecimator {
    window: usize,
    count: usize,
    peak: f32,
}

impl PeakDecimator {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            count: 0,
            peak: 0.0,
        }
    }

    /// Feed one sample; returns the window's peak once the window fills.
    #[inline]
    pub fn push(&mut self, sample: f32) -> Option<f32> {
        let level = sample.abs();
        if level > self.peak {
            self.peak = level;
        }
        self.count += 1;
        if self.count < self.window {
            return None;
        }
        let peak = self.peak.min(1.0);
        self.peak = 0.0;
        self.count = 0;
        Some(peak)
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.peak = 0.0;
    }
}

/// A `Source` wrapper that passes samples through untouched while feeding
/// window peaks to a [`WaveformSink`].
pub struct WaveformTap<S> {
    inner: S,
    decimator: PeakDecimator,
    sink: Arc<dyn WaveformSink>,
}

impl<S> WaveformTap<S> {
    pub fn new(inner: S, window: usize, sink: Arc<dyn WaveformSink>) -> Self {
        Self {
            inner,
            decimator: PeakDecimator::new(window),
            sink,
        }
    }
}

impl<S> Iterator for WaveformTap<S>
where
    S: Source,
{
    type Item = Sample;

    #[inline]
    fn next(&mut self) -> Option<Sample> {
        let sample = self.inner.next()?;
        if let Some(peak) = self.decimator.push(sample) {
            self.sink.add_sample(peak);
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> Source for WaveformTap<S>
where
    S: Source,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.decimator.reset();
        self.inner.try_seek(pos)
    }
}

/// Ring of the most recent peaks, read by the display.
#[derive(Debug)]
pub struct WaveformBuffer {
    bars: Mutex<VecDeque<f32>>,
    capacity: usize,
}

impl WaveformBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            bars: Mutex::new(VecDeque::from(vec![0.0; capacity])),
            capacity,
        }
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<f32> {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        bars.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl WaveformSink for WaveformBuffer {
    fn add_sample(&self, peak: f32) {
        // Display reading the ring: drop this peak instead of stalling audio.
        let Ok(mut bars) = self.bars.try_lock() else {
            return;
        };
        bars.push_back(peak.clamp(0.0, 1.0));
        while bars.len() > self.capacity {
            bars.pop_front();
        }
    }

    fn clear(&self) {
        let mut bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        bars.iter_mut().for_each(|b| *b = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_buffer_drops_the_peak_instead_of_waiting() {
        let buf = WaveformBuffer::new(2);
        {
            let _reader = buf.bars.lock().unwrap();
            buf.add_sample(0.9);
        }
        assert_eq!(buf.snapshot(), vec![0.0, 0.0]);
        buf.add_sample(0.9);
        assert_eq!(buf.snapshot(), vec![0.0, 0.9]);
    }
}
