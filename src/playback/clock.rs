// SPDX-License-Identifier: MPL-2.0

//! Wall-clock time mapped onto a looping video timeline.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use super::{
    error::{Error, Result},
    types::Millis,
};

/// A monotonic source of time, measured from an arbitrary fixed origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Real time, based on [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Time that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.0.fetch_add(duration_millis(by), Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.0.store(duration_millis(to), Ordering::SeqCst);
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::SeqCst))
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Position on a looping timeline of fixed length.
///
/// Time runs from the moment the clock is created or restarted and wraps
/// around every `video_duration`.
#[derive(Debug, Clone)]
pub struct PlaybackClock<C = SystemClock> {
    source: C,
    start: Duration,
    video_duration: Millis,
}

impl PlaybackClock {
    pub fn new(video_duration: Millis) -> Result<Self> {
        Self::with_source(video_duration, SystemClock::default())
    }
}

impl<C: TimeSource> PlaybackClock<C> {
    pub fn with_source(video_duration: Millis, source: C) -> Result<Self> {
        if video_duration <= Millis::ZERO {
            return Err(Error::ZeroDuration);
        }

        let start = source.now();
        Ok(Self {
            source,
            start,
            video_duration,
        })
    }

    fn elapsed(&self) -> Millis {
        Millis::from_duration(self.source.now().saturating_sub(self.start))
    }

    /// Current position on the timeline, in `[0, video_duration)`.
    #[must_use]
    pub fn current_time(&self) -> Millis {
        self.elapsed() % self.video_duration
    }

    /// Number of times the timeline wrapped around since the last restart.
    #[must_use]
    pub fn loop_count(&self) -> u64 {
        u64::try_from(self.elapsed().get() / self.video_duration.get()).unwrap_or(0)
    }

    pub fn restart(&mut self) {
        self.start = self.source.now();
    }

    #[must_use]
    pub fn video_duration(&self) -> Millis {
        self.video_duration
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}

/// Measures time elapsed since creation or the last restart.
#[derive(Debug, Clone)]
pub struct Stopwatch<C = SystemClock> {
    source: C,
    start: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::with_source(SystemClock::default())
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TimeSource> Stopwatch<C> {
    pub fn with_source(source: C) -> Self {
        let start = source.now();
        Self { source, start }
    }

    #[must_use]
    pub fn elapsed_time(&self) -> Duration {
        self.source.now().saturating_sub(self.start)
    }

    pub fn restart(&mut self) {
        self.start = self.source.now();
    }
}
