// SPDX-License-Identifier: MPL-2.0

//! Keeps the frame matching the playback clock at hand.

use std::time::Duration;

use tracing::debug;

use super::{
    backend::StreamBackend,
    clock::{PlaybackClock, SystemClock, TimeSource},
    context::StreamDecoderContext,
    decoder::VideoDecoder,
    error::{Error, Result},
    types::{Frame, Millis},
};

/// Receives frames when they become due.
pub trait FrameSink<P> {
    fn present(&mut self, frame: &Frame<P>);
}

/// Loops a video forever, following a [`PlaybackClock`].
///
/// Call [`tick`](Self::tick) or [`present_due`](Self::present_due) whenever
/// convenient; [`until_next_frame`](Self::until_next_frame) tells when the
/// held frame expires.
pub struct DecodingLoop<B: StreamBackend = StreamDecoderContext, C = SystemClock> {
    decoder: VideoDecoder<B>,
    clock: PlaybackClock<C>,
    current: Option<Frame<B::Picture>>,
}

impl<B: StreamBackend> DecodingLoop<B> {
    /// Start looping `decoder` on a clock that starts now.
    pub fn new(decoder: VideoDecoder<B>) -> Result<Self> {
        let clock = PlaybackClock::new(decoder.duration())?;
        Ok(Self::with_clock(decoder, clock))
    }
}

impl<B: StreamBackend, C: TimeSource> DecodingLoop<B, C> {
    pub fn with_clock(decoder: VideoDecoder<B>, clock: PlaybackClock<C>) -> Self {
        Self {
            decoder,
            clock,
            current: None,
        }
    }

    /// Bring the held frame up to date with the clock.
    ///
    /// Returns the new frame when it changed, `None` while the held frame is
    /// still the one to show.
    pub fn tick(&mut self) -> Result<Option<&Frame<B::Picture>>> {
        let time = self.clock.current_time();
        let sequential = match &self.current {
            Some(current) if current.contains(time) => return Ok(None),
            Some(current) => {
                if time < current.start_time {
                    debug!(%time, loops = self.clock.loop_count(), "Playback wrapped around");
                }
                time >= current.end_time && current.end_time == self.decoder.position()
            }
            None => false,
        };

        let frame = if sequential {
            self.next_frame_at(time)?
        } else {
            self.decoder.seek_to_frame_at(time)?
        };

        self.current = Some(frame);
        Ok(self.current.as_ref())
    }

    fn next_frame_at(&mut self, time: Millis) -> Result<Frame<B::Picture>> {
        match self.decoder.next_frame() {
            Ok(frame) if frame.contains(time) => Ok(frame),
            Ok(_) | Err(Error::Exhausted) => self.decoder.seek_to_frame_at(time),
            Err(err) => Err(err),
        }
    }

    /// [`tick`](Self::tick) and hand a changed frame to `sink`.
    ///
    /// Returns whether a frame was presented.
    pub fn present_due<S: FrameSink<B::Picture>>(&mut self, sink: &mut S) -> Result<bool> {
        match self.tick()? {
            Some(frame) => {
                sink.present(frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Time left until the held frame expires. Zero when a tick is due now.
    #[must_use]
    pub fn until_next_frame(&self) -> Duration {
        let time = self.clock.current_time();
        match &self.current {
            Some(frame) if frame.contains(time) => (frame.end_time - time).to_duration(),
            _ => Duration::ZERO,
        }
    }

    #[must_use]
    pub fn current_frame(&self) -> Option<&Frame<B::Picture>> {
        self.current.as_ref()
    }

    pub fn decoder(&self) -> &VideoDecoder<B> {
        &self.decoder
    }

    pub fn clock(&self) -> &PlaybackClock<C> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock<C> {
        &mut self.clock
    }
}
