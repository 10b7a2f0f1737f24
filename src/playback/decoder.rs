// SPDX-License-Identifier: MPL-2.0

//! Sequential and random-access decoding of one video stream.

use tracing::{debug, trace, warn};

use super::{
    backend::StreamBackend,
    context::StreamDecoderContext,
    error::{Error, Result},
    types::{Decoded, Demuxed, Frame, Millis, PacketTiming, RawFrame, StreamInfo},
};

/// Tuning knobs for [`VideoDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Seeks at most this far ahead of the current position decode forward
    /// instead of seeking the container.
    pub seek_ahead: Millis,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            seek_ahead: Millis::new(1000),
        }
    }
}

/// Decodes timestamped frames from a single video stream.
///
/// Created by [`Loader`](super::Loader). Frames come out in presentation
/// order with contiguous intervals: the end of one frame is the start of the
/// next, the first frame starts at zero and the last one ends at
/// [`duration`](Self::duration).
#[derive(Debug)]
pub struct VideoDecoder<B: StreamBackend = StreamDecoderContext> {
    context: B,
    duration: Millis,
    frames: u64,
    options: DecoderOptions,
    /// End of stream was observed. Cleared by a reset or a container seek.
    finished: bool,
    /// End of file was sent to the decoder, only buffered frames remain.
    draining: bool,
    /// End time of the last returned frame.
    position: Millis,
    /// `position` is a real frame boundary. False after a container seek
    /// until a frame has been placed on the timeline.
    anchored: bool,
    /// Start time of the last returned frame, checked for monotonicity.
    last_start: Option<Millis>,
}

impl<B: StreamBackend> VideoDecoder<B> {
    pub(crate) fn new(context: B, duration: Millis, frames: u64, options: DecoderOptions) -> Self {
        Self {
            context,
            duration,
            frames,
            options,
            finished: false,
            draining: false,
            position: Millis::ZERO,
            anchored: true,
            last_start: None,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.context.info().width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.context.info().height
    }

    /// Nominal number of frames in the stream.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Exact length of the timeline, measured when the file was loaded.
    #[must_use]
    pub fn duration(&self) -> Millis {
        self.duration
    }

    /// End time of the most recently returned frame.
    #[must_use]
    pub fn position(&self) -> Millis {
        self.position
    }

    #[must_use]
    pub fn info(&self) -> &StreamInfo {
        self.context.info()
    }

    #[must_use]
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// The demuxer/decoder this decoder runs on.
    pub fn backend(&self) -> &B {
        &self.context
    }

    /// Whether [`next_frame`](Self::next_frame) may still produce a frame.
    #[must_use]
    pub fn has_frames(&self) -> bool {
        !self.finished
    }

    /// Decode the frame following the last returned one.
    ///
    /// Fails with [`Error::Exhausted`] once the stream has ended, until
    /// [`reset`](Self::reset) or a seek rewinds it.
    ///
    /// # Panics
    ///
    /// If the stream yields a frame that starts before the previous one.
    /// Such a bitstream is malformed and there is no meaningful frame to
    /// return.
    pub fn next_frame(&mut self) -> Result<Frame<B::Picture>> {
        if self.finished {
            return Err(Error::Exhausted);
        }

        let frame = self.advance()?;
        if let Some(last_start) = self.last_start {
            assert!(
                frame.start_time >= last_start,
                "frame timestamps went backwards: {} after {}",
                frame.start_time,
                last_start
            );
        }
        self.last_start = Some(frame.start_time);
        Ok(frame)
    }

    /// Decode the frame visible at `time`, so that
    /// `start_time <= time < end_time`.
    ///
    /// Subsequent [`next_frame`](Self::next_frame) calls continue after the
    /// returned frame.
    pub fn seek_to_frame_at(&mut self, time: Millis) -> Result<Frame<B::Picture>> {
        if time < Millis::ZERO || time >= self.duration {
            return Err(Error::SeekRange {
                time,
                duration: self.duration,
            });
        }

        let frame = if !self.finished
            && time >= self.position
            && time - self.position <= self.options.seek_ahead
        {
            trace!(%time, position = %self.position, "Seeking forward by decoding");
            self.decode_until(time)?
        } else {
            let timestamp = self.context.info().stream_timestamp(time);
            debug!(%time, timestamp, "Seeking container");
            self.seek_container(timestamp)?;
            let frame = self.decode_until(time)?;

            if frame.start_time > time {
                warn!(
                    %time,
                    landed = %frame.start_time,
                    "Container seek landed past the target, scanning from the start"
                );
                self.rewind()?;
                self.decode_until(time)?
            } else {
                frame
            }
        };

        if !frame.contains(time) {
            warn!(
                %time,
                start = %frame.start_time,
                end = %frame.end_time,
                "No frame covers the requested time"
            );
        }
        self.last_start = Some(frame.start_time);
        Ok(frame)
    }

    /// Rewind to the first frame of the stream.
    pub fn reset(&mut self) -> Result<()> {
        debug!("Resetting decoder to the start of the stream");
        self.rewind()
    }

    fn rewind(&mut self) -> Result<()> {
        let start = self.context.info().start_timestamp;
        self.seek_container(start)?;
        self.anchored = true;
        Ok(())
    }

    fn seek_container(&mut self, timestamp: i64) -> Result<()> {
        self.context.flush();
        self.context.seek(timestamp).map_err(Error::Seek)?;

        self.finished = false;
        self.draining = false;
        self.last_start = None;
        self.anchored = false;
        self.position = self
            .context
            .info()
            .timeline_position(timestamp)
            .max(Millis::ZERO);
        Ok(())
    }

    /// Decode forward, dropping frames that end at or before `time`.
    fn decode_until(&mut self, time: Millis) -> Result<Frame<B::Picture>> {
        loop {
            let frame = self.advance()?;
            if frame.end_time > time {
                return Ok(frame);
            }
            trace!(start = %frame.start_time, end = %frame.end_time, "Discarding frame");
        }
    }

    /// Produce the next frame on the timeline and move the position past it.
    fn advance(&mut self) -> Result<Frame<B::Picture>> {
        loop {
            let Some(raw) = self.decode_frame()? else {
                debug!(position = %self.position, "End of stream");
                self.finished = true;
                return Err(Error::Exhausted);
            };

            if raw.timestamp.is_none() && !self.anchored {
                warn!("Frame without timestamp after a seek, scanning from the start");
                self.rewind()?;
                continue;
            }

            if let Some(frame) = self.timestamp(raw) {
                self.position = frame.end_time;
                self.anchored = true;
                if frame.end_time >= self.duration {
                    self.finished = true;
                }
                return Ok(frame);
            }
        }
    }

    /// Pull one decoded frame, feeding packets of the selected stream as the
    /// decoder asks for them. `None` once the decoder is fully drained.
    fn decode_frame(&mut self) -> Result<Option<RawFrame<B::Picture>>> {
        let index = self.context.info().index;

        loop {
            match self.context.receive_frame().map_err(Error::Decode)? {
                Decoded::Frame(raw) => return Ok(Some(raw)),
                Decoded::EndOfStream => return Ok(None),
                Decoded::NeedsInput if self.draining => return Ok(None),
                Decoded::NeedsInput => {}
            }

            match self.context.read_packet().map_err(Error::Decode)? {
                Demuxed::Packet(packet) => {
                    if packet.stream_index() != index {
                        continue;
                    }
                    trace!(pts = ?packet.pts(), dts = ?packet.dts(), "Sending packet");
                    self.context.send_packet(&packet).map_err(Error::Decode)?;
                }
                Demuxed::EndOfFile => {
                    trace!("End of file, draining decoder");
                    self.context.send_eof().map_err(Error::Decode)?;
                    self.draining = true;
                }
            }
        }
    }

    /// Place a decoded frame on the timeline. `None` for frames that fall
    /// entirely outside of `[0, duration)` or last less than a millisecond.
    fn timestamp(&self, raw: RawFrame<B::Picture>) -> Option<Frame<B::Picture>> {
        let info = self.context.info();
        let frame_duration = if raw.duration > 0 {
            raw.duration
        } else {
            info.nominal_frame_duration()
        };

        let (start_time, end_time) = match raw.timestamp {
            Some(timestamp) => (
                info.timeline_position(timestamp),
                info.timeline_position(timestamp.saturating_add(frame_duration)),
            ),
            None => {
                warn!(position = %self.position, "Frame has no timestamp, placing it after the previous one");
                (
                    self.position,
                    self.position + Millis::from_timestamp(frame_duration, info.time_base),
                )
            }
        };

        if end_time <= Millis::ZERO || start_time >= self.duration {
            trace!(%start_time, %end_time, "Skipping frame outside of the timeline");
            return None;
        }

        let start_time = start_time.max(Millis::ZERO);
        let end_time = end_time.min(self.duration);
        if end_time <= start_time {
            trace!(%start_time, %end_time, "Skipping frame shorter than a millisecond");
            return None;
        }

        Some(Frame {
            picture: raw.picture,
            start_time,
            end_time,
        })
    }
}
