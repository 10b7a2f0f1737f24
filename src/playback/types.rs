// SPDX-License-Identifier: MPL-2.0

//! Core types for timestamped playback.

use std::{
    fmt,
    ops::{Add, Rem, Sub},
    time::Duration,
};

use ffmpeg_next::Rational;

/// Frame duration used when neither the frame nor the stream provides one (25 FPS).
pub(crate) const DEFAULT_FRAME_DURATION: Millis = Millis::new(40);

/// A point or span on the playback timeline, in whole milliseconds.
///
/// Signed so that out-of-range requests such as `-1ms` are representable
/// and can be rejected instead of wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Millis(i64);

impl Millis {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Whole milliseconds of `duration`, saturating at `i64::MAX`.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        Self(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }

    /// Negative values clamp to zero.
    #[must_use]
    pub fn to_duration(self) -> Duration {
        Duration::from_millis(u64::try_from(self.0).unwrap_or(0))
    }

    /// Convert a timestamp in `time_base` units, rounding toward negative infinity.
    ///
    /// The same rounding is used for every conversion so that the end of one
    /// frame and the start of the next land on the same millisecond.
    #[must_use]
    pub fn from_timestamp(timestamp: i64, time_base: Rational) -> Self {
        let numerator = i128::from(time_base.numerator()) * 1000;
        let denominator = i128::from(time_base.denominator());
        if denominator == 0 {
            return Self::ZERO;
        }
        let millis = (i128::from(timestamp) * numerator).div_euclid(denominator);
        Self(clamp_i64(millis))
    }

    /// Convert to a timestamp in `time_base` units, rounding toward negative infinity.
    #[must_use]
    pub fn to_timestamp(self, time_base: Rational) -> i64 {
        let numerator = i128::from(time_base.denominator());
        let denominator = i128::from(time_base.numerator()) * 1000;
        if denominator == 0 {
            return 0;
        }
        clamp_i64((i128::from(self.0) * numerator).div_euclid(denominator))
    }
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl Add for Millis {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Millis {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Rem for Millis {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self {
        Self(self.0.rem_euclid(rhs.0))
    }
}

impl From<Duration> for Millis {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}

/// Decoded picture data handed to the rendering side.
pub trait Picture {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

impl Picture for ffmpeg_next::frame::Video {
    fn width(&self) -> u32 {
        ffmpeg_next::frame::Video::width(self)
    }

    fn height(&self) -> u32 {
        ffmpeg_next::frame::Video::height(self)
    }
}

/// A decoded video frame with its presentation interval.
///
/// The frame owns its picture: it stays valid after further decode calls
/// on the decoder that produced it.
#[derive(Debug, Clone)]
pub struct Frame<P = ffmpeg_next::frame::Video> {
    /// The decoded picture (planes, dimensions, pixel format).
    pub picture: P,
    /// Time at which this frame becomes visible.
    pub start_time: Millis,
    /// Time at which the next frame takes over. Always after `start_time`.
    pub end_time: Millis,
}

impl<P: Picture> Frame<P> {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.picture.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.picture.height()
    }
}

impl<P> Frame<P> {
    /// Whether `time` falls inside `[start_time, end_time)`.
    #[must_use]
    pub fn contains(&self, time: Millis) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// How long this frame is displayed.
    #[must_use]
    pub fn duration(&self) -> Millis {
        self.end_time - self.start_time
    }
}

/// Description of the selected video stream.
#[derive(Debug, Clone, Copy)]
pub struct StreamInfo {
    /// Index of the stream inside its container.
    pub index: usize,
    /// Real-world duration of one timestamp unit.
    pub time_base: Rational,
    /// Average frame rate, `0/0` if unknown.
    pub frame_rate: Rational,
    /// First timestamp of the stream in `time_base` units. Timeline zero.
    pub start_timestamp: i64,
    pub width: u32,
    pub height: u32,
    /// Frame count declared by the container, zero if unknown.
    pub frames: i64,
}

impl StreamInfo {
    /// Duration of one frame in `time_base` units, derived from the frame rate.
    #[must_use]
    pub fn nominal_frame_duration(&self) -> i64 {
        let rate_num = i128::from(self.frame_rate.numerator());
        let rate_den = i128::from(self.frame_rate.denominator());
        let tb_num = i128::from(self.time_base.numerator());
        let tb_den = i128::from(self.time_base.denominator());

        if rate_num > 0 && rate_den > 0 && tb_num > 0 {
            let units = (rate_den * tb_den) / (rate_num * tb_num);
            if units > 0 {
                return clamp_i64(units);
            }
        }
        DEFAULT_FRAME_DURATION.to_timestamp(self.time_base).max(1)
    }

    /// Convert a stream timestamp to a position on the playback timeline.
    #[must_use]
    pub fn timeline_position(&self, timestamp: i64) -> Millis {
        Millis::from_timestamp(timestamp.saturating_sub(self.start_timestamp), self.time_base)
    }

    /// Convert a timeline position back to a stream timestamp.
    #[must_use]
    pub fn stream_timestamp(&self, time: Millis) -> i64 {
        time.to_timestamp(self.time_base)
            .saturating_add(self.start_timestamp)
    }
}

/// Timing metadata of a demuxed packet.
pub trait PacketTiming {
    /// Index of the stream this packet belongs to.
    fn stream_index(&self) -> usize;
    fn pts(&self) -> Option<i64>;
    fn dts(&self) -> Option<i64>;
    /// Duration in stream time base units, zero if unknown.
    fn duration(&self) -> i64;
}

impl PacketTiming for ffmpeg_next::Packet {
    fn stream_index(&self) -> usize {
        self.stream()
    }

    fn pts(&self) -> Option<i64> {
        ffmpeg_next::Packet::pts(self)
    }

    fn dts(&self) -> Option<i64> {
        ffmpeg_next::Packet::dts(self)
    }

    fn duration(&self) -> i64 {
        ffmpeg_next::Packet::duration(self)
    }
}

/// Result of reading from the demuxer.
#[derive(Debug)]
pub enum Demuxed<K> {
    /// The next packet of any stream in the container.
    Packet(K),
    /// The container has no more packets.
    EndOfFile,
}

/// Result of asking the decoder for output.
#[derive(Debug)]
pub enum Decoded<P> {
    /// A frame was produced.
    Frame(RawFrame<P>),
    /// The decoder needs another packet before it can produce output.
    NeedsInput,
    /// The decoder was drained after end of stream; nothing more will come.
    EndOfStream,
}

/// A decoded picture with its untranslated stream timing.
#[derive(Debug)]
pub struct RawFrame<P> {
    pub picture: P,
    /// Best-effort presentation timestamp in stream time base units.
    pub timestamp: Option<i64>,
    /// Display duration in stream time base units, zero if unknown.
    pub duration: i64,
}
