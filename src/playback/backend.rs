// SPDX-License-Identifier: MPL-2.0

//! The demuxer/decoder capability surface used by [`VideoDecoder`].
//!
//! [`StreamDecoderContext`] implements it on top of FFmpeg. The decoder only
//! talks to this trait, so the whole timing and seeking logic can run on any
//! source that can deliver packets and decode them.
//!
//! [`VideoDecoder`]: super::VideoDecoder
//! [`StreamDecoderContext`]: super::StreamDecoderContext

use super::types::{Decoded, Demuxed, PacketTiming, Picture, StreamInfo};

/// One opened video stream: its container read cursor plus a decoder.
pub trait StreamBackend {
    /// Compressed packet read from the container.
    type Packet: PacketTiming;
    /// Decoded picture produced by the decoder.
    type Picture: Picture;

    /// The selected video stream.
    fn info(&self) -> &StreamInfo;

    /// Read the next packet of any stream from the container.
    fn read_packet(&mut self) -> Result<Demuxed<Self::Packet>, ffmpeg_next::Error>;

    /// Feed a packet of the selected stream to the decoder.
    fn send_packet(&mut self, packet: &Self::Packet) -> Result<(), ffmpeg_next::Error>;

    /// Tell the decoder no more packets will come so it releases buffered frames.
    fn send_eof(&mut self) -> Result<(), ffmpeg_next::Error>;

    /// Take the next decoded frame, if the decoder has one.
    fn receive_frame(&mut self) -> Result<Decoded<Self::Picture>, ffmpeg_next::Error>;

    /// Move the read cursor to the keyframe at or before `timestamp`
    /// (selected stream time base units).
    fn seek(&mut self, timestamp: i64) -> Result<(), ffmpeg_next::Error>;

    /// Drop all frames buffered in the decoder and leave draining mode.
    fn flush(&mut self);
}
