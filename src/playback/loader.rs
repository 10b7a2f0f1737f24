// SPDX-License-Identifier: MPL-2.0

//! Opening media files and preparing decoders for them.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{
    backend::StreamBackend,
    context::StreamDecoderContext,
    decoder::{DecoderOptions, VideoDecoder},
    error::{Error, Result},
    types::{Demuxed, Millis, PacketTiming},
};

/// Open `path` and return a decoder for its best video stream.
pub fn load(path: impl AsRef<Path>) -> Result<VideoDecoder> {
    Loader::new(path.as_ref()).video_stream_decoder()
}

/// Produces [`VideoDecoder`]s for a media file.
#[derive(Debug, Clone)]
pub struct Loader {
    path: PathBuf,
    options: DecoderOptions,
}

impl Loader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: DecoderOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the file, select its best video stream and measure its duration.
    ///
    /// The returned decoder is positioned at the first frame.
    pub fn video_stream_decoder(&self) -> Result<VideoDecoder> {
        info!(path = %self.path.display(), "Loading video");
        let context = StreamDecoderContext::open(&self.path)?;
        self.decoder_from_backend(context)
    }

    /// Build a decoder on an already opened stream.
    ///
    /// Reads every packet of the stream once to measure the timeline, then
    /// rewinds to the start.
    pub fn decoder_from_backend<B: StreamBackend>(&self, mut backend: B) -> Result<VideoDecoder<B>> {
        let scan = scan_stream(&mut backend)?;
        if scan.packets == 0 || scan.duration <= Millis::ZERO {
            return Err(Error::StreamNotFound {
                path: self.path.clone(),
            });
        }

        let declared = backend.info().frames;
        let frames = u64::try_from(declared)
            .ok()
            .filter(|&frames| frames > 0)
            .unwrap_or(scan.packets);

        info!(
            path = %self.path.display(),
            duration_ms = scan.duration.get(),
            frames,
            width = backend.info().width,
            height = backend.info().height,
            "Loaded video"
        );

        let mut decoder = VideoDecoder::new(backend, scan.duration, frames, self.options);
        decoder.reset()?;
        Ok(decoder)
    }
}

/// What a pass over the stream's packets found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamScan {
    duration: Millis,
    packets: u64,
}

/// Read every packet of the selected stream without decoding.
///
/// The duration is the latest packet end relative to the stream start.
/// Packets carry no duration for some formats, those use the nominal frame
/// duration instead.
fn scan_stream<B: StreamBackend>(backend: &mut B) -> Result<StreamScan> {
    let info = *backend.info();
    let nominal = info.nominal_frame_duration();

    let mut end: Option<i64> = None;
    let mut packets = 0;

    loop {
        let packet = match backend.read_packet().map_err(Error::Decode)? {
            Demuxed::Packet(packet) => packet,
            Demuxed::EndOfFile => break,
        };
        if packet.stream_index() != info.index {
            continue;
        }
        packets += 1;

        let Some(timestamp) = packet.pts().or_else(|| packet.dts()) else {
            continue;
        };
        let duration = if packet.duration() > 0 {
            packet.duration()
        } else {
            nominal
        };
        let packet_end = timestamp.saturating_add(duration);
        end = Some(end.map_or(packet_end, |end| end.max(packet_end)));
    }

    let duration = end.map_or(Millis::ZERO, |end| info.timeline_position(end));
    debug!(packets, %duration, "Scanned stream");

    Ok(StreamScan { duration, packets })
}
