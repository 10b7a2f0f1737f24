// SPDX-License-Identifier: MPL-2.0

//! FFmpeg demuxer and decoder for one video stream.

use std::{mem, os::raw::c_int, path::Path, sync::OnceLock};

use ffmpeg_next::{self as ffmpeg, codec, decoder, format, frame, media};
use tracing::debug;

use super::{
    backend::StreamBackend,
    error::{Error, Result},
    types::{Decoded, Demuxed, RawFrame, StreamInfo},
};

static FFMPEG_INIT: OnceLock<Result<(), ffmpeg::Error>> = OnceLock::new();

/// Initialize FFmpeg once per process. Later calls return the first outcome.
pub fn init() -> Result<(), ffmpeg::Error> {
    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg::init()?;
            ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
            Ok(())
        })
        .clone()
}

/// An opened container with a decoder bound to its best video stream.
///
/// Fields drop in declaration order, so the decoder is released before the
/// demuxer it reads from.
pub struct StreamDecoderContext {
    decoder: decoder::Video,
    input: format::context::Input,
    info: StreamInfo,
    scratch: frame::Video,
}

impl std::fmt::Debug for StreamDecoderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoderContext")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl StreamDecoderContext {
    /// Open `path`, select its best video stream and open a decoder for it.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        init().map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let input = format::input(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let stream = input
            .streams()
            .best(media::Type::Video)
            .ok_or_else(|| Error::StreamNotFound {
                path: path.to_path_buf(),
            })?;

        let decoder = codec::context::Context::from_parameters(stream.parameters())
            .and_then(|context| context.decoder().video())
            .map_err(|source| Error::Codec {
                path: path.to_path_buf(),
                source,
            })?;

        let start_time = stream.start_time();
        let info = StreamInfo {
            index: stream.index(),
            time_base: stream.time_base(),
            frame_rate: stream.avg_frame_rate(),
            start_timestamp: if start_time == ffmpeg::ffi::AV_NOPTS_VALUE {
                0
            } else {
                start_time
            },
            width: decoder.width(),
            height: decoder.height(),
            frames: stream.frames(),
        };

        debug!(
            path = %path.display(),
            stream = info.index,
            time_base = %info.time_base,
            frame_rate = %info.frame_rate,
            width = info.width,
            height = info.height,
            "Opened video stream"
        );

        Ok(Self {
            decoder,
            input,
            info,
            scratch: frame::Video::empty(),
        })
    }
}

impl StreamBackend for StreamDecoderContext {
    type Packet = ffmpeg::Packet;
    type Picture = frame::Video;

    fn info(&self) -> &StreamInfo {
        &self.info
    }

    fn read_packet(&mut self) -> Result<Demuxed<ffmpeg::Packet>, ffmpeg::Error> {
        let mut packet = ffmpeg::Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => Ok(Demuxed::Packet(packet)),
            Err(ffmpeg::Error::Eof) => Ok(Demuxed::EndOfFile),
            Err(err) => Err(err),
        }
    }

    fn send_packet(&mut self, packet: &ffmpeg::Packet) -> Result<(), ffmpeg::Error> {
        self.decoder.send_packet(packet)
    }

    fn send_eof(&mut self) -> Result<(), ffmpeg::Error> {
        self.decoder.send_eof()
    }

    fn receive_frame(&mut self) -> Result<Decoded<frame::Video>, ffmpeg::Error> {
        match self.decoder.receive_frame(&mut self.scratch) {
            Ok(()) => {
                let picture = mem::replace(&mut self.scratch, frame::Video::empty());
                let timestamp = picture.timestamp();
                let duration = picture.packet().duration;
                Ok(Decoded::Frame(RawFrame {
                    picture,
                    timestamp,
                    duration,
                }))
            }
            Err(ffmpeg::Error::Other { errno }) if errno == ffmpeg::error::EAGAIN => {
                Ok(Decoded::NeedsInput)
            }
            Err(ffmpeg::Error::Eof) => Ok(Decoded::EndOfStream),
            Err(err) => Err(err),
        }
    }

    fn seek(&mut self, timestamp: i64) -> Result<(), ffmpeg::Error> {
        // SAFETY: the input context is owned by self and outlives the call.
        let ret = unsafe {
            ffmpeg::ffi::av_seek_frame(
                self.input.as_mut_ptr(),
                self.info.index as c_int,
                timestamp,
                ffmpeg::ffi::AVSEEK_FLAG_BACKWARD as c_int,
            )
        };
        if ret < 0 {
            return Err(ffmpeg::Error::from(ret));
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.decoder.flush();
    }
}
