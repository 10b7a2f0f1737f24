// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use super::types::Millis;

/// Errors reported by the loader, decoder and clock.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The container could not be opened or its stream info could not be parsed.
    #[error("failed to open media: {source}\nFile: '{}'", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: ffmpeg_next::Error,
    },

    /// The container holds no usable video stream.
    #[error("no video stream found\nFile: '{}'", .path.display())]
    StreamNotFound { path: PathBuf },

    /// A decoder could not be allocated or opened for the stream's parameters.
    #[error("failed to open decoder: {source}\nFile: '{}'", .path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: ffmpeg_next::Error,
    },

    /// Demuxing or decoding failed for a reason other than needing more
    /// input or reaching the end of the stream.
    #[error("decoding failed: {0}")]
    Decode(#[source] ffmpeg_next::Error),

    /// No frames left. Stays this way until the decoder is reset.
    #[error("no frames left")]
    Exhausted,

    /// The requested time is outside of `[0, duration)`.
    #[error("seek time {time} is outside of [0ms, {duration})")]
    SeekRange { time: Millis, duration: Millis },

    /// The container or decoder could not seek or flush.
    #[error("seek failed: {0}")]
    Seek(#[source] ffmpeg_next::Error),

    /// A playback clock needs a timeline longer than zero.
    #[error("playback duration must be greater than zero")]
    ZeroDuration,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
