// SPDX-License-Identifier: MPL-2.0

//! Looping video playback built on FFmpeg.
//!
//! This module turns a media file into a sequence of timestamped frames that
//! can be looped forever as a background:
//! - **Exact duration** via a one-time packet pre-scan at load time, since
//!   container metadata is frequently absent or wrong
//! - **Gap-free timeline**: consecutive frames satisfy
//!   `frame[i].end_time == frame[i + 1].start_time`
//! - **Random access** to any time in `[0, duration)`, backward included
//! - **Deterministic cleanup**: every native handle is owned and released
//!   on drop, decoder before demuxer
//!
//! # Module Structure
//!
//! - [`types`]: Core types (Millis, Frame, StreamInfo, tagged decoder results)
//! - [`backend`]: The demuxer/decoder capability surface the decoder runs on
//! - [`context`]: FFmpeg implementation of the backend
//! - [`loader`]: Opens files and produces ready decoders
//! - [`decoder`]: Sequential and random-access frame decoding
//! - [`clock`]: Looping playback clock and stopwatch
//! - [`decoding_loop`]: Picks the frame to show for the current clock time
//! - [`detection`]: File type detection utilities
//!
//! # Usage
//!
//! ```no_run
//! use loopbg::playback::{self, DecodingLoop};
//!
//! # fn main() -> playback::Result<()> {
//! let decoder = playback::load("background.mp4")?;
//! let mut decoding_loop = DecodingLoop::new(decoder)?;
//! if let Some(frame) = decoding_loop.tick()? {
//!     println!("show {}..{}", frame.start_time, frame.end_time);
//! }
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod clock;
pub mod context;
pub mod decoder;
pub mod decoding_loop;
pub mod detection;
mod error;
pub mod loader;
pub mod types;

// Re-export public API
pub use backend::StreamBackend;
pub use clock::{ManualClock, PlaybackClock, Stopwatch, SystemClock, TimeSource};
pub use context::StreamDecoderContext;
pub use decoder::{DecoderOptions, VideoDecoder};
pub use decoding_loop::{DecodingLoop, FrameSink};
pub use detection::{
    SourceOrder, collect_playable, is_animated_image_file, is_playable_file, is_video_file,
};
pub use error::{Error, Result};
pub use loader::{Loader, load};
pub use types::{Frame, Millis, Picture, StreamInfo};

#[cfg(test)]
mod tests;
