// SPDX-License-Identifier: MPL-2.0

//! Timestamped frame decoding and looping playback for video backgrounds.

pub mod playback;

pub use ffmpeg_next as ffmpeg;
