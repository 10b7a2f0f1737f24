// SPDX-License-Identifier: MPL-2.0

//! File type detection for playable backgrounds.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use tracing::debug;
use walkdir::WalkDir;

/// Video container extensions, checked case-insensitively.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4",  // MPEG-4 container (typically H.264/H.265 codec)
    "webm", // WebM container (VP8/VP9/AV1)
    "mkv",  // Matroska container (any codec)
    "avi",  // AVI container (legacy format)
    "mov",  // QuickTime container (typically H.264)
    "m4v",  // MPEG-4 Video (Apple variant of MP4)
    "ogv",  // Ogg Video container (Theora codec)
];

/// Image formats that FFmpeg decodes as a frame sequence.
const ANIMATED_IMAGE_EXTENSIONS: &[&str] = &["gif", "webp", "apng"];

/// Order in which [`collect_playable`] returns the files of a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceOrder {
    /// Sorted by path.
    #[default]
    Alphanumeric,
    /// Shuffled.
    Random,
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Check if a path points to a video container.
#[must_use]
pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check if a path points to an image format that may hold an animation.
#[must_use]
pub fn is_animated_image_file(path: &Path) -> bool {
    has_extension(path, ANIMATED_IMAGE_EXTENSIONS)
}

#[must_use]
pub fn is_playable_file(path: &Path) -> bool {
    is_video_file(path) || is_animated_image_file(path)
}

/// List the files to play for a configured source.
///
/// A file is returned as is. A directory is walked recursively, following
/// symlinks, for playable files.
pub fn collect_playable(source: &Path, order: SourceOrder) -> Vec<PathBuf> {
    if !source.is_dir() {
        return vec![source.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(source)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_playable_file(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();

    match order {
        SourceOrder::Alphanumeric => {
            files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
        }
        SourceOrder::Random => files.shuffle(&mut rand::rng()),
    }

    debug!(source = %source.display(), files = files.len(), "Collected playable files");
    files
}
