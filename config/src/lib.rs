// SPDX-License-Identifier: MPL-2.0-only

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const NAME: &str = "loopbg";
pub const CONFIG_FILE: &str = "config.ron";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no configuration directory available on this system")]
    NoConfigDir,
    #[error("failed to read config file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Playback configuration for the background.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Setters)]
#[serde(deny_unknown_fields, default)]
#[must_use]
pub struct Config {
    /// the configured media source, a file or a directory of media files
    #[setters(into)]
    pub source: PathBuf,
    /// order in which files of a directory source are tried
    pub sampling_method: SamplingMethod,
    /// how far ahead of the current frame a seek may decode forward
    /// instead of seeking the container, in milliseconds
    pub seek_ahead_ms: u64,
    /// log verbosity for both the application and FFmpeg
    pub verbosity: Verbosity,
    /// stop after this many passes over the video, loop forever if unset
    pub loops: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from("/usr/share/backgrounds/"),
            sampling_method: SamplingMethod::default(),
            seek_ahead_ms: 1000,
            verbosity: Verbosity::default(),
            loops: None,
        }
    }
}

/// Order in which media files of a directory are tried
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplingMethod {
    // Try files in alphanumeric order
    #[default]
    Alphanumeric,
    // Try files in random order
    Random,
}

/// Log verbosity
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Config {
    /// Location of the config file, `$XDG_CONFIG_HOME/loopbg/config.ron` on Linux.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(NAME).join(CONFIG_FILE))
    }

    /// Load the config from its default location.
    ///
    /// # Errors
    ///
    /// Fails if there is no config directory, or the file can't be read or parsed.
    pub fn load() -> Result<Self, Error> {
        let path = Self::path().ok_or(Error::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load the config from the given file.
    ///
    /// # Errors
    ///
    /// Fails if the file can't be read or contains invalid RON.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse a config from a RON string. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on invalid RON or unknown fields.
    pub fn from_ron(contents: &str) -> Result<Self, Error> {
        Ok(ron::from_str(contents)?)
    }

    /// Load the config, falling back to defaults if it's missing or invalid.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(why) => {
                eprintln!("Config file error, falling back to defaults: {why}");
                Self::default()
            }
        }
    }
}
