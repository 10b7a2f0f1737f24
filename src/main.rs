// SPDX-License-Identifier: MPL-2.0-only

use std::{path::Path, time::Duration};

use calloop::{
    EventLoop,
    signals::{Signal, Signals},
    timer::{TimeoutAction, Timer},
};
use eyre::eyre;
use loopbg::{
    ffmpeg,
    playback::{
        self, DecoderOptions, DecodingLoop, Frame, FrameSink, Loader, Millis, SourceOrder,
        VideoDecoder,
    },
};
use loopbg_config::{Config, SamplingMethod, Verbosity};
use tracing::{error, info, trace, warn};

/// Logs presented frames in place of a compositor surface.
#[derive(Debug, Default)]
struct FrameLog {
    presented: u64,
}

impl FrameSink<ffmpeg::frame::Video> for FrameLog {
    fn present(&mut self, frame: &Frame<ffmpeg::frame::Video>) {
        self.presented += 1;
        trace!(
            start = %frame.start_time,
            end = %frame.end_time,
            width = frame.width(),
            height = frame.height(),
            format = ?frame.picture.format(),
            "Presenting frame"
        );
    }
}

struct Player {
    decoding_loop: DecodingLoop,
    sink: FrameLog,
    loops: Option<u32>,
    exit: bool,
    error: Option<playback::Error>,
}

impl Player {
    /// Present the frame due now and schedule the next wakeup.
    fn on_timer(&mut self) -> TimeoutAction {
        if let Err(err) = self.decoding_loop.present_due(&mut self.sink) {
            error!(error = %err, "Playback failed");
            self.error = Some(err);
            self.exit = true;
            return TimeoutAction::Drop;
        }

        let passes = self.decoding_loop.clock().loop_count();
        if let Some(loops) = self.loops {
            if passes >= u64::from(loops) {
                info!(passes, frames = self.sink.presented, "Finished playback");
                self.exit = true;
                return TimeoutAction::Drop;
            }
        }

        TimeoutAction::ToDuration(
            self.decoding_loop
                .until_next_frame()
                .max(Duration::from_millis(1)),
        )
    }
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let config = Config::load_or_default();
    init_logging(config.verbosity)?;

    let order = match config.sampling_method {
        SamplingMethod::Alphanumeric => SourceOrder::Alphanumeric,
        SamplingMethod::Random => SourceOrder::Random,
    };
    let options = DecoderOptions {
        seek_ahead: Millis::new(i64::try_from(config.seek_ahead_ms).unwrap_or(i64::MAX)),
    };

    let decoder = open_first_playable(&config.source, order, options)?;
    let mut event_loop: EventLoop<Player> = EventLoop::try_new()?;
    let handle = event_loop.handle();

    handle
        .insert_source(Timer::immediate(), |_, _, player| player.on_timer())
        .map_err(|err| eyre!("failed to insert frame timer: {}", err.error))?;

    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])?;
    handle
        .insert_source(signals, |event, _, player| {
            info!(signal = ?event.signal(), "Shutting down");
            player.exit = true;
        })
        .map_err(|err| eyre!("failed to insert signal source: {}", err.error))?;

    let mut player = Player {
        decoding_loop: DecodingLoop::new(decoder)?,
        sink: FrameLog::default(),
        loops: config.loops,
        exit: false,
        error: None,
    };

    loop {
        event_loop.dispatch(None, &mut player)?;

        if player.exit {
            break;
        }
    }

    match player.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn init_logging(verbosity: Verbosity) -> eyre::Result<()> {
    let (level, ffmpeg_level) = match verbosity {
        Verbosity::Error => (tracing::Level::ERROR, ffmpeg::util::log::Level::Error),
        Verbosity::Warn => (tracing::Level::WARN, ffmpeg::util::log::Level::Warning),
        Verbosity::Info => (tracing::Level::INFO, ffmpeg::util::log::Level::Warning),
        Verbosity::Debug => (tracing::Level::DEBUG, ffmpeg::util::log::Level::Verbose),
        Verbosity::Trace => (tracing::Level::TRACE, ffmpeg::util::log::Level::Debug),
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    playback::context::init()?;
    ffmpeg::util::log::set_level(ffmpeg_level);
    Ok(())
}

/// Open the first file of `source` that holds a playable video stream.
fn open_first_playable(
    source: &Path,
    order: SourceOrder,
    options: DecoderOptions,
) -> eyre::Result<VideoDecoder> {
    for path in playback::collect_playable(source, order) {
        match Loader::new(&path).with_options(options).video_stream_decoder() {
            Ok(decoder) => {
                info!(
                    path = %path.display(),
                    duration = %decoder.duration(),
                    frames = decoder.frames(),
                    "Playing"
                );
                return Ok(decoder);
            }
            Err(err) => warn!(error = %err, "Skipping unplayable source"),
        }
    }

    Err(eyre!("no playable media found in '{}'", source.display()))
}
