// SPDX-License-Identifier: MPL-2.0

//! Unit tests for decoding and looping playback.
//!
//! Decoding runs against [`FakeStream`], an in-memory container mimicking a
//! 4x2 red clip with 16 frames at 25 FPS in a 1/12800 time base, the layout
//! FFmpeg produces for a small H.264 MP4.

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        time::Duration,
    };

    use ffmpeg_next::{self as ffmpeg, Rational};

    use super::super::{
        DecoderOptions, DecodingLoop, Error, Frame, FrameSink, Loader, ManualClock, Millis,
        PlaybackClock, Picture, StreamBackend, StreamInfo, VideoDecoder,
        types::{Decoded, Demuxed, PacketTiming, RawFrame},
    };

    const AUDIO_STREAM: usize = 0;
    const VIDEO_STREAM: usize = 1;
    const FRAME_TICKS: i64 = 512;
    const GOP: usize = 4;
    const RED: [u8; 3] = [81, 90, 240];

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FakePicture {
        index: usize,
        pixels: [u8; 3],
    }

    impl Picture for FakePicture {
        fn width(&self) -> u32 {
            4
        }

        fn height(&self) -> u32 {
            2
        }
    }

    #[derive(Debug, Clone)]
    struct FakePacket {
        stream: usize,
        frame: usize,
        key: bool,
        pts: i64,
        dts: i64,
        duration: i64,
    }

    impl PacketTiming for FakePacket {
        fn stream_index(&self) -> usize {
            self.stream
        }

        fn pts(&self) -> Option<i64> {
            Some(self.pts)
        }

        fn dts(&self) -> Option<i64> {
            Some(self.dts)
        }

        fn duration(&self) -> i64 {
            self.duration
        }
    }

    #[derive(Debug, Clone)]
    struct FakeOptions {
        frames: usize,
        start_timestamp: i64,
        /// Reorder every GOP as I P B B and hold one frame in the decoder.
        b_frames: bool,
        unknown_frame_count: bool,
        zero_durations: bool,
        missing_timestamps: bool,
        /// Seeks land on the first keyframe at or after the target.
        overshooting_seek: bool,
        corrupt_frame: Option<usize>,
        /// This frame lasts a single tick.
        sliver_frame: Option<usize>,
    }

    impl Default for FakeOptions {
        fn default() -> Self {
            Self {
                frames: 16,
                start_timestamp: 0,
                b_frames: false,
                unknown_frame_count: false,
                zero_durations: false,
                missing_timestamps: false,
                overshooting_seek: false,
                corrupt_frame: None,
                sliver_frame: None,
            }
        }
    }

    /// Observes and steers a [`FakeStream`] after it moved into a decoder.
    #[derive(Debug)]
    struct Controls {
        seekable: Cell<bool>,
        seeks: RefCell<Vec<i64>>,
        flushes: Cell<usize>,
    }

    struct FakeStream {
        info: StreamInfo,
        options: FakeOptions,
        packets: Vec<FakePacket>,
        cursor: usize,
        buffered: Vec<FakePacket>,
        eof: bool,
        controls: Rc<Controls>,
    }

    impl std::fmt::Debug for FakeStream {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("FakeStream").field("cursor", &self.cursor).finish()
        }
    }

    impl FakeStream {
        fn new(options: FakeOptions) -> (Self, Rc<Controls>) {
            let controls = Rc::new(Controls {
                seekable: Cell::new(true),
                seeks: RefCell::new(Vec::new()),
                flushes: Cell::new(0),
            });

            let decode_order: Vec<usize> = (0..options.frames)
                .step_by(GOP)
                .flat_map(|key| {
                    let end = (key + GOP).min(options.frames);
                    if options.b_frames && end - key == GOP {
                        vec![key, key + 2, key + 1, key + 3]
                    } else {
                        (key..end).collect()
                    }
                })
                .collect();

            let duration = if options.zero_durations { 0 } else { FRAME_TICKS };
            let dts_shift = if options.b_frames { FRAME_TICKS } else { 0 };
            let mut packets = Vec::new();
            for (position, &frame) in decode_order.iter().enumerate() {
                let pts = options.start_timestamp + frame as i64 * FRAME_TICKS;
                let dts = options.start_timestamp + position as i64 * FRAME_TICKS - dts_shift;
                packets.push(FakePacket {
                    stream: AUDIO_STREAM,
                    frame,
                    key: false,
                    pts,
                    dts: pts,
                    duration: 256,
                });
                packets.push(FakePacket {
                    stream: VIDEO_STREAM,
                    frame,
                    key: frame % GOP == 0,
                    pts,
                    dts,
                    duration: if options.sliver_frame == Some(frame) {
                        1
                    } else {
                        duration
                    },
                });
            }

            let info = StreamInfo {
                index: VIDEO_STREAM,
                time_base: Rational::new(1, 12800),
                frame_rate: Rational::new(25, 1),
                start_timestamp: options.start_timestamp,
                width: 4,
                height: 2,
                frames: if options.unknown_frame_count {
                    0
                } else {
                    options.frames as i64
                },
            };

            let stream = Self {
                info,
                options,
                packets,
                cursor: 0,
                buffered: Vec::new(),
                eof: false,
                controls: Rc::clone(&controls),
            };
            (stream, controls)
        }

        fn delay(&self) -> usize {
            usize::from(self.options.b_frames)
        }

        fn keyframe_packet(&self, timestamp: i64) -> usize {
            let keyframes = self
                .packets
                .iter()
                .enumerate()
                .filter(|(_, packet)| packet.stream == VIDEO_STREAM && packet.key);

            let found = if self.options.overshooting_seek {
                keyframes
                    .filter(|(_, packet)| packet.pts >= timestamp)
                    .map(|(index, _)| index)
                    .next()
            } else {
                keyframes
                    .filter(|(_, packet)| packet.pts <= timestamp)
                    .map(|(index, _)| index)
                    .last()
            };
            // Land on the audio packet preceding the keyframe.
            found.map_or(0, |index| index - 1)
        }
    }

    impl StreamBackend for FakeStream {
        type Packet = FakePacket;
        type Picture = FakePicture;

        fn info(&self) -> &StreamInfo {
            &self.info
        }

        fn read_packet(&mut self) -> Result<Demuxed<FakePacket>, ffmpeg::Error> {
            let Some(packet) = self.packets.get(self.cursor) else {
                return Ok(Demuxed::EndOfFile);
            };
            self.cursor += 1;
            Ok(Demuxed::Packet(packet.clone()))
        }

        fn send_packet(&mut self, packet: &FakePacket) -> Result<(), ffmpeg::Error> {
            assert_eq!(packet.stream, VIDEO_STREAM, "audio packet sent to the video decoder");
            assert!(!self.eof, "packet sent after end of stream");
            if self.options.corrupt_frame == Some(packet.frame) {
                return Err(ffmpeg::Error::InvalidData);
            }
            self.buffered.push(packet.clone());
            Ok(())
        }

        fn send_eof(&mut self) -> Result<(), ffmpeg::Error> {
            self.eof = true;
            Ok(())
        }

        fn receive_frame(&mut self) -> Result<Decoded<FakePicture>, ffmpeg::Error> {
            if self.buffered.len() > self.delay() || (self.eof && !self.buffered.is_empty()) {
                let earliest = self
                    .buffered
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, packet)| packet.pts)
                    .map_or(0, |(index, _)| index);
                let packet = self.buffered.remove(earliest);

                return Ok(Decoded::Frame(RawFrame {
                    picture: FakePicture {
                        index: packet.frame,
                        pixels: RED,
                    },
                    timestamp: (!self.options.missing_timestamps).then_some(packet.pts),
                    duration: packet.duration,
                }));
            }

            if self.eof {
                Ok(Decoded::EndOfStream)
            } else {
                Ok(Decoded::NeedsInput)
            }
        }

        fn seek(&mut self, timestamp: i64) -> Result<(), ffmpeg::Error> {
            if !self.controls.seekable.get() {
                return Err(ffmpeg::Error::Unknown);
            }
            self.controls.seeks.borrow_mut().push(timestamp);
            self.cursor = self.keyframe_packet(timestamp);
            Ok(())
        }

        fn flush(&mut self) {
            self.controls.flushes.set(self.controls.flushes.get() + 1);
            self.buffered.clear();
            self.eof = false;
        }
    }

    fn load_with(
        options: FakeOptions,
        decoder_options: DecoderOptions,
    ) -> (VideoDecoder<FakeStream>, Rc<Controls>) {
        let (stream, controls) = FakeStream::new(options);
        let decoder = Loader::new("test_4x2_16f_red.mp4")
            .with_options(decoder_options)
            .decoder_from_backend(stream)
            .unwrap();
        (decoder, controls)
    }

    fn load(options: FakeOptions) -> (VideoDecoder<FakeStream>, Rc<Controls>) {
        load_with(options, DecoderOptions::default())
    }

    fn decoders() -> Vec<VideoDecoder<FakeStream>> {
        let always_seek = DecoderOptions {
            seek_ahead: Millis::ZERO,
        };
        vec![
            load(FakeOptions::default()).0,
            load(FakeOptions {
                b_frames: true,
                ..FakeOptions::default()
            })
            .0,
            load_with(FakeOptions::default(), always_seek).0,
            load_with(
                FakeOptions {
                    b_frames: true,
                    ..FakeOptions::default()
                },
                always_seek,
            )
            .0,
        ]
    }

    fn check_frame_25fps(frame: &Frame<FakePicture>, number: usize) {
        let number = number as i64;
        assert_eq!(frame.picture.pixels, RED);
        assert_eq!(frame.start_time, Millis::new(number * 40));
        assert_eq!(frame.end_time, Millis::new((number + 1) * 40));
    }

    #[test]
    fn test_stream_info() {
        let (decoder, _) = load(FakeOptions::default());
        assert_eq!(decoder.width(), 4);
        assert_eq!(decoder.height(), 2);
        assert_eq!(decoder.frames(), 16);
        assert_eq!(decoder.duration(), Millis::new(640));
        assert_eq!(decoder.info().index, VIDEO_STREAM);
    }

    #[test]
    fn test_decodes_all_frames() {
        for mut decoder in decoders() {
            let mut count = 0;
            while decoder.has_frames() {
                if let Ok(frame) = decoder.next_frame() {
                    check_frame_25fps(&frame, count);
                    assert_eq!(frame.picture.index, count);
                    assert_eq!(frame.width(), 4);
                    assert_eq!(frame.height(), 2);
                    count += 1;
                }
            }
            assert_eq!(count, 16);
            assert_eq!(decoder.position(), Millis::new(640));
        }
    }

    #[test]
    fn test_no_frames_after_finish() {
        let (mut decoder, _) = load(FakeOptions::default());
        for _ in 0..16 {
            assert!(decoder.has_frames());
            decoder.next_frame().unwrap();
        }
        assert!(!decoder.has_frames());
        assert!(matches!(decoder.next_frame(), Err(Error::Exhausted)));
        assert!(matches!(decoder.next_frame(), Err(Error::Exhausted)));
    }

    #[test]
    fn test_restart_after_finish() {
        for mut decoder in decoders() {
            let first = decoder.next_frame().unwrap();
            while decoder.has_frames() {
                let _ = decoder.next_frame();
            }

            decoder.reset().unwrap();
            assert!(decoder.has_frames());
            let frame = decoder.next_frame().unwrap();
            check_frame_25fps(&frame, 0);
            assert_eq!(frame.picture, first.picture);
        }
    }

    #[test]
    fn test_restart_multiple_times() {
        let (mut decoder, _) = load(FakeOptions {
            b_frames: true,
            ..FakeOptions::default()
        });
        for _ in 0..5 {
            for number in 0..9 {
                let frame = decoder.next_frame().unwrap();
                check_frame_25fps(&frame, number);
            }
            decoder.reset().unwrap();
        }
    }

    #[test]
    fn test_frames_stay_valid() {
        let (mut decoder, _) = load(FakeOptions::default());
        let first = decoder.next_frame().unwrap();
        let second = decoder.next_frame().unwrap();
        decoder.seek_to_frame_at(Millis::new(600)).unwrap();
        assert_eq!(first.picture.index, 0);
        assert_eq!(second.picture.index, 1);
        assert_eq!(first.end_time, second.start_time);
    }

    #[test]
    fn test_seek_to_sample_times() {
        for mut decoder in decoders() {
            for (time, number) in [(40, 1), (320, 8), (600, 15), (79, 1), (279, 6), (639, 15)] {
                let frame = decoder.seek_to_frame_at(Millis::new(time)).unwrap();
                check_frame_25fps(&frame, number);
                assert_eq!(frame.picture.index, number);
            }
        }
    }

    #[test]
    fn test_seek_round_trip() {
        for mut decoder in decoders() {
            for time in 0..640 {
                let time = Millis::new(time);
                let frame = decoder.seek_to_frame_at(time).unwrap();
                assert!(frame.contains(time), "{time} not in {}..{}", frame.start_time, frame.end_time);

                let at_start = decoder.seek_to_frame_at(frame.start_time).unwrap();
                let at_end = decoder.seek_to_frame_at(frame.end_time - Millis::new(1)).unwrap();
                assert_eq!(at_start.picture, frame.picture);
                assert_eq!(at_end.picture, frame.picture);
            }
        }
    }

    #[test]
    fn test_seek_out_of_range() {
        let (mut decoder, controls) = load(FakeOptions::default());
        let seeks = controls.seeks.borrow().len();
        for time in [-1, -34_000, 640, 60_000] {
            let result = decoder.seek_to_frame_at(Millis::new(time));
            assert!(
                matches!(result, Err(Error::SeekRange { time: t, duration }) if t == Millis::new(time) && duration == Millis::new(640)),
                "seek to {time}ms should be out of range"
            );
        }
        assert_eq!(controls.seeks.borrow().len(), seeks);
        assert!(decoder.has_frames());
    }

    #[test]
    fn test_seek_back_and_forth() {
        for mut decoder in decoders() {
            for (time, number) in [(500, 12), (300, 7), (200, 5), (639, 15), (0, 0)] {
                let frame = decoder.seek_to_frame_at(Millis::new(time)).unwrap();
                check_frame_25fps(&frame, number);
            }
        }
    }

    #[test]
    fn test_next_frame_after_seek() {
        for mut decoder in decoders() {
            let frame = decoder.seek_to_frame_at(Millis::new(300)).unwrap();
            check_frame_25fps(&frame, 7);
            for number in 8..16 {
                check_frame_25fps(&decoder.next_frame().unwrap(), number);
            }
            assert!(!decoder.has_frames());

            let frame = decoder.seek_to_frame_at(Millis::new(100)).unwrap();
            check_frame_25fps(&frame, 2);
            assert!(decoder.has_frames());
            check_frame_25fps(&decoder.next_frame().unwrap(), 3);
        }
    }

    #[test]
    fn test_last_frame_seek_finishes() {
        let (mut decoder, _) = load(FakeOptions::default());
        decoder.seek_to_frame_at(Millis::new(620)).unwrap();
        assert!(!decoder.has_frames());
        assert!(matches!(decoder.next_frame(), Err(Error::Exhausted)));
    }

    #[test]
    fn test_forward_seek_decodes_without_container_seek() {
        let (mut decoder, controls) = load(FakeOptions::default());
        assert_eq!(*controls.seeks.borrow(), vec![0]);

        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(100)).unwrap(), 2);
        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(610)).unwrap(), 15);
        assert_eq!(*controls.seeks.borrow(), vec![0]);

        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(200)).unwrap(), 5);
        assert_eq!(*controls.seeks.borrow(), vec![0, 2560]);
    }

    #[test]
    fn test_seek_ahead_limit() {
        let (mut decoder, controls) = load_with(
            FakeOptions::default(),
            DecoderOptions {
                seek_ahead: Millis::new(100),
            },
        );
        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(90)).unwrap(), 2);
        assert_eq!(controls.seeks.borrow().len(), 1);

        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(400)).unwrap(), 10);
        assert_eq!(*controls.seeks.borrow(), vec![0, 5120]);
        assert!(controls.flushes.get() >= 2);
    }

    #[test]
    fn test_overshooting_seek_falls_back_to_scan() {
        let (mut decoder, controls) = load_with(
            FakeOptions {
                overshooting_seek: true,
                ..FakeOptions::default()
            },
            DecoderOptions {
                seek_ahead: Millis::ZERO,
            },
        );
        let frame = decoder.seek_to_frame_at(Millis::new(300)).unwrap();
        check_frame_25fps(&frame, 7);
        assert_eq!(*controls.seeks.borrow(), vec![0, 3840, 0]);
        check_frame_25fps(&decoder.next_frame().unwrap(), 8);
    }

    #[test]
    fn test_reset_fails_when_not_seekable() {
        let (mut decoder, controls) = load(FakeOptions::default());
        while decoder.has_frames() {
            let _ = decoder.next_frame();
        }
        controls.seekable.set(false);
        assert!(matches!(decoder.reset(), Err(Error::Seek(_))));
        assert!(!decoder.has_frames());
        assert!(matches!(
            decoder.seek_to_frame_at(Millis::new(40)),
            Err(Error::Seek(_))
        ));
    }

    #[test]
    fn test_loader_rewinds_after_scan() {
        let (mut decoder, controls) = load(FakeOptions::default());
        assert_eq!(*controls.seeks.borrow(), vec![0]);
        assert_eq!(controls.flushes.get(), 1);
        check_frame_25fps(&decoder.next_frame().unwrap(), 0);
    }

    #[test]
    fn test_loader_counts_frames_when_undeclared() {
        let (decoder, _) = load(FakeOptions {
            unknown_frame_count: true,
            ..FakeOptions::default()
        });
        assert_eq!(decoder.frames(), 16);
        assert_eq!(decoder.duration(), Millis::new(640));
    }

    #[test]
    fn test_missing_durations_use_frame_rate() {
        let (mut decoder, _) = load(FakeOptions {
            zero_durations: true,
            ..FakeOptions::default()
        });
        assert_eq!(decoder.duration(), Millis::new(640));
        for number in 0..16 {
            check_frame_25fps(&decoder.next_frame().unwrap(), number);
        }
        assert!(!decoder.has_frames());
    }

    #[test]
    fn test_missing_timestamps_follow_previous_frame() {
        let (mut decoder, _) = load(FakeOptions {
            missing_timestamps: true,
            ..FakeOptions::default()
        });
        for number in 0..16 {
            check_frame_25fps(&decoder.next_frame().unwrap(), number);
        }
    }

    #[test]
    fn test_missing_timestamps_seek() {
        let (mut decoder, controls) = load_with(
            FakeOptions {
                missing_timestamps: true,
                ..FakeOptions::default()
            },
            DecoderOptions {
                seek_ahead: Millis::ZERO,
            },
        );
        let frame = decoder.seek_to_frame_at(Millis::new(300)).unwrap();
        assert_eq!(frame.picture.index, 7);
        check_frame_25fps(&frame, 7);
        // Landing on keyframe 4 gives no timestamp, so it scans from the start.
        assert_eq!(*controls.seeks.borrow(), vec![0, 3840, 0]);
        check_frame_25fps(&decoder.next_frame().unwrap(), 8);
    }

    #[test]
    fn test_sub_millisecond_frame_skipped() {
        let (mut decoder, _) = load(FakeOptions {
            sliver_frame: Some(5),
            ..FakeOptions::default()
        });
        assert_eq!(decoder.duration(), Millis::new(640));

        let mut indices = Vec::new();
        while decoder.has_frames() {
            let frame = decoder.next_frame().unwrap();
            match frame.picture.index {
                4 => assert_eq!(frame.end_time, Millis::new(200)),
                6 => assert_eq!(frame.start_time, Millis::new(240)),
                _ => {}
            }
            indices.push(frame.picture.index);
        }
        let expected: Vec<usize> = (0..16).filter(|&index| index != 5).collect();
        assert_eq!(indices, expected);

        decoder.reset().unwrap();
        let frame = decoder.seek_to_frame_at(Millis::new(210)).unwrap();
        assert_eq!(frame.picture.index, 6);
    }

    #[test]
    fn test_stream_start_offset() {
        let (mut decoder, controls) = load(FakeOptions {
            start_timestamp: 1024,
            b_frames: true,
            ..FakeOptions::default()
        });
        assert_eq!(decoder.duration(), Millis::new(640));
        assert_eq!(*controls.seeks.borrow(), vec![1024]);
        check_frame_25fps(&decoder.next_frame().unwrap(), 0);
        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(639)).unwrap(), 15);
        check_frame_25fps(&decoder.seek_to_frame_at(Millis::new(0)).unwrap(), 0);
    }

    #[test]
    fn test_empty_stream_rejected() {
        let (stream, _) = FakeStream::new(FakeOptions {
            frames: 0,
            ..FakeOptions::default()
        });
        let result = Loader::new("empty.mp4").decoder_from_backend(stream);
        let Err(err) = result else {
            panic!("empty stream should not load");
        };
        assert!(matches!(err, Error::StreamNotFound { .. }));
        assert!(err.to_string().contains("empty.mp4"));
    }

    #[test]
    fn test_decode_error_propagates() {
        let (mut decoder, _) = load(FakeOptions {
            corrupt_frame: Some(2),
            ..FakeOptions::default()
        });
        check_frame_25fps(&decoder.next_frame().unwrap(), 0);
        check_frame_25fps(&decoder.next_frame().unwrap(), 1);
        assert!(matches!(decoder.next_frame(), Err(Error::Decode(_))));
    }

    #[derive(Default)]
    struct RecordingSink {
        presented: Vec<(usize, Millis, Millis)>,
    }

    impl FrameSink<FakePicture> for RecordingSink {
        fn present(&mut self, frame: &Frame<FakePicture>) {
            self.presented
                .push((frame.picture.index, frame.start_time, frame.end_time));
        }
    }

    fn decoding_loop(options: FakeOptions) -> (DecodingLoop<FakeStream, ManualClock>, ManualClock) {
        let (decoder, _) = load(options);
        let time = ManualClock::new();
        let clock = PlaybackClock::with_source(decoder.duration(), time.clone()).unwrap();
        (DecodingLoop::with_clock(decoder, clock), time)
    }

    #[test]
    fn test_decoding_loop_tick() {
        let (mut decoding_loop, time) = decoding_loop(FakeOptions::default());

        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 0);
        assert!(decoding_loop.tick().unwrap().is_none());
        assert_eq!(decoding_loop.until_next_frame(), Duration::from_millis(40));

        time.advance(Duration::from_millis(40));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 1);

        time.advance(Duration::from_millis(85));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 3);
        assert_eq!(decoding_loop.until_next_frame(), Duration::from_millis(35));
        assert_eq!(decoding_loop.current_frame().map(|f| f.picture.index), Some(3));
    }

    #[test]
    fn test_decoding_loop_wraps_around() {
        let (mut decoding_loop, time) = decoding_loop(FakeOptions {
            b_frames: true,
            ..FakeOptions::default()
        });

        time.set(Duration::from_millis(630));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 15);

        time.advance(Duration::from_millis(20));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 0);
        assert_eq!(decoding_loop.clock().loop_count(), 1);

        time.advance(Duration::from_millis(40));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 1);
    }

    #[test]
    fn test_decoding_loop_presents_every_frame() {
        let (mut decoding_loop, time) = decoding_loop(FakeOptions {
            b_frames: true,
            ..FakeOptions::default()
        });
        let mut sink = RecordingSink::default();

        for _ in 0..128 {
            decoding_loop.present_due(&mut sink).unwrap();
            time.advance(Duration::from_millis(10));
        }

        assert_eq!(sink.presented.len(), 32);
        for (number, &(index, start, end)) in sink.presented.iter().enumerate() {
            let index_in_pass = number % 16;
            assert_eq!(index, index_in_pass);
            assert_eq!(start, Millis::new(index_in_pass as i64 * 40));
            assert_eq!(end, Millis::new((index_in_pass as i64 + 1) * 40));
        }
    }

    #[test]
    fn test_decoding_loop_restart() {
        let (mut decoding_loop, time) = decoding_loop(FakeOptions::default());
        time.set(Duration::from_millis(300));
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 7);

        decoding_loop.clock_mut().restart();
        check_frame_25fps(decoding_loop.tick().unwrap().unwrap(), 0);
        assert_eq!(decoding_loop.decoder().position(), Millis::new(40));
    }
}
