//! Sequential RGB frame decoding.
//!
//! [`FrameReader`] owns a [`MediaFile`] and decodes its video stream one
//! frame at a time, converting each frame to RGB (optionally scaled to a
//! fixed size). It supports seeking to a frame number and rewinding to the
//! start, which is all the compositor (random representative frames, short
//! clips) and the kiosk (looping grid video) need.
//!
//! # Example
//!
//! ```no_run
//! use videowall::FrameReader;
//!
//! let mut reader = FrameReader::open("input_videos/a.mp4")?;
//! let middle = reader.frame_count() / 2;
//! let frame = reader.frame_at(middle)?;
//! frame.save("middle.png")?;
//! # Ok::<(), videowall::VideoWallError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::VideoWallError;
use crate::media::MediaFile;

/// Consecutive packet read failures tolerated before giving up.
const MAX_READ_ERRORS: u32 = 64;

/// A forward-decoding RGB frame source over one video stream.
pub struct FrameReader {
    media: MediaFile,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    time_base: Rational,
    frames_per_second: f64,
    frame_count: u64,
    width: u32,
    height: u32,
    decoded_frame: VideoFrame,
    /// Last frame decoded while skipping towards a seek target.
    previous_frame: VideoFrame,
    has_previous: bool,
    rgb_frame: VideoFrame,
    /// After a seek, frames numbered below this are decoded but not returned.
    skip_before: Option<u64>,
    eof_sent: bool,
}

impl FrameReader {
    /// Open a file and decode it at its native resolution.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::FileOpen`] if the file cannot be opened,
    /// [`VideoWallError::NoVideoStream`] if it has no video, or an FFmpeg
    /// error if the decoder cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VideoWallError> {
        Self::from_media(MediaFile::open(path)?, None)
    }

    /// Decode `media`, scaling every frame to `size` when given.
    pub fn from_media(media: MediaFile, size: Option<(u32, u32)>) -> Result<Self, VideoWallError> {
        let video_stream_index = media.video_stream_index.ok_or(VideoWallError::NoVideoStream)?;
        let video_metadata = media.video_metadata()?;
        let frames_per_second = video_metadata.frames_per_second;
        let frame_count = video_metadata.frame_count;
        let (width, height) = size.unwrap_or((video_metadata.width, video_metadata.height));
        if width == 0 || height == 0 {
            return Err(VideoWallError::VideoDecodeError(format!(
                "cannot decode {} to a {width}x{height} frame",
                media.file_path.display()
            )));
        }

        let stream = media
            .input_context
            .stream(video_stream_index)
            .ok_or(VideoWallError::NoVideoStream)?;
        let time_base = stream.time_base();
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let decoder = decoder_context.decoder().video()?;

        let scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        Ok(Self {
            media,
            decoder,
            scaler,
            video_stream_index,
            time_base,
            frames_per_second,
            frame_count,
            width,
            height,
            decoded_frame: VideoFrame::empty(),
            previous_frame: VideoFrame::empty(),
            has_previous: false,
            rgb_frame: VideoFrame::empty(),
            skip_before: None,
            eof_sent: false,
        })
    }

    /// Output frame size.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Estimated number of frames in the stream.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stream frame rate (0.0 when unknown).
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    /// The underlying media file.
    pub fn media(&self) -> &MediaFile {
        &self.media
    }

    /// Decode the next frame.
    ///
    /// Returns `Ok(None)` once the stream is exhausted; call
    /// [`rewind`](FrameReader::rewind) to start over.
    pub fn next_frame(&mut self) -> Result<Option<RgbImage>, VideoWallError> {
        let mut read_errors = 0;
        loop {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                if let Some(target) = self.skip_before {
                    let pts = self
                        .decoded_frame
                        .timestamp()
                        .or(self.decoded_frame.pts())
                        .unwrap_or(0);
                    let current = crate::utilities::pts_to_frame_number(
                        pts,
                        self.time_base,
                        self.frames_per_second,
                    );
                    if current < target {
                        std::mem::swap(&mut self.decoded_frame, &mut self.previous_frame);
                        self.has_previous = true;
                        continue;
                    }
                    self.skip_before = None;
                    self.has_previous = false;
                }
                return self.convert(false).map(Some);
            }

            if self.eof_sent {
                // The frame count was an overestimate: settle for the last frame.
                if self.skip_before.take().is_some() && self.has_previous {
                    self.has_previous = false;
                    return self.convert(true).map(Some);
                }
                return Ok(None);
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.media.input_context) {
                Ok(()) => {
                    read_errors = 0;
                    if packet.stream() == self.video_stream_index {
                        self.decoder.send_packet(&packet)?;
                    }
                }
                Err(FfmpegError::Eof) => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
                Err(error) => {
                    read_errors += 1;
                    if read_errors > MAX_READ_ERRORS {
                        return Err(VideoWallError::VideoDecodeError(format!(
                            "repeated read failures in {}: {error}",
                            self.media.file_path.display()
                        )));
                    }
                }
            }
        }
    }

    /// Position the reader so the next decoded frame is `frame_number`.
    ///
    /// Seeks to the nearest keyframe before the target and decodes forward.
    pub fn seek_to_frame(&mut self, frame_number: u64) -> Result<(), VideoWallError> {
        let timestamp =
            crate::utilities::frame_number_to_seek_timestamp(frame_number, self.frames_per_second);
        self.media.input_context.seek(timestamp, ..timestamp)?;
        self.decoder.flush();
        self.eof_sent = false;
        self.has_previous = false;
        self.skip_before = (frame_number > 0).then_some(frame_number);
        Ok(())
    }

    /// Return to the first frame.
    pub fn rewind(&mut self) -> Result<(), VideoWallError> {
        self.seek_to_frame(0)
    }

    /// Decode the frame at `frame_number`.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::VideoDecodeError`] if no frame at or before
    /// the end of the stream could be decoded.
    pub fn frame_at(&mut self, frame_number: u64) -> Result<RgbImage, VideoWallError> {
        self.seek_to_frame(frame_number)?;
        self.next_frame()?.ok_or_else(|| {
            VideoWallError::VideoDecodeError(format!(
                "Could not locate frame {frame_number} in {}",
                self.media.file_path.display()
            ))
        })
    }

    fn convert(&mut self, from_previous: bool) -> Result<RgbImage, VideoWallError> {
        let source = if from_previous {
            &self.previous_frame
        } else {
            &self.decoded_frame
        };
        self.scaler.run(source, &mut self.rgb_frame)?;
        let buffer = crate::utilities::frame_to_rgb_buffer(&self.rgb_frame, self.width, self.height);
        RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            VideoWallError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}
