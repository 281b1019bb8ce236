//! Streaming grid-video encoder.
//!
//! [`VideoWriter`] encodes RGB canvases one at a time into an H.264 stream
//! (container inferred from the file extension). The compositor renders a
//! grid video frame by frame, so frames are pushed as they are produced
//! instead of being collected up front.
//!
//! # Example
//!
//! ```no_run
//! use image::RgbImage;
//! use videowall::VideoWriter;
//!
//! let mut writer = VideoWriter::create("output/grid.mp4", 1920, 1080, 30)?;
//! for _ in 0..30 {
//!     writer.write_frame(&RgbImage::new(1920, 1080))?;
//! }
//! writer.finish()?;
//! # Ok::<(), videowall::VideoWallError>(())
//! ```

use std::path::Path;

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    encoder::Video as VideoEncoder,
    format::{Flags as FormatFlags, Pixel, context::Output},
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::VideoWallError;

/// Encodes a sequence of equally sized RGB frames into a video file.
pub struct VideoWriter {
    output: Output,
    encoder: VideoEncoder,
    scaler: ScalingContext,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    width: u32,
    height: u32,
    rgb_frame: VideoFrame,
    yuv_frame: VideoFrame,
    frames_written: i64,
}

impl VideoWriter {
    /// Open `path` for writing and prepare an H.264 encoder.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::VideoEncodeError`] if the dimensions are odd
    /// or zero (YUV 4:2:0 needs even sizes) or the codec is unavailable, and
    /// [`VideoWallError::VideoWriteError`] if the container cannot be
    /// created.
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Result<Self, VideoWallError> {
        let path = path.as_ref();
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(VideoWallError::VideoEncodeError(format!(
                "frame size {width}x{height} must be non-zero and even"
            )));
        }
        let fps = fps.max(1);
        log::info!("Writing {width}x{height} video at {fps} fps to {}", path.display());
        ffmpeg_next::init()?;

        let mut output = ffmpeg_next::format::output(path)
            .map_err(|e| VideoWallError::VideoWriteError(format!("cannot open output: {e}")))?;
        let needs_global_header = output.format().flags().contains(FormatFlags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(Id::H264).ok_or_else(|| {
            VideoWallError::VideoEncodeError("H.264 encoder not available".to_string())
        })?;

        let mut stream = output
            .add_stream(codec)
            .map_err(|e| VideoWallError::VideoWriteError(format!("cannot add stream: {e}")))?;
        let stream_index = stream.index();

        let mut encoder = CodecContext::from_parameters(stream.parameters())
            .and_then(|context| context.encoder().video())
            .map_err(|e| {
                VideoWallError::VideoEncodeError(format!("cannot create video encoder: {e}"))
            })?;

        let encoder_time_base = Rational::new(1, fps as i32);
        encoder.set_width(width);
        encoder.set_height(height);
        encoder.set_format(Pixel::YUV420P);
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(Rational::new(fps as i32, 1)));

        if needs_global_header {
            unsafe {
                (*encoder.as_mut_ptr()).flags |=
                    ffmpeg_sys_next::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
            }
        }

        let encoder = encoder
            .open_as(codec)
            .map_err(|e| VideoWallError::VideoEncodeError(format!("cannot open encoder: {e}")))?;
        stream.set_parameters(&encoder);

        output
            .write_header()
            .map_err(|e| VideoWallError::VideoWriteError(format!("cannot write header: {e}")))?;

        // The muxer may replace the stream time base while writing the header.
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .ok_or_else(|| VideoWallError::VideoWriteError("output stream vanished".to_string()))?;

        let scaler = ScalingContext::get(
            Pixel::RGB24,
            width,
            height,
            Pixel::YUV420P,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|e| VideoWallError::VideoWriteError(format!("cannot create scaler: {e}")))?;

        Ok(Self {
            output,
            encoder,
            scaler,
            stream_index,
            encoder_time_base,
            stream_time_base,
            width,
            height,
            rgb_frame: VideoFrame::new(Pixel::RGB24, width, height),
            yuv_frame: VideoFrame::empty(),
            frames_written: 0,
        })
    }

    /// Frame size every call to [`write_frame`](VideoWriter::write_frame) must match.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of frames submitted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written as u64
    }

    /// Encode one frame.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::VideoEncodeError`] if the frame has the
    /// wrong size or the encoder rejects it.
    pub fn write_frame(&mut self, image: &RgbImage) -> Result<(), VideoWallError> {
        if image.dimensions() != (self.width, self.height) {
            return Err(VideoWallError::VideoEncodeError(format!(
                "frame is {}x{}, expected {}x{}",
                image.width(),
                image.height(),
                self.width,
                self.height
            )));
        }

        crate::utilities::rgb_buffer_to_frame(
            image.as_raw(),
            self.width,
            self.height,
            &mut self.rgb_frame,
        );
        self.scaler
            .run(&self.rgb_frame, &mut self.yuv_frame)
            .map_err(|e| VideoWallError::VideoWriteError(format!("scaling failed: {e}")))?;
        self.yuv_frame.set_pts(Some(self.frames_written));
        self.frames_written += 1;

        self.encoder
            .send_frame(&self.yuv_frame)
            .map_err(|e| VideoWallError::VideoEncodeError(format!("send_frame failed: {e}")))?;
        self.drain_packets()
    }

    /// Flush the encoder and write the container trailer.
    pub fn finish(mut self) -> Result<(), VideoWallError> {
        self.encoder
            .send_eof()
            .map_err(|e| VideoWallError::VideoEncodeError(format!("send_eof failed: {e}")))?;
        self.drain_packets()?;
        self.output
            .write_trailer()
            .map_err(|e| VideoWallError::VideoWriteError(format!("cannot write trailer: {e}")))?;
        log::debug!("Finished video after {} frames", self.frames_written);
        Ok(())
    }

    fn drain_packets(&mut self) -> Result<(), VideoWallError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| VideoWallError::VideoWriteError(format!("write packet failed: {e}")))?;
        }
        Ok(())
    }
}
