//! Internal conversion helpers shared by the decoder and the encoder.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy an RGB24 FFmpeg frame into a tightly-packed buffer, dropping any
/// per-row padding so the result fits [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == row_length {
        data[..row_length * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_length * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_length]);
        }
        buffer
    }
}

/// Copy a tightly-packed RGB buffer into an FFmpeg frame whose rows may be
/// padded.
pub(crate) fn rgb_buffer_to_frame(rgb: &[u8], width: u32, height: u32, frame: &mut VideoFrame) {
    let stride = frame.stride(0);
    let row_length = (width as usize) * 3;
    let data = frame.data_mut(0);
    for y in 0..height as usize {
        let source = y * row_length;
        let destination = y * stride;
        data[destination..destination + row_length]
            .copy_from_slice(&rgb[source..source + row_length]);
    }
}

/// Rescale a PTS value to a frame number.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let seconds = pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64;
    (seconds * frames_per_second).max(0.0) as u64
}

/// Convert a frame number to a container seek timestamp in AV_TIME_BASE
/// (microseconds), as expected by `Input::seek`.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    if frames_per_second <= 0.0 {
        return 0;
    }
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}
