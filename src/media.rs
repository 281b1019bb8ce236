//! Opening media files.
//!
//! [`MediaFile`] wraps an FFmpeg demuxer context together with the metadata
//! of its best video stream. It is the entry point to decoding: a
//! [`FrameReader`](crate::FrameReader) takes ownership of one to produce RGB
//! frames.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::{
    error::VideoWallError,
    metadata::{MediaMetadata, VideoMetadata},
};

/// An opened media file.
///
/// # Example
///
/// ```no_run
/// use videowall::MediaFile;
///
/// let media = MediaFile::open("input_videos/a.mp4")?;
/// if let Some(video) = &media.metadata().video {
///     println!("{}x{} @ {:.2} fps", video.width, video.height, video.frames_per_second);
/// }
/// # Ok::<(), videowall::VideoWallError>(())
/// ```
pub struct MediaFile {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Cached metadata extracted at open time.
    pub(crate) metadata: MediaMetadata,
    /// Index of the best video stream, if one exists.
    pub(crate) video_stream_index: Option<usize>,
    /// Path to the opened media file (kept for error messages).
    pub(crate) file_path: PathBuf,
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("MediaFile")
            .field("metadata", &self.metadata)
            .field("video_stream_index", &self.video_stream_index)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl MediaFile {
    /// Open a media file.
    ///
    /// Initializes FFmpeg (idempotent), opens the container, locates the best
    /// video stream and caches its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::FileOpen`] if the file cannot be opened or its
    /// video stream cannot be probed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VideoWallError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();
        log::debug!("Opening media file {}", path.display());

        ffmpeg_next::init().map_err(|error| VideoWallError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| VideoWallError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index());

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let format = input_context.format().name().to_string();

        let video = match video_stream_index.and_then(|index| input_context.stream(index)) {
            Some(stream) => {
                let decoder_context = CodecContext::from_parameters(stream.parameters())
                    .map_err(|error| VideoWallError::FileOpen {
                        path: file_path.clone(),
                        reason: format!("Failed to read video codec parameters: {error}"),
                    })?;
                let video_decoder =
                    decoder_context
                        .decoder()
                        .video()
                        .map_err(|error| VideoWallError::FileOpen {
                            path: file_path.clone(),
                            reason: format!("Failed to create video decoder: {error}"),
                        })?;

                let frame_rate = stream.avg_frame_rate();
                let frames_per_second = if frame_rate.denominator() != 0 {
                    frame_rate.numerator() as f64 / frame_rate.denominator() as f64
                } else {
                    let rate = stream.rate();
                    if rate.denominator() != 0 {
                        rate.numerator() as f64 / rate.denominator() as f64
                    } else {
                        0.0
                    }
                };

                // Prefer the container's frame count; fall back to duration x rate.
                let frame_count = match stream.frames() {
                    count if count > 0 => count as u64,
                    _ if frames_per_second > 0.0 => {
                        (duration.as_secs_f64() * frames_per_second) as u64
                    }
                    _ => 0,
                };

                let codec = video_decoder
                    .codec()
                    .map(|codec| codec.name().to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                Some(VideoMetadata {
                    width: video_decoder.width(),
                    height: video_decoder.height(),
                    frames_per_second,
                    frame_count,
                    codec,
                })
            }
            None => None,
        };

        Ok(Self {
            input_context,
            metadata: MediaMetadata {
                video,
                duration,
                format,
            },
            video_stream_index,
            file_path,
        })
    }

    /// Metadata cached at open time.
    pub fn metadata(&self) -> &MediaMetadata {
        &self.metadata
    }

    /// Video stream metadata.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::NoVideoStream`] if the file has no video.
    pub fn video_metadata(&self) -> Result<&VideoMetadata, VideoWallError> {
        self.metadata
            .video
            .as_ref()
            .ok_or(VideoWallError::NoVideoStream)
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
