//! Error types for the `videowall` crate.
//!
//! This module defines [`VideoWallError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the offending path or
//! upstream message so the kiosk and the compositor can print a useful
//! diagnostic without extra logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `videowall` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VideoWallError {
    /// The directory of source videos does not exist.
    #[error("Video directory does not exist: {path}")]
    DirectoryNotFound {
        /// Directory that was scanned.
        path: PathBuf,
    },

    /// A media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::MediaFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// The encoder could not be created or rejected a frame.
    #[error("Video encoding error: {0}")]
    VideoEncodeError(String),

    /// The output container could not be written.
    #[error("Video write error: {0}")]
    VideoWriteError(String),

    /// The grid artifact is missing or cannot be decoded.
    #[error("Could not load grid artifact {path}: {reason}")]
    ArtifactUnreadable {
        /// Artifact path.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// A grid layout with zero cells or cells smaller than one pixel.
    #[error("Invalid grid layout: {0}")]
    InvalidLayout(String),

    /// The external media player binary could not be started.
    #[error("Media player `{program}` is not installed or not found in PATH")]
    PlayerNotFound {
        /// Program that was invoked.
        program: String,
    },

    /// The external media player could not be run.
    #[error("Media player failed: {0}")]
    PlayerFailed(String),

    /// The power-off command could not be issued.
    #[error("Power-off command failed: {0}")]
    PowerCommandFailed(String),

    /// The window or its input source failed.
    #[error("Display error: {0}")]
    Display(String),

    /// A configuration file contained an invalid value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or saving a canvas.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// A configuration file could not be parsed or written.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),
}

impl From<FfmpegError> for VideoWallError {
    fn from(error: FfmpegError) -> Self {
        VideoWallError::FfmpegError(error.to_string())
    }
}
