//! The grid artifact shown by the kiosk.
//!
//! The compositor writes either a still image or a grid video. The kiosk
//! only needs "the current background frame" and, for videos, a way to step
//! forward and loop, so both are wrapped in [`GridArtifact`].

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::Path;

use image::RgbImage;

use crate::error::VideoWallError;
use crate::library::is_video_file;
use crate::video::FrameReader;

/// A loaded grid image or grid video.
pub enum GridArtifact {
    /// A still grid image.
    Still(RgbImage),
    /// A grid video that loops forever.
    Video {
        /// Decoder positioned after `current`.
        reader: FrameReader,
        /// Frame currently on screen.
        current: RgbImage,
    },
}

impl Debug for GridArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            GridArtifact::Still(image) => f
                .debug_tuple("Still")
                .field(&image.dimensions())
                .finish(),
            GridArtifact::Video { current, .. } => f
                .debug_struct("Video")
                .field("dimensions", &current.dimensions())
                .finish_non_exhaustive(),
        }
    }
}

impl GridArtifact {
    /// Load an artifact, choosing image or video by file extension.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::ArtifactUnreadable`] if the file is missing
    /// or cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VideoWallError> {
        let path = path.as_ref();
        let unreadable = |reason: String| VideoWallError::ArtifactUnreadable {
            path: path.to_path_buf(),
            reason,
        };
        if !path.is_file() {
            return Err(unreadable("file does not exist".to_string()));
        }

        if is_video_file(path) {
            log::debug!("Loading grid video {}", path.display());
            let mut reader = FrameReader::open(path).map_err(|e| unreadable(e.to_string()))?;
            let current = reader
                .next_frame()
                .map_err(|e| unreadable(e.to_string()))?
                .ok_or_else(|| unreadable("video has no frames".to_string()))?;
            Ok(GridArtifact::Video { reader, current })
        } else {
            log::debug!("Loading grid image {}", path.display());
            let image = image::open(path).map_err(|e| unreadable(e.to_string()))?;
            Ok(GridArtifact::Still(image.into_rgb8()))
        }
    }

    /// Wrap an already-rendered grid image.
    pub fn from_image(image: RgbImage) -> Self {
        GridArtifact::Still(image)
    }

    /// The frame to show now.
    pub fn frame(&self) -> &RgbImage {
        match self {
            GridArtifact::Still(image) => image,
            GridArtifact::Video { current, .. } => current,
        }
    }

    /// Canvas size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frame().dimensions()
    }

    /// Whether the artifact animates.
    pub fn is_video(&self) -> bool {
        matches!(self, GridArtifact::Video { .. })
    }

    /// Step a video to its next frame, looping at the end.
    ///
    /// Returns `true` if the current frame changed. Stills never change.
    /// A decode failure keeps the current frame on screen.
    pub fn advance(&mut self) -> bool {
        let GridArtifact::Video { reader, current } = self else {
            return false;
        };
        match reader.next_frame() {
            Ok(Some(frame)) => {
                *current = frame;
                true
            }
            Ok(None) => {
                let restarted = reader.rewind().and_then(|()| reader.next_frame());
                match restarted {
                    Ok(Some(frame)) => {
                        *current = frame;
                        true
                    }
                    Ok(None) => false,
                    Err(error) => {
                        log::warn!("Cannot loop grid video: {error}");
                        false
                    }
                }
            }
            Err(error) => {
                log::warn!("Grid video frame lost: {error}");
                false
            }
        }
    }

    /// Restart a video from its first frame.
    pub fn rewind(&mut self) -> Result<(), VideoWallError> {
        if let GridArtifact::Video { reader, current } = self {
            reader.rewind()?;
            if let Some(frame) = reader.next_frame()? {
                *current = frame;
            }
        }
        Ok(())
    }
}
