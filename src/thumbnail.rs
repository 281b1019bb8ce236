//! Representative frame selection.
//!
//! The compositor does not decode video itself; it asks a [`FrameProvider`]
//! for one frame per [`VideoEntry`]. [`RandomFrameProvider`] is the stock
//! implementation: a decoded frame at a random offset within the video.
//! Tests and callers with their own stills can supply any other provider.

use image::DynamicImage;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::error::VideoWallError;
use crate::library::VideoEntry;
use crate::video::FrameReader;

/// Supplies the still shown in an entry's grid cell.
pub trait FrameProvider {
    /// Return a representative frame, or `None` to leave the cell blank.
    fn frame(&mut self, entry: &VideoEntry) -> Option<DynamicImage>;
}

impl<F> FrameProvider for F
where
    F: FnMut(&VideoEntry) -> Option<DynamicImage>,
{
    fn frame(&mut self, entry: &VideoEntry) -> Option<DynamicImage> {
        self(entry)
    }
}

/// Picks a uniformly random frame from each video.
///
/// Videos that report zero frames, or that fail to open or decode, yield no
/// frame; the failure is logged and the cell is left blank.
///
/// # Example
///
/// ```no_run
/// use videowall::{FrameProvider, RandomFrameProvider, VideoEntry};
///
/// let mut provider = RandomFrameProvider::new(Some(42));
/// let still = provider.frame(&VideoEntry::new("input_videos/a.mp4"));
/// ```
pub struct RandomFrameProvider {
    rng: StdRng,
}

impl RandomFrameProvider {
    /// Create a provider. A fixed `seed` makes the choice of frames
    /// reproducible across runs.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    fn try_frame(&mut self, entry: &VideoEntry) -> Result<Option<DynamicImage>, VideoWallError> {
        let mut reader = FrameReader::open(&entry.path)?;
        let total_frames = reader.frame_count();
        if total_frames == 0 {
            log::warn!("{} reports no frames; leaving its cell blank", entry.path.display());
            return Ok(None);
        }

        let frame_number = self.rng.random_range(0..total_frames);
        log::debug!(
            "Sampling frame {frame_number}/{total_frames} of {}",
            entry.path.display()
        );
        let image = reader.frame_at(frame_number)?;
        Ok(Some(DynamicImage::ImageRgb8(image)))
    }
}

impl FrameProvider for RandomFrameProvider {
    fn frame(&mut self, entry: &VideoEntry) -> Option<DynamicImage> {
        match self.try_frame(entry) {
            Ok(frame) => frame,
            Err(error) => {
                log::warn!("Skipping {}: {error}", entry.path.display());
                None
            }
        }
    }
}
