//! Grid compositing.
//!
//! The [`Compositor`] turns an ordered list of videos into the kiosk's grid
//! artifact: either a still image with one representative frame per cell,
//! or a grid video in which every cell plays the opening seconds of its
//! video. Cell `i` always belongs to entry `i` (row-major); entries beyond
//! the grid's capacity are dropped and cells without an entry (or without a
//! decodable frame) show the background colour.
//!
//! # Example
//!
//! ```no_run
//! use videowall::{Compositor, CompositorOptions, GridLayout, RandomFrameProvider};
//!
//! let entries = videowall::scan_directory("input_videos")?;
//! let mut compositor = Compositor::new(GridLayout::new(3, 2, 1920, 1080), CompositorOptions::new())?;
//! let mut provider = RandomFrameProvider::new(None);
//! let canvas = compositor.compose(&entries, &mut provider, "output/display_frame.jpg")?;
//! assert_eq!(canvas.dimensions(), (1920, 1080));
//! # Ok::<(), videowall::VideoWallError>(())
//! ```

use std::fs;
use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, imageops, imageops::FilterType};

use crate::caption::{CaptionAnchor, CaptionRenderer};
use crate::config::CompositorOptions;
use crate::encode::VideoWriter;
use crate::error::VideoWallError;
use crate::layout::{GridLayout, fit_dimensions};
use crate::library::VideoEntry;
use crate::media::MediaFile;
use crate::progress::{OperationType, ProgressTracker};
use crate::thumbnail::FrameProvider;
use crate::video::FrameReader;

/// Builds grid images and grid videos for one layout.
#[derive(Debug)]
pub struct Compositor {
    layout: GridLayout,
    options: CompositorOptions,
    captions: Option<CaptionRenderer>,
}

impl Compositor {
    /// Create a compositor.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::InvalidLayout`] if the layout has no cells.
    pub fn new(layout: GridLayout, options: CompositorOptions) -> Result<Self, VideoWallError> {
        layout.validate()?;
        Ok(Self {
            layout,
            options,
            captions: None,
        })
    }

    /// The grid layout.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The compositing options.
    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    /// Composite one canvas from per-cell images and titles.
    ///
    /// See [`render_canvas`]. The caption renderer is created on first use.
    pub fn render(&mut self, cells: &[Option<RgbImage>], titles: &[String]) -> RgbImage {
        let captions = if self.options.draw_titles {
            Some(self.captions.get_or_insert_with(CaptionRenderer::new))
        } else {
            None
        };
        render_canvas(&self.layout, &self.options, cells, titles, captions)
    }

    /// Composite a still grid and write it to `output`.
    ///
    /// Asks `provider` for one frame per entry (up to the grid capacity),
    /// renders the canvas, saves it (creating parent directories; format
    /// from the extension) and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::IoError`] or [`VideoWallError::ImageError`]
    /// if the artifact cannot be written. Per-entry decode failures are not
    /// errors; those cells are left blank.
    pub fn compose<P: AsRef<Path>>(
        &mut self,
        entries: &[VideoEntry],
        provider: &mut dyn FrameProvider,
        output: P,
    ) -> Result<RgbImage, VideoWallError> {
        let entries = self.fit_to_capacity(entries);
        log::info!(
            "Compositing {} video(s) into a {}x{} grid",
            entries.len(),
            self.layout.columns,
            self.layout.rows
        );
        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::GridImage,
            Some(entries.len() as u64),
        );

        let mut cells = Vec::with_capacity(entries.len());
        for entry in entries {
            log::debug!("Processing video: {}", entry.path.display());
            cells.push(provider.frame(entry).map(DynamicImage::into_rgb8));
            tracker.advance_item(&entry.display_title);
        }

        let titles = titles_of(entries);
        let canvas = self.render(&cells, &titles);

        let output = output.as_ref();
        ensure_parent(output)?;
        canvas.save(output)?;
        log::info!("Wrote grid image {}", output.display());
        Ok(canvas)
    }

    /// Composite a grid video and write it to `output`.
    ///
    /// Every cell plays the first [`clip_seconds`](CompositorOptions::clip_seconds)
    /// of its video, resampled to the output frame rate. A clip that ends
    /// early holds its last frame; a video that cannot be opened leaves its
    /// cell blank. Frames are encoded as they are rendered. Returns the
    /// number of frames written.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::VideoWriteError`] if the clip length is zero
    /// or the output cannot be written, or an encoder error.
    pub fn compose_video<P: AsRef<Path>>(
        &mut self,
        entries: &[VideoEntry],
        output: P,
    ) -> Result<u64, VideoWallError> {
        let entries = self.fit_to_capacity(entries);
        let total_frames = self.options.clip_frame_count();
        if total_frames == 0 {
            return Err(VideoWallError::VideoWriteError(
                "clip length must be at least one frame".to_string(),
            ));
        }
        let output_fps = self.options.fps.max(1);
        log::info!(
            "Compositing a {total_frames}-frame grid video from {} video(s) at {output_fps} fps",
            entries.len()
        );

        let fit_box = self.options.thumbnail_box(&self.layout);
        let mut clips: Vec<ClipCell> = entries
            .iter()
            .map(|entry| ClipCell::open(entry, fit_box))
            .collect();

        let output = output.as_ref();
        ensure_parent(output)?;
        let mut writer = VideoWriter::create(
            output,
            self.layout.canvas_width,
            self.layout.canvas_height,
            output_fps,
        )?;

        let titles = titles_of(entries);
        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::GridVideo,
            Some(total_frames),
        );
        let mut cells: Vec<Option<RgbImage>> = vec![None; clips.len()];

        for output_frame in 0..total_frames {
            for (cell, clip) in cells.iter_mut().zip(clips.iter_mut()) {
                clip.advance_to(output_frame, output_fps);
                *cell = clip.current.clone();
            }
            let canvas = self.render(&cells, &titles);
            writer.write_frame(&canvas)?;
            tracker.advance();
        }

        writer.finish()?;
        log::info!("Wrote grid video {}", output.display());
        Ok(total_frames)
    }

    fn fit_to_capacity<'a>(&self, entries: &'a [VideoEntry]) -> &'a [VideoEntry] {
        let capacity = self.layout.capacity();
        if entries.len() > capacity {
            log::warn!(
                "{} video(s) do not fit the {}x{} grid and will not be shown",
                entries.len() - capacity,
                self.layout.columns,
                self.layout.rows
            );
            &entries[..capacity]
        } else {
            entries
        }
    }
}

/// Composite one canvas from per-cell images and titles.
///
/// `cells[i]` is fitted into cell `i`; `None` (or a missing index) leaves
/// the cell blank. `titles[i]` is drawn under cell `i` when titles are
/// enabled and a caption renderer is supplied. Indices at or beyond the
/// layout's capacity are ignored.
///
/// ```
/// use image::{Rgb, RgbImage};
/// use videowall::{CompositorOptions, GridLayout, render_canvas};
///
/// let layout = GridLayout::new(2, 1, 200, 100);
/// let red = RgbImage::from_pixel(40, 20, Rgb([255, 0, 0]));
/// let canvas = render_canvas(&layout, &CompositorOptions::new(), &[Some(red)], &[], None);
/// assert_eq!(canvas.dimensions(), (200, 100));
/// assert_eq!(*canvas.get_pixel(50, 30), Rgb([255, 0, 0]));
/// assert_eq!(*canvas.get_pixel(150, 30), Rgb([0, 0, 0]));
/// ```
pub fn render_canvas(
    layout: &GridLayout,
    options: &CompositorOptions,
    cells: &[Option<RgbImage>],
    titles: &[String],
    captions: Option<&mut CaptionRenderer>,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        layout.canvas_width,
        layout.canvas_height,
        Rgb(options.background),
    );
    let (box_width, box_height) = options.thumbnail_box(layout);

    for (index, cell) in cells.iter().enumerate().take(layout.capacity()) {
        let Some(image) = cell else {
            continue;
        };
        let (width, height) = fit_dimensions(image.width(), image.height(), box_width, box_height);
        if width == 0 || height == 0 {
            continue;
        }
        let (x, y) = layout.place_in_cell(index, width, height, options.caption_band);
        if image.dimensions() == (width, height) {
            imageops::replace(&mut canvas, image, i64::from(x), i64::from(y));
        } else {
            let resized = imageops::resize(image, width, height, FilterType::Triangle);
            imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
        }
    }

    if let Some(captions) = captions.filter(|_| options.draw_titles) {
        for (index, title) in titles.iter().enumerate().take(layout.capacity()) {
            if title.is_empty() {
                continue;
            }
            let cell = layout.cell_rect(index);
            let anchor = CaptionAnchor {
                center_x: (cell.x + cell.width / 2) as i32,
                bottom_y: (cell.y + cell.height) as i32 - options.caption_baseline_offset as i32,
            };
            captions.draw(
                &mut canvas,
                title,
                options.caption_font_size,
                options.caption_color,
                anchor,
            );
        }
    }

    canvas
}

fn titles_of(entries: &[VideoEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.display_title.clone())
        .collect()
}

fn ensure_parent(path: &Path) -> Result<(), VideoWallError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Decoding state of one cell's clip in a grid video.
struct ClipCell {
    reader: Option<FrameReader>,
    source_fps: f64,
    /// Number of source frames decoded so far.
    decoded: u64,
    current: Option<RgbImage>,
}

impl ClipCell {
    fn open(entry: &VideoEntry, fit_box: (u32, u32)) -> Self {
        match Self::open_reader(entry, fit_box) {
            Ok(reader) => Self {
                source_fps: reader.frames_per_second(),
                reader: Some(reader),
                decoded: 0,
                current: None,
            },
            Err(error) => {
                log::warn!("Skipping {}: {error}", entry.path.display());
                Self {
                    reader: None,
                    source_fps: 0.0,
                    decoded: 0,
                    current: None,
                }
            }
        }
    }

    fn open_reader(entry: &VideoEntry, fit_box: (u32, u32)) -> Result<FrameReader, VideoWallError> {
        let media = MediaFile::open(&entry.path)?;
        let video = media.video_metadata()?;
        let size = fit_dimensions(video.width, video.height, fit_box.0, fit_box.1);
        FrameReader::from_media(media, Some(size))
    }

    /// Decode forward to the source frame shown at `output_frame`.
    fn advance_to(&mut self, output_frame: u64, output_fps: u32) {
        let Some(reader) = self.reader.as_mut() else {
            return;
        };
        let target = if self.source_fps > 0.0 {
            (output_frame as f64 * self.source_fps / output_fps as f64) as u64
        } else {
            output_frame
        };
        while self.decoded <= target {
            match reader.next_frame() {
                Ok(Some(frame)) => {
                    self.current = Some(frame);
                    self.decoded += 1;
                }
                Ok(None) => {
                    self.reader = None;
                    return;
                }
                Err(error) => {
                    log::warn!("Clip ended early: {error}");
                    self.reader = None;
                    return;
                }
            }
        }
    }
}
