//! Compositor and controller configuration.
//!
//! [`CompositorOptions`] and [`ControllerOptions`] are builders that replace
//! the magic numbers of a hand-tuned kiosk script (margins, colours, font
//! size, pacing) with named, overridable settings. [`KioskConfig`] bundles
//! both together with the shared [`GridLayout`] and can be stored as JSON so
//! the offline compositor and the kiosk agree on the grid shape.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use videowall::{CompositorOptions, ProgressCallback, ProgressInfo};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} done", info.operation, info.current);
//!     }
//! }
//!
//! let options = CompositorOptions::new()
//!     .with_background([16, 16, 16])
//!     .with_caption_font_size(28.0)
//!     .with_seed(7)
//!     .with_progress(Arc::new(LogProgress));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::VideoWallError;
use crate::layout::{GridLayout, HotZone, Insets};
use crate::progress::{NoOpProgress, ProgressCallback};

/// Default location of the source videos, relative to the working directory.
pub const DEFAULT_VIDEO_DIRECTORY: &str = "input_videos";

/// Default location of the grid artifact, relative to the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "output/display_frame.jpg";

/// Settings for [`Compositor`](crate::Compositor).
///
/// All fields have defaults matching the stock 1920x1080, 3x2 kiosk.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorOptions {
    /// Colour of empty cells and of the space around each thumbnail.
    pub background: [u8; 3],
    /// Total horizontal space left free around a thumbnail inside its cell.
    pub horizontal_margin: u32,
    /// Total vertical space left free around a thumbnail inside its cell.
    pub vertical_margin: u32,
    /// Height of the strip at the bottom of each cell reserved for the title.
    pub caption_band: u32,
    /// Whether to draw the per-entry title under each thumbnail.
    pub draw_titles: bool,
    /// Caption font size in pixels.
    pub caption_font_size: f32,
    /// Caption text colour.
    pub caption_color: [u8; 3],
    /// Distance from the cell's bottom edge to the caption's bottom edge.
    pub caption_baseline_offset: u32,
    /// Seed for representative-frame selection. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Length of each cell's clip when compositing a grid video.
    pub clip_seconds: f64,
    /// Frame rate of the grid video.
    pub fps: u32,
    /// Progress callback. Defaults to a no-op.
    #[serde(skip, default = "no_progress")]
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

fn no_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NoOpProgress)
}

impl Debug for CompositorOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CompositorOptions")
            .field("background", &self.background)
            .field("horizontal_margin", &self.horizontal_margin)
            .field("vertical_margin", &self.vertical_margin)
            .field("caption_band", &self.caption_band)
            .field("draw_titles", &self.draw_titles)
            .field("caption_font_size", &self.caption_font_size)
            .field("seed", &self.seed)
            .field("clip_seconds", &self.clip_seconds)
            .field("fps", &self.fps)
            .finish_non_exhaustive()
    }
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositorOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            background: [0, 0, 0],
            horizontal_margin: 50,
            vertical_margin: 70,
            caption_band: 20,
            draw_titles: true,
            caption_font_size: 30.0,
            caption_color: [255, 255, 255],
            caption_baseline_offset: 10,
            seed: None,
            clip_seconds: 5.0,
            fps: 30,
            progress: no_progress(),
        }
    }

    /// Set the background colour.
    #[must_use]
    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Set the free space around each thumbnail.
    #[must_use]
    pub fn with_margins(mut self, horizontal: u32, vertical: u32) -> Self {
        self.horizontal_margin = horizontal;
        self.vertical_margin = vertical;
        self
    }

    /// Enable or disable per-cell titles.
    #[must_use]
    pub fn with_titles(mut self, draw_titles: bool) -> Self {
        self.draw_titles = draw_titles;
        self
    }

    /// Set the caption font size in pixels.
    #[must_use]
    pub fn with_caption_font_size(mut self, size: f32) -> Self {
        self.caption_font_size = size;
        self
    }

    /// Fix the random seed used to pick representative frames.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the per-cell clip length and output frame rate for grid videos.
    ///
    /// The frame rate is clamped to a minimum of 1.
    #[must_use]
    pub fn with_clip(mut self, seconds: f64, fps: u32) -> Self {
        self.clip_seconds = seconds.max(0.0);
        self.fps = fps.max(1);
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Size of the box each thumbnail is fitted into.
    pub fn thumbnail_box(&self, layout: &GridLayout) -> (u32, u32) {
        (
            layout.cell_width().saturating_sub(self.horizontal_margin),
            layout.cell_height().saturating_sub(self.vertical_margin),
        )
    }

    /// Number of frames each grid-video clip contributes.
    pub fn clip_frame_count(&self) -> u64 {
        (self.clip_seconds * self.fps as f64).round() as u64
    }
}

/// Appearance of the selection highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Inset of the rectangle inside its cell.
    pub insets: Insets,
    /// Stroke width in pixels.
    pub stroke_width: u32,
    /// Stroke colour.
    pub color: [u8; 3],
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            insets: Insets::default(),
            stroke_width: 8,
            color: [255, 255, 0],
        }
    }
}

/// Settings for [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    /// Offset subtracted from pointer coordinates before the hit-test.
    pub pointer_offset: (i32, i32),
    /// Selection highlight appearance.
    pub highlight: HighlightStyle,
    /// Power-off hot-zone. `None` disables it.
    pub power_zone: Option<HotZone>,
    /// Bounded wait for input per loop iteration; also paces grid videos.
    pub frame_interval_ms: u64,
    /// How long an on-screen notice stays visible.
    pub notice_duration_ms: u64,
    /// Font size of on-screen notices.
    pub notice_font_size: f32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            pointer_offset: (30, 30),
            highlight: HighlightStyle::default(),
            power_zone: Some(HotZone::default()),
            frame_interval_ms: 33,
            notice_duration_ms: 3000,
            notice_font_size: 36.0,
        }
    }
}

impl ControllerOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the highlight style.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightStyle) -> Self {
        self.highlight = highlight;
        self
    }

    /// Set or disable the power-off hot-zone.
    #[must_use]
    pub fn with_power_zone(mut self, zone: Option<HotZone>) -> Self {
        self.power_zone = zone;
        self
    }

    /// Set the per-iteration input wait. Clamped to a minimum of 1 ms.
    #[must_use]
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval_ms = (interval.as_millis() as u64).max(1);
        self
    }

    /// Set how long notices stay on screen.
    #[must_use]
    pub fn with_notice_duration(mut self, duration: Duration) -> Self {
        self.notice_duration_ms = duration.as_millis() as u64;
        self
    }

    /// Per-iteration input wait.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Notice lifetime.
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}

/// Complete kiosk configuration, shared by both CLI subcommands.
///
/// Every field has a default, so a JSON file only needs the keys it
/// changes:
///
/// ```
/// use videowall::KioskConfig;
///
/// let config: KioskConfig =
///     serde_json::from_str(r#"{ "layout": { "columns": 4, "rows": 3 } }"#).unwrap();
/// assert_eq!(config.layout.columns, 4);
/// assert_eq!(config.layout.canvas_width, 1920);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Grid shape and canvas size.
    pub layout: GridLayout,
    /// Directory of source videos.
    pub video_directory: PathBuf,
    /// Path of the grid artifact.
    pub artifact_path: PathBuf,
    /// Compositor settings.
    pub compositor: CompositorOptions,
    /// Controller settings.
    pub controller: ControllerOptions,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            layout: GridLayout::default(),
            video_directory: PathBuf::from(DEFAULT_VIDEO_DIRECTORY),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            compositor: CompositorOptions::default(),
            controller: ControllerOptions::default(),
        }
    }
}

impl KioskConfig {
    /// Load a configuration file and validate its layout.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::IoError`] if the file cannot be read,
    /// [`VideoWallError::JsonError`] if it is not valid JSON, or
    /// [`VideoWallError::Config`] if the layout is unusable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VideoWallError> {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        let config: KioskConfig = serde_json::from_str(&text)?;
        config
            .layout
            .validate()
            .map_err(|error| VideoWallError::Config(format!("{}: {error}", path.display())))?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), VideoWallError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
