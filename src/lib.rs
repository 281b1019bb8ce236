//! # videowall
//!
//! A touch-and-keyboard video wall for kiosks.
//!
//! `videowall` has two halves that share one grid geometry:
//!
//! - the **compositor** runs offline, tiles one representative frame (or a
//!   short clip) of every video in a directory into a captioned grid, and
//!   writes the result as an image or video artifact;
//! - the **controller** runs on the kiosk, shows that artifact full-screen
//!   with a highlight around the selected cell, and plays the selected
//!   video in an external full-screen player.
//!
//! Decoding and encoding go through FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ### Build the grid image
//!
//! ```no_run
//! use videowall::{Compositor, CompositorOptions, GridLayout, RandomFrameProvider};
//!
//! let entries = videowall::scan_directory("input_videos")?;
//! let mut compositor = Compositor::new(GridLayout::default(), CompositorOptions::new())?;
//! compositor.compose(&entries, &mut RandomFrameProvider::new(None), "output/display_frame.jpg")?;
//! # Ok::<(), videowall::VideoWallError>(())
//! ```
//!
//! ### Build a grid video
//!
//! ```no_run
//! use videowall::{Compositor, CompositorOptions, GridLayout};
//!
//! let entries = videowall::scan_directory("input_videos")?;
//! let options = CompositorOptions::new().with_clip(5.0, 30);
//! let mut compositor = Compositor::new(GridLayout::default(), options)?;
//! compositor.compose_video(&entries, "output/display_grid.mp4")?;
//! # Ok::<(), videowall::VideoWallError>(())
//! ```
//!
//! ### Geometry
//!
//! ```
//! use videowall::GridLayout;
//!
//! let layout = GridLayout::new(3, 2, 1920, 1080);
//! let index = layout.cell_at(700, 600, (30, 30));
//! assert_eq!(index, 4);
//! ```
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `display` | `SdlSurface`, a full-screen SDL2 window for the controller (default) |
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed. The `display` feature
//! also needs SDL2.

pub mod artifact;
pub mod caption;
pub mod compositor;
pub mod config;
pub mod controller;
#[cfg(feature = "display")]
pub mod display;
pub mod encode;
pub mod error;
pub mod ffmpeg;
pub mod layout;
pub mod library;
pub mod media;
pub mod metadata;
pub mod overlay;
pub mod playback;
pub mod power;
pub mod progress;
pub mod selection;
pub mod thumbnail;
mod utilities;
pub mod video;

pub use artifact::GridArtifact;
pub use caption::{CaptionAnchor, CaptionRenderer};
pub use compositor::{Compositor, render_canvas};
pub use config::{
    CompositorOptions, ControllerOptions, DEFAULT_ARTIFACT_PATH, DEFAULT_VIDEO_DIRECTORY,
    HighlightStyle, KioskConfig,
};
pub use controller::{Controller, ExitReason, Mode, Player, PowerControl, Surface};
#[cfg(feature = "display")]
pub use display::SdlSurface;
pub use encode::VideoWriter;
pub use error::VideoWallError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use layout::{GridLayout, HotZone, Insets, Rect, fit_dimensions};
pub use library::{VIDEO_EXTENSIONS, VideoEntry, is_video_file, scan_directory, scan_directory_or_empty};
pub use media::MediaFile;
pub use metadata::{MediaMetadata, VideoMetadata};
pub use overlay::{draw_highlight, draw_notice};
pub use playback::ExternalPlayer;
pub use power::SystemPower;
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use selection::{Direction, InputCommand, SelectionState};
pub use thumbnail::{FrameProvider, RandomFrameProvider};
pub use video::FrameReader;
