//! The kiosk's selection-and-playback loop.
//!
//! A [`Controller`] shows the grid artifact with a highlight around the
//! selected cell, turns [`InputCommand`]s into selection changes, and on
//! commit hands the selected video to a [`Player`], blocking until it
//! returns. Everything runs on the caller's thread: each
//! [`step`](Controller::step) renders one frame, waits a bounded time for
//! input, and dispatches it.
//!
//! The window, the player and the power-off command sit behind the
//! [`Surface`], [`Player`] and [`PowerControl`] traits, so the loop can be
//! driven by scripted fakes.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "display")]
//! # fn main() -> Result<(), videowall::VideoWallError> {
//! use videowall::{
//!     Controller, ControllerOptions, ExternalPlayer, GridArtifact, GridLayout, SdlSurface,
//!     SystemPower,
//! };
//!
//! let artifact = GridArtifact::open("output/display_frame.jpg")?;
//! let entries = videowall::scan_directory_or_empty("input_videos")?;
//! let surface = SdlSurface::open("videowall", artifact.dimensions())?;
//! let mut controller = Controller::new(
//!     GridLayout::default(),
//!     entries,
//!     artifact,
//!     ControllerOptions::new(),
//!     surface,
//!     ExternalPlayer::default(),
//!     SystemPower::default(),
//! )?;
//! let reason = controller.run()?;
//! println!("kiosk stopped: {reason:?}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "display"))]
//! # fn main() {}
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use image::RgbImage;

use crate::artifact::GridArtifact;
use crate::caption::CaptionRenderer;
use crate::config::ControllerOptions;
use crate::error::VideoWallError;
use crate::layout::GridLayout;
use crate::library::VideoEntry;
use crate::overlay::{draw_highlight, draw_notice};
use crate::selection::{InputCommand, SelectionState};

/// The display the grid is shown on, and its input source.
pub trait Surface {
    /// Show `frame` (canvas-sized RGB).
    fn present(&mut self, frame: &RgbImage) -> Result<(), VideoWallError>;

    /// Wait at most `timeout` for input and return every pending command.
    fn poll_commands(&mut self, timeout: Duration) -> Result<Vec<InputCommand>, VideoWallError>;

    /// Release the screen before external playback starts.
    fn suspend(&mut self) -> Result<(), VideoWallError>;

    /// Take the screen back after playback. Input that arrived meanwhile is
    /// discarded.
    fn resume(&mut self) -> Result<(), VideoWallError>;

    /// Close the display. Called once, before the controller exits.
    fn close(&mut self);
}

/// Plays one video full-screen, returning when it ends or is quit.
pub trait Player {
    /// Play `path` to completion.
    fn play(&mut self, path: &Path) -> Result<(), VideoWallError>;
}

/// Powers the host off.
pub trait PowerControl {
    /// Issue the power-off command.
    fn power_off(&mut self) -> Result<(), VideoWallError>;
}

/// What the controller is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Showing the grid and accepting navigation.
    Browsing,
    /// An external player owns the screen.
    Playing,
}

/// Why [`Controller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The user pressed the quit key or closed the window.
    Quit,
    /// The power-off hot-zone was clicked and the power-off command issued.
    Shutdown,
}

#[derive(Debug)]
struct Notice {
    text: String,
    expires_at: Instant,
}

/// Drives the kiosk.
pub struct Controller<S, P, W> {
    layout: GridLayout,
    entries: Vec<VideoEntry>,
    artifact: GridArtifact,
    options: ControllerOptions,
    surface: S,
    player: P,
    power: W,
    selection: SelectionState,
    mode: Mode,
    notice: Option<Notice>,
    captions: Option<CaptionRenderer>,
    shutdown_armed: bool,
    last_tick: Instant,
    ticks: u64,
}

impl<S: Surface, P: Player, W: PowerControl> Controller<S, P, W> {
    /// Create a controller in [`Mode::Browsing`] with cell 0 selected.
    ///
    /// The layout's canvas size is replaced by the artifact's, so the
    /// highlight and the hit-test line up with what is on screen.
    ///
    /// # Errors
    ///
    /// Returns [`VideoWallError::InvalidLayout`] if the grid does not fit
    /// the artifact or its cells are too small to highlight and hit-test.
    pub fn new(
        layout: GridLayout,
        entries: Vec<VideoEntry>,
        artifact: GridArtifact,
        options: ControllerOptions,
        surface: S,
        player: P,
        power: W,
    ) -> Result<Self, VideoWallError> {
        let (width, height) = artifact.dimensions();
        let layout = layout.with_canvas(width, height);
        layout.validate_selection(options.highlight.insets, options.pointer_offset)?;
        if entries.len() > layout.capacity() {
            log::warn!(
                "{} video(s) have no cell in the {}x{} grid",
                entries.len() - layout.capacity(),
                layout.columns,
                layout.rows
            );
        }
        Ok(Self {
            selection: SelectionState::new(layout.capacity()),
            layout,
            entries,
            artifact,
            options,
            surface,
            player,
            power,
            mode: Mode::Browsing,
            notice: None,
            captions: None,
            shutdown_armed: false,
            last_tick: Instant::now(),
            ticks: 0,
        })
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Text of the on-screen notice, if one is showing.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_ref().map(|notice| notice.text.as_str())
    }

    /// The layout, sized to the artifact.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The grid artifact being shown.
    pub fn artifact(&self) -> &GridArtifact {
        &self.artifact
    }

    /// Number of frame intervals elapsed so far. A grid video moves
    /// forward one frame per tick.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The display surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The player.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// The power control.
    pub fn power(&self) -> &W {
        &self.power
    }

    /// Loop until the user quits or the host is powered off.
    pub fn run(&mut self) -> Result<ExitReason, VideoWallError> {
        log::info!(
            "Kiosk started with {} video(s) on a {}x{} grid",
            self.entries.len(),
            self.layout.columns,
            self.layout.rows
        );
        loop {
            if let Some(reason) = self.step()? {
                return Ok(reason);
            }
        }
    }

    /// Run one loop iteration: render, poll input, dispatch.
    ///
    /// Input is awaited until the current frame interval ends. The grid
    /// video only advances once a full interval has passed since the last
    /// tick, so a burst of input does not speed it up.
    ///
    /// Returns the exit reason once the controller has finished; the
    /// surface is closed by then.
    pub fn step(&mut self) -> Result<Option<ExitReason>, VideoWallError> {
        self.present()?;

        let interval = self.options.frame_interval();
        let timeout = interval.saturating_sub(self.last_tick.elapsed());
        let commands = self.surface.poll_commands(timeout)?;
        for command in commands {
            if let Some(reason) = self.handle(command) {
                return self.finish(reason).map(Some);
            }
        }

        if self.shutdown_armed {
            return self.finish(ExitReason::Shutdown).map(Some);
        }
        if self.selection.take_armed() {
            self.commit()?;
        } else if self.last_tick.elapsed() >= interval {
            self.artifact.advance();
            self.ticks += 1;
            self.last_tick = Instant::now();
        }
        Ok(None)
    }

    /// Apply one input command to the selection.
    ///
    /// Returns [`ExitReason::Quit`] for [`InputCommand::Quit`]. A pointer
    /// commit inside the power-off hot-zone arms the shutdown instead of
    /// changing the selection; it is carried out by the next
    /// [`step`](Controller::step).
    pub fn handle(&mut self, command: InputCommand) -> Option<ExitReason> {
        match command {
            InputCommand::Quit => return Some(ExitReason::Quit),
            InputCommand::Commit => self.selection.arm(),
            InputCommand::PointerMove(x, y) => {
                if !self.in_power_zone(x, y) {
                    self.select_at(x, y);
                }
            }
            InputCommand::PointerCommit(x, y) => {
                if self.in_power_zone(x, y) {
                    log::info!("Power-off requested");
                    self.shutdown_armed = true;
                } else {
                    self.select_at(x, y);
                    self.selection.arm();
                }
            }
            navigation => {
                if let Some(direction) = navigation.direction() {
                    self.selection.move_in(direction, self.layout.columns);
                }
            }
        }
        None
    }

    /// Play the selected cell's video and return to browsing.
    ///
    /// A cell without an entry is ignored. A missing file or a missing
    /// player shows a notice instead of playing.
    pub fn commit(&mut self) -> Result<(), VideoWallError> {
        let index = self.selection.selected_index();
        let Some(entry) = self.entries.get(index) else {
            log::debug!("No video in cell {index}");
            return Ok(());
        };
        let path = entry.path.clone();
        if !path.is_file() {
            log::warn!("Selected video is missing: {}", path.display());
            self.show_notice(format!("Video not found: {}", display_name(&path)));
            return Ok(());
        }

        log::info!("Playing {}", path.display());
        self.mode = Mode::Playing;
        self.surface.suspend()?;
        let outcome = self.player.play(&path);
        self.surface.resume()?;
        self.mode = Mode::Browsing;

        if let Err(error) = self.artifact.rewind() {
            log::warn!("Cannot restart grid video: {error}");
        }
        self.last_tick = Instant::now();

        match outcome {
            Ok(()) => log::debug!("Playback of {} finished", path.display()),
            Err(VideoWallError::PlayerNotFound { program }) => {
                log::warn!("Media player `{program}` not found");
                self.show_notice(format!("Media player not found: {program}"));
            }
            Err(error) => {
                log::warn!("Playback of {} failed: {error}", path.display());
                self.show_notice(format!("Could not play {}", display_name(&path)));
            }
        }
        Ok(())
    }

    fn finish(&mut self, reason: ExitReason) -> Result<ExitReason, VideoWallError> {
        self.surface.close();
        if reason == ExitReason::Shutdown {
            log::info!("Powering off");
            self.power.power_off()?;
        }
        Ok(reason)
    }

    fn present(&mut self) -> Result<(), VideoWallError> {
        let mut frame = draw_highlight(
            self.artifact.frame(),
            &self.layout,
            &self.options.highlight,
            self.selection.selected_index(),
        );
        if self
            .notice
            .as_ref()
            .is_some_and(|notice| Instant::now() >= notice.expires_at)
        {
            self.notice = None;
        }
        if let Some(notice) = &self.notice {
            let captions = self.captions.get_or_insert_with(CaptionRenderer::new);
            draw_notice(&mut frame, &notice.text, self.options.notice_font_size, captions);
        }
        self.surface.present(&frame)
    }

    fn show_notice(&mut self, text: String) {
        self.notice = Some(Notice {
            text,
            expires_at: Instant::now() + self.options.notice_duration(),
        });
    }

    fn in_power_zone(&self, x: i32, y: i32) -> bool {
        self.options.power_zone.is_some_and(|zone| {
            zone.contains(self.layout.canvas_width, self.layout.canvas_height, x, y)
        })
    }

    fn select_at(&mut self, x: i32, y: i32) {
        let index = self.layout.cell_at(x, y, self.options.pointer_offset);
        self.selection.select(index);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
