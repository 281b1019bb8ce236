//! Selection controller tests driven by scripted input.
//!
//! The surface, player and power control are in-memory fakes that record
//! what the controller asked of them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use image::{Rgb, RgbImage};
use videowall::{
    Controller, ControllerOptions, ExitReason, GridArtifact, GridLayout, InputCommand, Mode,
    Player, PowerControl, Surface, VideoEntry, VideoWallError,
};

type Journal = Rc<RefCell<Vec<String>>>;

struct ScriptedSurface {
    script: VecDeque<Vec<InputCommand>>,
    journal: Journal,
    last_frame: Option<RgbImage>,
    presented: usize,
}

impl ScriptedSurface {
    fn new(script: Vec<Vec<InputCommand>>, journal: &Journal) -> Self {
        Self {
            script: script.into(),
            journal: journal.clone(),
            last_frame: None,
            presented: 0,
        }
    }
}

impl Surface for ScriptedSurface {
    fn present(&mut self, frame: &RgbImage) -> Result<(), VideoWallError> {
        self.presented += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn poll_commands(&mut self, _timeout: Duration) -> Result<Vec<InputCommand>, VideoWallError> {
        // An exhausted script quits so every test terminates.
        Ok(self
            .script
            .pop_front()
            .unwrap_or_else(|| vec![InputCommand::Quit]))
    }

    fn suspend(&mut self) -> Result<(), VideoWallError> {
        self.journal.borrow_mut().push("suspend".to_string());
        Ok(())
    }

    fn resume(&mut self) -> Result<(), VideoWallError> {
        self.journal.borrow_mut().push("resume".to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.journal.borrow_mut().push("close".to_string());
    }
}

struct RecordingPlayer {
    journal: Journal,
    missing: bool,
}

impl Player for RecordingPlayer {
    fn play(&mut self, path: &Path) -> Result<(), VideoWallError> {
        if self.missing {
            return Err(VideoWallError::PlayerNotFound {
                program: "cvlc".to_string(),
            });
        }
        let name = path.file_name().unwrap().to_string_lossy();
        self.journal.borrow_mut().push(format!("play {name}"));
        Ok(())
    }
}

struct RecordingPower {
    journal: Journal,
}

impl PowerControl for RecordingPower {
    fn power_off(&mut self) -> Result<(), VideoWallError> {
        self.journal.borrow_mut().push("power off".to_string());
        Ok(())
    }
}

type TestController = Controller<ScriptedSurface, RecordingPlayer, RecordingPower>;

fn video_directory(names: &[&str]) -> tempfile::TempDir {
    let directory = tempfile::tempdir().unwrap();
    for name in names {
        fs::write(directory.path().join(name), b"not really a video").unwrap();
    }
    directory
}

fn controller(
    entries: Vec<VideoEntry>,
    script: Vec<Vec<InputCommand>>,
    options: ControllerOptions,
    journal: &Journal,
) -> TestController {
    let artifact = GridArtifact::from_image(RgbImage::new(1920, 1080));
    Controller::new(
        GridLayout::new(3, 2, 1920, 1080),
        entries,
        artifact,
        options,
        ScriptedSurface::new(script, journal),
        RecordingPlayer {
            journal: journal.clone(),
            missing: false,
        },
        RecordingPower {
            journal: journal.clone(),
        },
    )
    .unwrap()
}

fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries_of(directory: &tempfile::TempDir) -> Vec<VideoEntry> {
    videowall::scan_directory(directory.path()).unwrap()
}

#[test]
fn selecting_fourth_cell_plays_d_mov_and_returns_to_browsing() {
    let directory = video_directory(&["a.mp4", "b.mp4", "c.mp4", "d.mov"]);
    let journal = journal();
    let mut controller = controller(
        entries_of(&directory),
        vec![vec![InputCommand::Down], vec![InputCommand::Commit]],
        ControllerOptions::new(),
        &journal,
    );

    assert_eq!(controller.step().unwrap(), None);
    assert_eq!(controller.selection().selected_index(), 3);
    assert_eq!(controller.step().unwrap(), None);
    assert_eq!(controller.mode(), Mode::Browsing);
    assert_eq!(controller.selection().selected_index(), 3);
    assert_eq!(
        *journal.borrow(),
        vec!["suspend", "play d.mov", "resume"]
    );

    assert_eq!(controller.run().unwrap(), ExitReason::Quit);
    assert_eq!(journal.borrow().last().map(String::as_str), Some("close"));
}

#[test]
fn pointer_commit_plays_the_cell_under_the_pointer() {
    let directory = video_directory(&["a.mp4", "b.mp4", "c.mp4", "d.mov"]);
    let journal = journal();
    let mut controller = controller(
        entries_of(&directory),
        vec![vec![InputCommand::PointerCommit(1000, 300)]],
        ControllerOptions::new(),
        &journal,
    );

    assert_eq!(controller.run().unwrap(), ExitReason::Quit);
    assert_eq!(controller.selection().selected_index(), 1);
    assert_eq!(
        *journal.borrow(),
        vec!["suspend", "play b.mp4", "resume", "close"]
    );
}

#[test]
fn pointer_move_updates_the_highlight() {
    let journal = journal();
    let mut controller = controller(
        Vec::new(),
        vec![vec![InputCommand::PointerMove(1500, 900)], Vec::new()],
        ControllerOptions::new().with_power_zone(None),
        &journal,
    );

    controller.step().unwrap();
    assert_eq!(controller.selection().selected_index(), 5);
    controller.step().unwrap();

    let frame = controller.surface().last_frame.clone().unwrap();
    let highlight = controller
        .layout()
        .highlight_rect(5, ControllerOptions::new().highlight.insets);
    assert_eq!(*frame.get_pixel(highlight.x, highlight.y), Rgb([255, 255, 0]));
    assert_eq!(*frame.get_pixel(30, 20), Rgb([0, 0, 0]));
}

#[test]
fn missing_file_shows_a_notice_instead_of_playing() {
    let directory = video_directory(&["a.mp4"]);
    let mut entries = entries_of(&directory);
    entries.push(VideoEntry::new(directory.path().join("ghost.mp4")));
    let journal = journal();
    let mut controller = controller(
        entries,
        vec![vec![InputCommand::Right, InputCommand::Commit]],
        ControllerOptions::new(),
        &journal,
    );

    assert_eq!(controller.step().unwrap(), None);
    assert_eq!(controller.mode(), Mode::Browsing);
    assert_eq!(controller.selection().selected_index(), 1);
    assert_eq!(controller.notice(), Some("Video not found: ghost.mp4"));
    assert!(journal.borrow().is_empty());
}

#[test]
fn missing_player_shows_a_notice() {
    let directory = video_directory(&["a.mp4"]);
    let journal = journal();
    let mut controller = Controller::new(
        GridLayout::default(),
        entries_of(&directory),
        GridArtifact::from_image(RgbImage::new(1920, 1080)),
        ControllerOptions::new(),
        ScriptedSurface::new(vec![vec![InputCommand::Commit]], &journal),
        RecordingPlayer {
            journal: journal.clone(),
            missing: true,
        },
        RecordingPower {
            journal: journal.clone(),
        },
    )
    .unwrap();

    assert_eq!(controller.step().unwrap(), None);
    assert_eq!(controller.mode(), Mode::Browsing);
    assert_eq!(controller.notice(), Some("Media player not found: cvlc"));
    assert_eq!(*journal.borrow(), vec!["suspend", "resume"]);
}

#[test]
fn commit_on_a_cell_without_a_video_does_nothing() {
    let directory = video_directory(&["a.mp4", "b.mp4", "c.mp4", "d.mov"]);
    let journal = journal();
    let mut controller = controller(
        entries_of(&directory),
        vec![vec![
            InputCommand::Down,
            InputCommand::Right,
            InputCommand::Right,
            InputCommand::Commit,
        ]],
        ControllerOptions::new(),
        &journal,
    );

    assert_eq!(controller.step().unwrap(), None);
    assert_eq!(controller.selection().selected_index(), 5);
    assert!(journal.borrow().is_empty());
    assert_eq!(controller.notice(), None);
}

#[test]
fn empty_library_still_browses() {
    let missing = PathBuf::from("definitely/not/a/video/directory");
    let entries = videowall::scan_directory_or_empty(&missing).unwrap();
    assert!(entries.is_empty());

    let journal = journal();
    let mut controller = controller(
        entries,
        vec![vec![InputCommand::Commit], vec![InputCommand::PointerCommit(10, 10)]],
        ControllerOptions::new(),
        &journal,
    );
    assert_eq!(controller.run().unwrap(), ExitReason::Quit);
    assert_eq!(*journal.borrow(), vec!["close"]);
}

#[test]
fn power_zone_click_closes_then_powers_off() {
    let directory = video_directory(&["a.mp4"]);
    let journal = journal();
    let mut controller = controller(
        entries_of(&directory),
        vec![
            vec![InputCommand::Right],
            vec![InputCommand::PointerCommit(1850, 1000)],
        ],
        ControllerOptions::new(),
        &journal,
    );

    assert_eq!(controller.run().unwrap(), ExitReason::Shutdown);
    assert_eq!(controller.selection().selected_index(), 1);
    assert_eq!(*journal.borrow(), vec!["close", "power off"]);
}

#[test]
fn pointer_move_inside_power_zone_keeps_selection() {
    let journal = journal();
    let mut controller = controller(
        Vec::new(),
        vec![vec![InputCommand::PointerMove(1850, 1000)]],
        ControllerOptions::new(),
        &journal,
    );
    controller.step().unwrap();
    assert_eq!(controller.selection().selected_index(), 0);
}

#[test]
fn disabled_power_zone_selects_the_corner_cell() {
    let journal = journal();
    let mut controller = controller(
        Vec::new(),
        vec![vec![InputCommand::PointerCommit(1850, 1000)]],
        ControllerOptions::new().with_power_zone(None),
        &journal,
    );
    assert_eq!(controller.run().unwrap(), ExitReason::Quit);
    assert_eq!(controller.selection().selected_index(), 5);
    assert_eq!(*journal.borrow(), vec!["close"]);
}

#[test]
fn quit_stops_processing_the_batch() {
    let directory = video_directory(&["a.mp4"]);
    let journal = journal();
    let mut controller = controller(
        entries_of(&directory),
        vec![vec![InputCommand::Quit, InputCommand::Commit]],
        ControllerOptions::new(),
        &journal,
    );
    assert_eq!(controller.step().unwrap(), Some(ExitReason::Quit));
    assert_eq!(*journal.borrow(), vec!["close"]);
    assert_eq!(controller.surface().presented, 1);
}

#[test]
fn layout_follows_the_artifact_size() {
    let journal = journal();
    let controller = Controller::new(
        GridLayout::default(),
        Vec::new(),
        GridArtifact::from_image(RgbImage::new(1280, 720)),
        ControllerOptions::new(),
        ScriptedSurface::new(Vec::new(), &journal),
        RecordingPlayer {
            journal: journal.clone(),
            missing: false,
        },
        RecordingPower {
            journal: journal.clone(),
        },
    )
    .unwrap();
    assert_eq!(controller.layout().cell_width(), 426);
    assert_eq!(controller.layout().cell_height(), 360);
}

/// Returns pointer motion on every poll without waiting, like a mouse
/// that never stops moving.
struct BusySurface {
    timeouts: Vec<Duration>,
}

impl Surface for BusySurface {
    fn present(&mut self, _frame: &RgbImage) -> Result<(), VideoWallError> {
        Ok(())
    }

    fn poll_commands(&mut self, timeout: Duration) -> Result<Vec<InputCommand>, VideoWallError> {
        self.timeouts.push(timeout);
        Ok(vec![InputCommand::PointerMove(100, 100)])
    }

    fn suspend(&mut self) -> Result<(), VideoWallError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), VideoWallError> {
        Ok(())
    }

    fn close(&mut self) {}
}

fn busy_controller(
    interval: Duration,
    journal: &Journal,
) -> Controller<BusySurface, RecordingPlayer, RecordingPower> {
    Controller::new(
        GridLayout::default(),
        Vec::new(),
        GridArtifact::from_image(RgbImage::new(1920, 1080)),
        ControllerOptions::new().with_frame_interval(interval),
        BusySurface {
            timeouts: Vec::new(),
        },
        RecordingPlayer {
            journal: journal.clone(),
            missing: false,
        },
        RecordingPower {
            journal: journal.clone(),
        },
    )
    .unwrap()
}

#[test]
fn constant_input_does_not_speed_up_the_grid() {
    let journal = journal();
    let mut controller = busy_controller(Duration::from_secs(3600), &journal);
    for _ in 0..20 {
        assert_eq!(controller.step().unwrap(), None);
    }
    assert_eq!(controller.ticks(), 0);
    let timeouts = &controller.surface().timeouts;
    assert_eq!(timeouts.len(), 20);
    assert!(timeouts.iter().all(|&timeout| timeout <= Duration::from_secs(3600)));
    assert!(timeouts[19] < Duration::from_secs(3600));
}

#[test]
fn grid_ticks_once_per_elapsed_interval() {
    let journal = journal();
    let mut controller = busy_controller(Duration::from_millis(1), &journal);
    for _ in 0..3 {
        std::thread::sleep(Duration::from_millis(5));
        controller.step().unwrap();
    }
    assert_eq!(controller.ticks(), 3);
}

#[test]
fn cells_too_small_to_highlight_are_rejected() {
    let journal = journal();
    let result = Controller::new(
        GridLayout::new(4, 4, 1920, 1080),
        Vec::new(),
        GridArtifact::from_image(RgbImage::new(320, 240)),
        ControllerOptions::new(),
        ScriptedSurface::new(Vec::new(), &journal),
        RecordingPlayer {
            journal: journal.clone(),
            missing: false,
        },
        RecordingPower {
            journal: journal.clone(),
        },
    );
    assert!(matches!(result, Err(VideoWallError::InvalidLayout(_))));
}
