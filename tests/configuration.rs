//! CompositorOptions, ControllerOptions and KioskConfig tests.

use std::time::Duration;

use videowall::{
    CompositorOptions, ControllerOptions, GridLayout, HighlightStyle, HotZone, KioskConfig,
    VideoWallError,
};

// ── CompositorOptions builder ───────────────────────────────────

#[test]
fn compositor_defaults() {
    let options = CompositorOptions::new();
    assert_eq!(options.background, [0, 0, 0]);
    assert_eq!((options.horizontal_margin, options.vertical_margin), (50, 70));
    assert_eq!(options.caption_band, 20);
    assert!(options.draw_titles);
    assert_eq!(options.caption_font_size, 30.0);
    assert_eq!(options.seed, None);
    assert_eq!(options.clip_frame_count(), 150);
    let debug = format!("{options:?}");
    assert!(debug.contains("CompositorOptions"));
    assert!(debug.contains("horizontal_margin: 50"));
}

#[test]
fn compositor_builder_chain() {
    let options = CompositorOptions::new()
        .with_background([10, 20, 30])
        .with_margins(20, 40)
        .with_titles(false)
        .with_caption_font_size(24.0)
        .with_seed(99)
        .with_clip(2.5, 24);
    assert_eq!(options.background, [10, 20, 30]);
    assert_eq!((options.horizontal_margin, options.vertical_margin), (20, 40));
    assert!(!options.draw_titles);
    assert_eq!(options.caption_font_size, 24.0);
    assert_eq!(options.seed, Some(99));
    assert_eq!(options.clip_frame_count(), 60);
}

#[test]
fn with_clip_clamps_frame_rate() {
    let options = CompositorOptions::new().with_clip(-1.0, 0);
    assert_eq!(options.fps, 1);
    assert_eq!(options.clip_frame_count(), 0);
}

#[test]
fn thumbnail_box_subtracts_margins() {
    let layout = GridLayout::new(3, 2, 1920, 1080);
    assert_eq!(CompositorOptions::new().thumbnail_box(&layout), (590, 470));
    let tiny = GridLayout::new(3, 2, 90, 60);
    assert_eq!(CompositorOptions::new().thumbnail_box(&tiny), (0, 0));
}

// ── ControllerOptions builder ───────────────────────────────────

#[test]
fn controller_defaults() {
    let options = ControllerOptions::new();
    assert_eq!(options.pointer_offset, (30, 30));
    assert_eq!(options.highlight, HighlightStyle::default());
    assert_eq!(options.highlight.stroke_width, 8);
    assert_eq!(options.highlight.color, [255, 255, 0]);
    assert_eq!(options.power_zone, Some(HotZone::default()));
    assert_eq!(options.frame_interval(), Duration::from_millis(33));
    assert_eq!(options.notice_duration(), Duration::from_secs(3));
}

#[test]
fn controller_builder_chain() {
    let options = ControllerOptions::new()
        .with_power_zone(None)
        .with_frame_interval(Duration::ZERO)
        .with_notice_duration(Duration::from_millis(500));
    assert_eq!(options.power_zone, None);
    assert_eq!(options.frame_interval(), Duration::from_millis(1));
    assert_eq!(options.notice_duration(), Duration::from_millis(500));
}

// ── KioskConfig ─────────────────────────────────────────────────

#[test]
fn partial_json_keeps_defaults() {
    let config: KioskConfig = serde_json::from_str(
        r#"{ "layout": { "columns": 4 }, "compositor": { "draw_titles": false } }"#,
    )
    .unwrap();
    assert_eq!(config.layout.columns, 4);
    assert_eq!(config.layout.rows, 2);
    assert!(!config.compositor.draw_titles);
    assert_eq!(config.compositor.caption_band, 20);
    assert_eq!(config.artifact_path.to_str(), Some("output/display_frame.jpg"));
    assert_eq!(config.video_directory.to_str(), Some("input_videos"));
}

#[test]
fn save_then_load_preserves_settings() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("kiosk.json");
    let mut config = KioskConfig::default();
    config.layout = GridLayout::new(4, 3, 1280, 720);
    config.compositor = config.compositor.with_seed(5);
    config.controller = config.controller.with_power_zone(None);
    config.save(&path).unwrap();

    let loaded = KioskConfig::load(&path).unwrap();
    assert_eq!(loaded.layout, config.layout);
    assert_eq!(loaded.compositor.seed, Some(5));
    assert_eq!(loaded.controller, config.controller);
}

#[test]
fn load_rejects_unusable_layouts() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("kiosk.json");
    std::fs::write(&path, r#"{ "layout": { "columns": 0 } }"#).unwrap();
    assert!(matches!(KioskConfig::load(&path), Err(VideoWallError::Config(_))));
}

#[test]
fn load_reports_malformed_json() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("kiosk.json");
    std::fs::write(&path, "{ layout: ").unwrap();
    assert!(matches!(KioskConfig::load(&path), Err(VideoWallError::JsonError(_))));
}
