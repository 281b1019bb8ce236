//! Video discovery tests.

use std::fs;
use std::path::Path;

use videowall::{VideoEntry, VideoWallError, is_video_file, scan_directory, scan_directory_or_empty};

fn touch(directory: &Path, name: &str) {
    fs::write(directory.join(name), b"").unwrap();
}

#[test]
fn scan_keeps_videos_sorted_by_name() {
    let directory = tempfile::tempdir().unwrap();
    for name in ["d.mov", "b.mp4", "notes.txt", "a.mp4", "c.MKV", "e.avi", "cover.jpg"] {
        touch(directory.path(), name);
    }
    fs::create_dir(directory.path().join("nested.mp4")).unwrap();

    let entries = scan_directory(directory.path()).unwrap();
    let names: Vec<_> = entries
        .iter()
        .map(|entry| entry.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.mp4", "b.mp4", "c.MKV", "d.mov", "e.avi"]);
}

#[test]
fn titles_default_to_the_file_stem() {
    let directory = tempfile::tempdir().unwrap();
    touch(directory.path(), "Harbour at dusk.mp4");
    let entries = scan_directory(directory.path()).unwrap();
    assert_eq!(entries[0].display_title, "Harbour at dusk");
}

#[test]
fn with_title_replaces_the_caption() {
    let entry = VideoEntry::new("clips/a.mp4").with_title("Opening");
    assert_eq!(entry.display_title, "Opening");
    assert_eq!(entry.path, Path::new("clips/a.mp4"));
}

#[test]
fn missing_directory_is_an_error_for_the_compositor() {
    let directory = tempfile::tempdir().unwrap();
    let missing = directory.path().join("gone");
    let result = scan_directory(&missing);
    assert!(matches!(
        result,
        Err(VideoWallError::DirectoryNotFound { path }) if path == missing
    ));
}

#[test]
fn missing_directory_is_empty_for_the_kiosk() {
    let directory = tempfile::tempdir().unwrap();
    assert!(scan_directory_or_empty(directory.path().join("gone"))
            .unwrap()
            .is_empty());
}

#[test]
fn extension_check_is_case_insensitive() {
    assert!(is_video_file(Path::new("a.MP4")));
    assert!(is_video_file(Path::new("dir/b.mov")));
    assert!(!is_video_file(Path::new("c.webm")));
    assert!(!is_video_file(Path::new("mp4")));
}
