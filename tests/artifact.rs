//! Grid artifact loading tests that need no encoder.

use image::{Rgb, RgbImage};
use videowall::{GridArtifact, VideoWallError};

#[test]
fn still_image_round_trips_through_disk() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("display_frame.png");
    let image = RgbImage::from_pixel(64, 36, Rgb([12, 34, 56]));
    image.save(&path).unwrap();

    let mut artifact = GridArtifact::open(&path).unwrap();
    assert!(!artifact.is_video());
    assert_eq!(artifact.dimensions(), (64, 36));
    assert_eq!(*artifact.frame().get_pixel(10, 10), Rgb([12, 34, 56]));
    assert!(!artifact.advance());
    artifact.rewind().unwrap();
    assert_eq!(artifact.dimensions(), (64, 36));
}

#[test]
fn missing_artifact_is_reported_with_its_path() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("display_frame.jpg");
    match GridArtifact::open(&path) {
        Err(VideoWallError::ArtifactUnreadable { path: reported, .. }) => {
            assert_eq!(reported, path)
        }
        other => panic!("expected ArtifactUnreadable, got {other:?}"),
    }
}

#[test]
fn corrupt_image_is_unreadable() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("display_frame.jpg");
    std::fs::write(&path, b"definitely not a jpeg").unwrap();
    assert!(matches!(
        GridArtifact::open(&path),
        Err(VideoWallError::ArtifactUnreadable { .. })
    ));
}

#[test]
fn corrupt_video_is_unreadable() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("grid.mp4");
    std::fs::write(&path, b"definitely not an mp4").unwrap();
    assert!(matches!(
        GridArtifact::open(&path),
        Err(VideoWallError::ArtifactUnreadable { .. })
    ));
}

#[test]
fn debug_output_names_the_variant() {
    let artifact = GridArtifact::from_image(RgbImage::new(4, 2));
    assert_eq!(format!("{artifact:?}"), "Still((4, 2))");
}
