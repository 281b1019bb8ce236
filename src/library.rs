//! Discovery of the videos shown on the wall.
//!
//! The order of [`VideoEntry`] values decides grid position (row-major), so
//! the compositor and the kiosk must see the same list. Both go through
//! [`scan_directory`], which sorts by file name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VideoWallError;

/// File extensions recognised as videos (compared case-insensitively).
pub const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "avi", "mov", "mkv"];

/// One video on the wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    /// Location of the video file.
    pub path: PathBuf,
    /// Caption drawn under the thumbnail.
    pub display_title: String,
}

impl VideoEntry {
    /// Create an entry titled with the file stem.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let display_title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            display_title,
        }
    }

    /// Replace the caption.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.display_title = title.into();
        self
    }
}

/// Returns `true` if `path` has one of the [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

/// List the videos directly inside `directory`, sorted by file name.
///
/// # Errors
///
/// Returns [`VideoWallError::DirectoryNotFound`] if `directory` is not a
/// directory, or [`VideoWallError::IoError`] if it cannot be listed.
///
/// # Example
///
/// ```no_run
/// let entries = videowall::scan_directory("input_videos")?;
/// for entry in &entries {
///     println!("{} -> {}", entry.display_title, entry.path.display());
/// }
/// # Ok::<(), videowall::VideoWallError>(())
/// ```
pub fn scan_directory<P: AsRef<Path>>(directory: P) -> Result<Vec<VideoEntry>, VideoWallError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(VideoWallError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_video_file(&path) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    log::debug!(
        "Found {} video(s) in {}",
        paths.len(),
        directory.display()
    );
    Ok(paths.into_iter().map(VideoEntry::new).collect())
}

/// Like [`scan_directory`], but an absent directory yields an empty list.
///
/// The kiosk uses this so a missing video folder still shows the grid (with
/// every cell inert) instead of refusing to start.
pub fn scan_directory_or_empty<P: AsRef<Path>>(
    directory: P,
) -> Result<Vec<VideoEntry>, VideoWallError> {
    match scan_directory(&directory) {
        Err(VideoWallError::DirectoryNotFound { path }) => {
            log::warn!(
                "Video directory {} not found; the grid will be inert",
                path.display()
            );
            Ok(Vec::new())
        }
        other => other,
    }
}
