//! Progress reporting for the offline compositor.
//!
//! Decoding one representative frame per video, or a clip per cell for a
//! grid video, can take a while on a single-board computer. Attach a
//! [`ProgressCallback`] to [`CompositorOptions`](crate::CompositorOptions) to
//! observe it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use videowall::{
//!     Compositor, CompositorOptions, GridLayout, ProgressCallback, ProgressInfo,
//!     RandomFrameProvider, VideoWallError,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let entries = videowall::scan_directory("input_videos")?;
//! let options = CompositorOptions::new().with_progress(Arc::new(PrintProgress));
//! let mut compositor = Compositor::new(GridLayout::default(), options)?;
//! let mut provider = RandomFrameProvider::new(None);
//! compositor.compose(&entries, &mut provider, "output/display_frame.jpg")?;
//! # Ok::<(), VideoWallError>(())
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// The kind of work currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Sampling one representative frame per video for a grid image.
    GridImage,
    /// Rendering output frames of a grid video.
    GridVideo,
}

/// A snapshot of compositing progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// Entries or output frames finished so far.
    pub current: u64,
    /// Total expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion in percent, if `total` is known and non-zero.
    pub percentage: Option<f32>,
    /// Title of the entry just processed (grid images only).
    pub item: Option<String>,
    /// Wall-clock time since compositing started.
    pub elapsed: Duration,
    /// Linear estimate of the time left.
    pub estimated_remaining: Option<Duration>,
}

/// Receives progress updates during compositing.
///
/// Callbacks observe the work and cannot stop it.
pub trait ProgressCallback: Send + Sync {
    /// Called after each processed entry or output frame.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Default callback; discards every update.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Counts finished work and forwards snapshots to a callback.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    started: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            started: Instant::now(),
        }
    }

    /// Record one finished output frame.
    pub(crate) fn advance(&mut self) {
        self.current += 1;
        self.callback.on_progress(&self.snapshot(None));
    }

    /// Record one finished entry.
    pub(crate) fn advance_item(&mut self, item: &str) {
        self.current += 1;
        self.callback.on_progress(&self.snapshot(Some(item.to_string())));
    }

    fn snapshot(&self, item: Option<String>) -> ProgressInfo {
        let elapsed = self.started.elapsed();
        let total = self.total.filter(|&total| total > 0);
        let percentage = total.map(|total| self.current as f32 / total as f32 * 100.0);
        let estimated_remaining = total.filter(|_| self.current > 0).map(|total| {
            let left = total.saturating_sub(self.current) as f64;
            elapsed.mul_f64(left / self.current as f64)
        });
        ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            item,
            elapsed,
            estimated_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{OperationType, ProgressCallback, ProgressInfo, ProgressTracker};

    #[derive(Default)]
    struct Collect(Mutex<Vec<ProgressInfo>>);

    impl ProgressCallback for Collect {
        fn on_progress(&self, info: &ProgressInfo) {
            self.0.lock().unwrap().push(info.clone());
        }
    }

    #[test]
    fn reports_percentage_and_item() {
        let collect = Arc::new(Collect::default());
        let mut tracker = ProgressTracker::new(collect.clone(), OperationType::GridImage, Some(4));
        tracker.advance_item("a");
        tracker.advance_item("b");
        let seen = collect.0.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].current, 2);
        assert_eq!(seen[1].percentage, Some(50.0));
        assert_eq!(seen[1].item.as_deref(), Some("b"));
        assert!(seen[1].estimated_remaining.is_some());
    }

    #[test]
    fn zero_total_has_no_percentage() {
        let collect = Arc::new(Collect::default());
        let mut tracker = ProgressTracker::new(collect.clone(), OperationType::GridVideo, Some(0));
        tracker.advance();
        let seen = collect.0.lock().unwrap();
        assert_eq!(seen[0].percentage, None);
        assert_eq!(seen[0].estimated_remaining, None);
        assert_eq!(seen[0].item, None);
    }
}
