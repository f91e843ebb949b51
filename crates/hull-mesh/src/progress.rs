//! Progress reporting with cooperative cancellation.
//!
//! Long-running stages report after each unit of work (for carving, after
//! each view). A callback returning `false` asks the stage to stop at the
//! next checkpoint.
//!
//! # Example
//!
//! ```
//! use hull_mesh::progress::{CallbackProgressReporter, ProgressCallback, ProgressReporter};
//!
//! let callback: ProgressCallback = Box::new(|progress| progress.current < 2);
//! let reporter = CallbackProgressReporter::new(&callback);
//! assert!(reporter.report_progress(1, 6, "front"));
//! assert!(!reporter.report_progress(2, 6, "back"));
//! ```

use std::time::{Duration, Instant};

/// Progress information passed to callbacks.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Completed steps.
    pub current: u64,

    /// Total number of steps.
    pub total: u64,

    /// Human-readable message describing the step just finished.
    pub message: String,

    /// Elapsed time since the operation started.
    pub elapsed: Duration,

    /// Estimated time remaining (if available).
    pub estimated_remaining: Option<Duration>,
}

impl Progress {
    /// Create a new progress report.
    pub fn new(current: u64, total: u64, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
            elapsed: Duration::ZERO,
            estimated_remaining: None,
        }
    }

    /// Get progress as a fraction (0.0 to 1.0).
    #[inline]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64) / (self.total as f64)
        }
    }

    /// Get progress as a percentage (0 to 100).
    #[inline]
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }
}

/// Callback function for progress reporting.
///
/// Returns `true` to continue, `false` to request cancellation.
pub type ProgressCallback = Box<dyn Fn(&Progress) -> bool + Send + Sync>;

/// Something a stage can report progress to.
pub trait ProgressReporter {
    /// Report progress. Returns `false` if the caller asked to cancel.
    fn report_progress(&self, current: u64, total: u64, message: &str) -> bool;
}

/// A progress reporter that does nothing and never cancels.
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    #[inline]
    fn report_progress(&self, _current: u64, _total: u64, _message: &str) -> bool {
        true
    }
}

/// A progress reporter that forwards to a callback, adding timing.
pub struct CallbackProgressReporter<'a> {
    callback: &'a ProgressCallback,
    start_time: Instant,
}

impl<'a> CallbackProgressReporter<'a> {
    pub fn new(callback: &'a ProgressCallback) -> Self {
        Self {
            callback,
            start_time: Instant::now(),
        }
    }
}

impl ProgressReporter for CallbackProgressReporter<'_> {
    fn report_progress(&self, current: u64, total: u64, message: &str) -> bool {
        let elapsed = self.start_time.elapsed();
        let estimated_remaining = if current > 0 && current <= total {
            let rate = current as f64 / elapsed.as_secs_f64();
            (rate > 0.0 && rate.is_finite())
                .then(|| Duration::from_secs_f64((total - current) as f64 / rate))
        } else {
            None
        };

        let progress = Progress {
            current,
            total,
            message: message.to_string(),
            elapsed,
            estimated_remaining,
        };

        (self.callback)(&progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_progress_fraction() {
        let p = Progress::new(3, 6, "left");
        assert!((p.fraction() - 0.5).abs() < 1e-10);
        assert_eq!(p.percent(), 50);
        assert!(!p.is_complete());
    }

    #[test]
    fn test_progress_zero_total() {
        let p = Progress::new(0, 0, "nothing to do");
        assert_eq!(p.percent(), 0);
        assert!(p.is_complete());
    }

    #[test]
    fn test_noop_never_cancels() {
        assert!(NoOpProgressReporter.report_progress(5, 6, "top"));
    }

    #[test]
    fn test_callback_receives_progress() {
        let seen = Arc::new(AtomicU64::new(0));
        let seen_in_callback = Arc::clone(&seen);
        let callback: ProgressCallback = Box::new(move |p| {
            seen_in_callback.store(p.current, Ordering::SeqCst);
            assert_eq!(p.total, 6);
            true
        });

        let reporter = CallbackProgressReporter::new(&callback);
        assert!(reporter.report_progress(4, 6, "right"));
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }
}
