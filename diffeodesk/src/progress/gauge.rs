//! Run-scoped progress gauge.

use std::sync::atomic::{AtomicU32, Ordering};
use tracing::warn;

/// Upper bound of the visible progress range.
pub const MAX_PROGRESS: u32 = 100;

/// The running progress value for a single run.
///
/// The orchestrator creates one gauge when a run starts, shares it with
/// the run's observers through an `Arc`, and drops it at teardown; no
/// gauge ever survives a run boundary. Only one run is active at a time,
/// so the atomic exists for shared ownership, not for parallelism.
#[derive(Debug, Default)]
pub struct ProgressGauge {
    current: AtomicU32,
}

impl ProgressGauge {
    /// Creates a gauge at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `increment` and returns the post-add value.
    ///
    /// There is no upper clamp: a weight table whose sum exceeds the
    /// budget overshoots [`MAX_PROGRESS`] visibly instead of being
    /// corrected silently, which keeps misconfiguration observable in
    /// testing.
    pub fn advance(&self, increment: u32) -> u32 {
        let value = self.current.fetch_add(increment, Ordering::SeqCst) + increment;
        if value > MAX_PROGRESS {
            warn!(value, max = MAX_PROGRESS, "progress overshot the maximum");
        }
        value
    }

    /// Forces the gauge to [`MAX_PROGRESS`].
    ///
    /// Used only on successful completion, to mask the rounding shortfall
    /// left by per-item floor division.
    pub fn force_complete(&self) {
        self.current.store(MAX_PROGRESS, Ordering::SeqCst);
    }

    /// Resets the gauge to zero. Called once per run, at teardown.
    pub fn reset(&self) {
        self.current.store(0, Ordering::SeqCst);
    }

    /// The current value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.current.load(Ordering::SeqCst)
    }
}
