//! Scoped teardown covering every exit path of a run.

use crate::progress::ProgressGauge;
use crate::ui::UiSurface;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resets the progress surface and gauge when dropped.
///
/// Armed when a run enters `Running`. Drop runs on success, on the
/// recovered missing-file path, and when a pipeline failure propagates
/// or panics, so no run can leak a visible progress bar or a nonzero
/// gauge into the next run.
pub struct TeardownGuard {
    gauge: Arc<ProgressGauge>,
    surface: Arc<dyn UiSurface>,
}

impl TeardownGuard {
    /// Arms a guard over the run's gauge and surface.
    #[must_use]
    pub fn arm(gauge: Arc<ProgressGauge>, surface: Arc<dyn UiSurface>) -> Self {
        Self { gauge, surface }
    }
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        self.surface.set_progress(0);
        self.surface.set_label("");
        self.surface.hide_progress();
        self.gauge.reset();
        debug!("run teardown complete");
    }
}

impl fmt::Debug for TeardownGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeardownGuard")
            .field("gauge", &self.gauge)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{CollectingSurface, SurfaceUpdate};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_drop_resets_surface_and_gauge() {
        let gauge = Arc::new(ProgressGauge::new());
        let collecting = Arc::new(CollectingSurface::new());
        let surface: Arc<dyn UiSurface> = collecting.clone();

        gauge.advance(42);
        let guard = TeardownGuard::arm(Arc::clone(&gauge), surface);
        drop(guard);

        assert_eq!(gauge.value(), 0);
        assert_eq!(
            collecting.updates(),
            vec![
                SurfaceUpdate::Progress(0),
                SurfaceUpdate::Label(String::new()),
                SurfaceUpdate::HideProgress,
            ]
        );
    }

    #[test]
    fn test_drop_runs_during_unwind() {
        let gauge = Arc::new(ProgressGauge::new());
        let collecting = Arc::new(CollectingSurface::new());
        let surface: Arc<dyn UiSurface> = collecting.clone();
        gauge.advance(10);

        let gauge_inner = Arc::clone(&gauge);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = TeardownGuard::arm(gauge_inner, surface);
            panic!("mid-run failure");
        }));

        assert!(result.is_err());
        assert_eq!(gauge.value(), 0);
        assert!(collecting.contains(&SurfaceUpdate::HideProgress));
    }
}
