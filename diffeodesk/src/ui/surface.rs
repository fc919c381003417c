//! UI surface trait and implementations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Sink for progress updates and field mutations on the front-end.
///
/// All methods are synchronous from the caller's point of view:
/// `refresh` is an immediate flush, not a yield, so an update pushed
/// right before a slow stage body is visible while that body runs.
pub trait UiSurface: Send + Sync {
    /// Sets the progress bar value (0-100; overshoot is passed through).
    fn set_progress(&self, value: u32);

    /// Sets the progress label text.
    fn set_label(&self, label: &str);

    /// Makes the progress bar and label visible.
    fn show_progress(&self);

    /// Hides the progress bar and label.
    fn hide_progress(&self);

    /// Forces an immediate redraw.
    fn refresh(&self);

    /// Shows a message on the error line.
    fn set_error(&self, message: &str);

    /// Clears the error line.
    fn clear_error(&self);

    /// Clears the input and output path fields.
    fn clear_io_fields(&self);
}

/// A surface that discards all updates.
///
/// Used as the default when no front-end is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSurface;

impl UiSurface for NoOpSurface {
    fn set_progress(&self, _value: u32) {}
    fn set_label(&self, _label: &str) {}
    fn show_progress(&self) {}
    fn hide_progress(&self) {}
    fn refresh(&self) {}
    fn set_error(&self, _message: &str) {}
    fn clear_error(&self) {}
    fn clear_io_fields(&self) {}
}

/// A surface that logs every update through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSurface;

impl UiSurface for LoggingSurface {
    fn set_progress(&self, value: u32) {
        debug!(progress = value, "surface: progress");
    }

    fn set_label(&self, label: &str) {
        debug!(label, "surface: label");
    }

    fn show_progress(&self) {
        debug!("surface: show progress");
    }

    fn hide_progress(&self) {
        debug!("surface: hide progress");
    }

    fn refresh(&self) {
        debug!("surface: refresh");
    }

    fn set_error(&self, message: &str) {
        info!(message, "surface: error");
    }

    fn clear_error(&self) {
        debug!("surface: clear error");
    }

    fn clear_io_fields(&self) {
        debug!("surface: clear io fields");
    }
}

/// One recorded surface mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceUpdate {
    /// Progress bar value was set.
    Progress(u32),
    /// Label text was set.
    Label(String),
    /// Progress bar was made visible.
    ShowProgress,
    /// Progress bar was hidden.
    HideProgress,
    /// A redraw was forced.
    Refresh,
    /// Error line was set.
    Error(String),
    /// Error line was cleared.
    ClearError,
    /// Input/output fields were cleared.
    ClearIoFields,
}

/// A collecting surface for testing purposes.
///
/// Records every mutation in order so tests can assert on the exact
/// sequence a run pushed to the front-end.
#[derive(Debug, Default)]
pub struct CollectingSurface {
    updates: parking_lot::RwLock<Vec<SurfaceUpdate>>,
}

impl CollectingSurface {
    /// Creates a new collecting surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded updates.
    #[must_use]
    pub fn updates(&self) -> Vec<SurfaceUpdate> {
        self.updates.read().clone()
    }

    /// Returns the number of recorded updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.read().is_empty()
    }

    /// Clears the recording.
    pub fn clear(&self) {
        self.updates.write().clear();
    }

    /// Every progress value pushed, in order.
    #[must_use]
    pub fn progress_values(&self) -> Vec<u32> {
        self.updates
            .read()
            .iter()
            .filter_map(|u| match u {
                SurfaceUpdate::Progress(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Every label pushed, in order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.updates
            .read()
            .iter()
            .filter_map(|u| match u {
                SurfaceUpdate::Label(l) => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every error message pushed, in order.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.updates
            .read()
            .iter()
            .filter_map(|u| match u {
                SurfaceUpdate::Error(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent progress value, if any was pushed.
    #[must_use]
    pub fn last_progress(&self) -> Option<u32> {
        self.progress_values().last().copied()
    }

    /// Returns true if the recording contains the given update.
    #[must_use]
    pub fn contains(&self, update: &SurfaceUpdate) -> bool {
        self.updates.read().contains(update)
    }

    fn record(&self, update: SurfaceUpdate) {
        self.updates.write().push(update);
    }
}

impl UiSurface for CollectingSurface {
    fn set_progress(&self, value: u32) {
        self.record(SurfaceUpdate::Progress(value));
    }

    fn set_label(&self, label: &str) {
        self.record(SurfaceUpdate::Label(label.to_string()));
    }

    fn show_progress(&self) {
        self.record(SurfaceUpdate::ShowProgress);
    }

    fn hide_progress(&self) {
        self.record(SurfaceUpdate::HideProgress);
    }

    fn refresh(&self) {
        self.record(SurfaceUpdate::Refresh);
    }

    fn set_error(&self, message: &str) {
        self.record(SurfaceUpdate::Error(message.to_string()));
    }

    fn clear_error(&self) {
        self.record(SurfaceUpdate::ClearError);
    }

    fn clear_io_fields(&self) {
        self.record(SurfaceUpdate::ClearIoFields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_noop_surface() {
        let surface = NoOpSurface;
        surface.set_progress(50);
        surface.set_label("label");
        surface.refresh();
        // Should not panic
    }

    #[test]
    fn test_logging_surface() {
        let surface = LoggingSurface;
        surface.set_progress(10);
        surface.set_error("oops");
        surface.clear_io_fields();
        // Should not panic
    }

    #[test]
    fn test_collecting_surface_records_in_order() {
        let surface = CollectingSurface::new();
        assert!(surface.is_empty());

        surface.set_progress(5);
        surface.set_label("working");
        surface.refresh();

        assert_eq!(surface.len(), 3);
        assert_eq!(
            surface.updates(),
            vec![
                SurfaceUpdate::Progress(5),
                SurfaceUpdate::Label("working".to_string()),
                SurfaceUpdate::Refresh,
            ]
        );
    }

    #[test]
    fn test_collecting_surface_filters() {
        let surface = CollectingSurface::new();
        surface.set_progress(1);
        surface.set_label("a");
        surface.set_progress(2);
        surface.set_error("bad");

        assert_eq!(surface.progress_values(), vec![1, 2]);
        assert_eq!(surface.labels(), vec!["a"]);
        assert_eq!(surface.errors(), vec!["bad"]);
        assert_eq!(surface.last_progress(), Some(2));
    }

    #[test]
    fn test_collecting_surface_clear() {
        let surface = CollectingSurface::new();
        surface.show_progress();
        assert_eq!(surface.len(), 1);

        surface.clear();
        assert!(surface.is_empty());
        assert_eq!(surface.last_progress(), None);
    }

    #[test]
    fn test_surface_update_serialize() {
        let json = serde_json::to_string(&SurfaceUpdate::Progress(42)).unwrap();
        assert_eq!(json, r#"{"progress":42}"#);
    }
}
