//! Assertions over recorded surface updates.

use crate::ui::{CollectingSurface, SurfaceUpdate};

/// Asserts that the surface received exactly `expected` progress values,
/// in order.
///
/// # Panics
///
/// Panics when the recorded sequence differs.
pub fn assert_progress_sequence(surface: &CollectingSurface, expected: &[u32]) {
    let actual = surface.progress_values();
    assert_eq!(
        actual, expected,
        "progress sequence mismatch: got {actual:?}, expected {expected:?}"
    );
}

/// Asserts that the surface showed the given label at some point.
///
/// # Panics
///
/// Panics when the label was never pushed.
pub fn assert_saw_label(surface: &CollectingSurface, label: &str) {
    let labels = surface.labels();
    assert!(
        labels.iter().any(|l| l == label),
        "label {label:?} never shown; labels were {labels:?}"
    );
}

/// Asserts that the run ended with the teardown sequence: progress reset
/// to zero, label cleared, bar hidden.
///
/// # Panics
///
/// Panics when the recording does not end with the teardown sequence.
pub fn assert_torn_down(surface: &CollectingSurface) {
    let updates = surface.updates();
    let tail: Vec<_> = updates.iter().rev().take(3).rev().cloned().collect();
    assert_eq!(
        tail,
        vec![
            SurfaceUpdate::Progress(0),
            SurfaceUpdate::Label(String::new()),
            SurfaceUpdate::HideProgress,
        ],
        "surface did not end with the teardown sequence; full recording: {updates:?}"
    );
}
