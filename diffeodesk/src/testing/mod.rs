//! Testing utilities for the diffeodesk control layer.
//!
//! This module provides:
//! - A scripted pipeline that drives the observer rig the way the real
//!   pipeline contract prescribes
//! - A recording observer for rig-routing tests
//! - Request fixtures and surface assertions

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_progress_sequence, assert_saw_label, assert_torn_down};
pub use fixtures::{batch_request, fake_inputs};
pub use mocks::{RecordingObserver, ScriptedPipeline};
