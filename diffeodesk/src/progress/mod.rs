//! Progress instrumentation for pipeline stage invocations.
//!
//! This module provides:
//! - The stage weight table and per-run increment resolution
//! - The run-scoped progress gauge
//! - Stage observers and the per-run observer rig

mod gauge;
mod observer;
mod weights;

pub use gauge::{ProgressGauge, MAX_PROGRESS};
pub use observer::{ObserverRig, ProgressObserver, StageCall, StageObserver, StageOutcome};
pub use weights::{default_weights, StageId, StageMode, StageSpec, StageWeight};
