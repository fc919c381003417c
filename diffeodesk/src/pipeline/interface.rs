//! Pipeline entry-point trait.

use crate::config::RunRequest;
use crate::errors::PipelineError;
use crate::progress::ObserverRig;
use async_trait::async_trait;

/// Entry point of the batch transform pipeline.
///
/// Implementations perform the full batch transform for `request` and
/// notify `observers` around each instrumented stage slot: once per
/// input item for [`StageId::Initialize`], [`StageId::FlowField`], and
/// [`StageId::Interpolate`], and once for the whole batch for
/// [`StageId::Save`]. Observers are notified *before* each stage body
/// runs; the pipeline must not reorder or batch these notifications.
///
/// [`StageId::Initialize`]: crate::progress::StageId::Initialize
/// [`StageId::FlowField`]: crate::progress::StageId::FlowField
/// [`StageId::Interpolate`]: crate::progress::StageId::Interpolate
/// [`StageId::Save`]: crate::progress::StageId::Save
#[async_trait]
pub trait DiffeoPipeline: Send + Sync {
    /// Runs the batch transform to completion.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingFiles`] when any input path does
    /// not exist. Other failures use the remaining variants and are not
    /// recovered by the orchestrator.
    async fn run(&self, request: &RunRequest, observers: &ObserverRig)
        -> Result<(), PipelineError>;
}
