//! Mock pipelines and observers for testing.

use crate::config::RunRequest;
use crate::errors::PipelineError;
use crate::pipeline::DiffeoPipeline;
use crate::progress::{ObserverRig, StageCall, StageId, StageObserver, StageOutcome};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// A pipeline that drives the observer rig exactly as the real pipeline
/// contract prescribes: for each input item the three per-item stage
/// slots in order, then the batch save slot once.
///
/// Failure behavior is scripted: the pipeline can verify that input
/// paths exist (like the real image loader) or fail unconditionally
/// after a fixed number of stage invocations, to exercise the
/// partial-progress paths.
#[derive(Debug, Default)]
pub struct ScriptedPipeline {
    verify_inputs: bool,
    fail_after: Option<usize>,
    calls: Mutex<Vec<(StageId, Option<PathBuf>)>>,
}

impl ScriptedPipeline {
    /// A pipeline that succeeds for any request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A pipeline that fails with the missing-file class when an input
    /// path does not exist on disk, checked as each item is initialized.
    #[must_use]
    pub fn verifying_inputs() -> Self {
        Self {
            verify_inputs: true,
            ..Self::default()
        }
    }

    /// A pipeline that fails with the missing-file class after
    /// `invocations` stage invocations, regardless of the filesystem.
    #[must_use]
    pub fn failing_after(invocations: usize) -> Self {
        Self {
            fail_after: Some(invocations),
            ..Self::default()
        }
    }

    /// Every stage invocation so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(StageId, Option<PathBuf>)> {
        self.calls.lock().clone()
    }

    /// Number of stage invocations so far.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, stage: StageId, item: Option<&Path>) -> usize {
        let mut calls = self.calls.lock();
        calls.push((stage, item.map(Path::to_path_buf)));
        calls.len()
    }

    fn scripted_failure(&self, invocations: usize, item: &Path) -> Option<PipelineError> {
        if self.fail_after == Some(invocations) {
            return Some(PipelineError::missing_files([item.to_path_buf()]));
        }
        if self.verify_inputs && !item.exists() {
            return Some(PipelineError::missing_files([item.to_path_buf()]));
        }
        None
    }
}

const PER_ITEM_STAGES: [StageId; 3] = [StageId::Initialize, StageId::FlowField, StageId::Interpolate];

#[async_trait]
impl DiffeoPipeline for ScriptedPipeline {
    async fn run(
        &self,
        request: &RunRequest,
        observers: &ObserverRig,
    ) -> Result<(), PipelineError> {
        for input in &request.inputs {
            for stage in PER_ITEM_STAGES {
                let call = observers.stage_call(stage).with_item(input.clone());
                observers.notify_before(&call).await;
                let invocations = self.record(stage, Some(input.as_path()));

                if let Some(failure) = self.scripted_failure(invocations, input) {
                    observers
                        .notify_after(&call, &StageOutcome::Failed(failure.to_string()))
                        .await;
                    return Err(failure);
                }
                observers.notify_after(&call, &StageOutcome::Completed).await;
            }
        }

        let call = observers.stage_call(StageId::Save);
        observers.notify_before(&call).await;
        self.record(StageId::Save, None);
        observers.notify_after(&call, &StageOutcome::Completed).await;
        Ok(())
    }
}

/// An observer that records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    before: Mutex<Vec<StageCall>>,
    after: Mutex<Vec<(StageCall, StageOutcome)>>,
}

impl RecordingObserver {
    /// Creates a new recording observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `before_call` context received.
    #[must_use]
    pub fn before_calls(&self) -> Vec<StageCall> {
        self.before.lock().clone()
    }

    /// Every `after_call` context and outcome received.
    #[must_use]
    pub fn after_calls(&self) -> Vec<(StageCall, StageOutcome)> {
        self.after.lock().clone()
    }

    /// Number of `before_call` notifications.
    #[must_use]
    pub fn before_count(&self) -> usize {
        self.before.lock().len()
    }
}

#[async_trait]
impl StageObserver for RecordingObserver {
    async fn before_call(&self, call: &StageCall) {
        self.before.lock().push(call.clone());
    }

    async fn after_call(&self, call: &StageCall, outcome: &StageOutcome) {
        self.after.lock().push((call.clone(), outcome.clone()));
    }
}
