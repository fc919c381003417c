//! Per-request run control flow.

use crate::config::RunRequest;
use crate::context::RunIdentity;
use crate::errors::{PipelineError, ValidationError};
use crate::observability::RunTimer;
use crate::pipeline::DiffeoPipeline;
use crate::progress::{ObserverRig, ProgressGauge, StageWeight, MAX_PROGRESS};
use crate::run::{RunState, TeardownGuard};
use crate::ui::UiSurface;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Message shown when the pipeline reports missing files.
pub const MISSING_FILES_MESSAGE: &str = "ERROR: One or more files not found";

/// Label shown when a run completes.
pub const COMPLETION_LABEL: &str = "Diffeomorphing complete!";

/// How long a finished run holds at 100% before teardown, so the user
/// can observe the completed bar.
pub const DEFAULT_COMPLETION_HOLD: Duration = Duration::from_secs(2);

/// Outcome of a run request, as interpreted by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pipeline completed; progress was forced to the maximum.
    Completed,
    /// Preconditions failed; nothing was instrumented.
    Rejected(ValidationError),
    /// The pipeline raised the missing-file class; fields were cleared.
    FilesMissing,
}

/// Drives one run at a time through the state machine
/// `Idle → Validating → Running → {Succeeded, Failed} → Idle`.
///
/// Each run gets a fresh gauge and observer rig, both discarded at
/// teardown, so consecutive runs share no progress state.
pub struct RunOrchestrator {
    pipeline: Arc<dyn DiffeoPipeline>,
    surface: Arc<dyn UiSurface>,
    weights: Vec<StageWeight>,
    completion_hold: Duration,
    state: RunState,
}

impl RunOrchestrator {
    /// Creates an orchestrator with the default stage weight table.
    #[must_use]
    pub fn new(pipeline: Arc<dyn DiffeoPipeline>, surface: Arc<dyn UiSurface>) -> Self {
        Self::with_weights(pipeline, surface, crate::progress::default_weights())
    }

    /// Creates an orchestrator with a custom weight table.
    #[must_use]
    pub fn with_weights(
        pipeline: Arc<dyn DiffeoPipeline>,
        surface: Arc<dyn UiSurface>,
        weights: Vec<StageWeight>,
    ) -> Self {
        Self {
            pipeline,
            surface,
            weights,
            completion_hold: DEFAULT_COMPLETION_HOLD,
            state: RunState::Idle,
        }
    }

    /// Overrides the hold at 100% after a successful run.
    #[must_use]
    pub fn with_completion_hold(mut self, hold: Duration) -> Self {
        self.completion_hold = hold;
        self
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Handles one run request end to end.
    ///
    /// Holds `&mut self` until teardown finishes, so a second run cannot
    /// start while one is active. There is no cancellation: once the
    /// pipeline starts it proceeds to completion or failure.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure other than the missing-file class
    /// untranslated. Teardown has already run when this returns.
    pub async fn run(&mut self, request: &RunRequest) -> Result<RunOutcome, PipelineError> {
        self.state = RunState::Validating;
        if let Err(validation) = request.validate() {
            self.surface.set_error(&validation.to_string());
            self.state = RunState::Idle;
            info!(error = %validation, "run request rejected");
            return Ok(RunOutcome::Rejected(validation));
        }

        self.surface.clear_error();
        self.surface.set_progress(0);
        self.surface.show_progress();

        let identity = RunIdentity::new();
        let gauge = Arc::new(ProgressGauge::new());
        let rig = ObserverRig::build(
            &self.weights,
            request.item_count(),
            &gauge,
            &self.surface,
            identity.clone(),
        );
        let guard = TeardownGuard::arm(Arc::clone(&gauge), Arc::clone(&self.surface));

        self.state = RunState::Running;
        let timer = RunTimer::start();
        info!(
            run_id = %identity.run_id,
            items = request.item_count(),
            stages = rig.len(),
            "run started"
        );

        let outcome = match self.pipeline.run(request, &rig).await {
            Ok(()) => {
                self.state = RunState::Succeeded;
                gauge.force_complete();
                self.surface.set_progress(MAX_PROGRESS);
                self.surface.set_label(COMPLETION_LABEL);
                self.surface.refresh();
                info!(
                    run_id = %identity.run_id,
                    duration_ms = timer.elapsed_ms(),
                    "run completed"
                );
                tokio::time::sleep(self.completion_hold).await;
                Ok(RunOutcome::Completed)
            }
            Err(failure) if failure.is_missing_files() => {
                self.state = RunState::Failed;
                self.surface.clear_io_fields();
                self.surface.set_error(MISSING_FILES_MESSAGE);
                warn!(run_id = %identity.run_id, error = %failure, "run failed: missing files");
                Ok(RunOutcome::FilesMissing)
            }
            Err(failure) => {
                self.state = RunState::Failed;
                error!(
                    run_id = %identity.run_id,
                    duration_ms = timer.elapsed_ms(),
                    error = %failure,
                    "run failed"
                );
                Err(failure)
            }
        };

        drop(guard);
        self.state = RunState::Idle;
        outcome
    }
}

impl fmt::Debug for RunOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOrchestrator")
            .field("state", &self.state)
            .field("weights", &self.weights)
            .field("completion_hold", &self.completion_hold)
            .finish()
    }
}
