//! Stage observers: progress instrumentation as injected strategies.
//!
//! Observers are constructed fresh for every run and handed to the
//! pipeline entry point by parameter. Nothing is patched onto shared
//! stage slots, so there is no install/uninstall step to get wrong and
//! consecutive runs cannot stack instrumentation.

use crate::context::RunIdentity;
use crate::progress::{ProgressGauge, StageId, StageMode, StageSpec, StageWeight};
use crate::ui::UiSurface;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Context for one observed stage invocation.
#[derive(Debug, Clone)]
pub struct StageCall {
    /// The stage slot being invoked.
    pub stage: StageId,
    /// Identity of the run this invocation belongs to.
    pub identity: RunIdentity,
    /// The input item being processed, when the stage runs per item.
    pub item: Option<PathBuf>,
}

impl StageCall {
    /// Creates a call context for a stage.
    #[must_use]
    pub fn new(stage: StageId, identity: RunIdentity) -> Self {
        Self {
            stage,
            identity,
            item: None,
        }
    }

    /// Attaches the item path being processed.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<PathBuf>) -> Self {
        self.item = Some(item.into());
        self
    }
}

/// What a stage invocation produced, as seen by `after_call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage body returned normally.
    Completed,
    /// The stage body failed with the given message.
    Failed(String),
}

impl StageOutcome {
    /// Returns true for the failed outcome.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Capability interface the pipeline invokes around each stage call.
///
/// Observers watch stage invocations; they never alter stage behavior,
/// arguments, or results, and stage failures never pass through them.
#[async_trait]
pub trait StageObserver: Send + Sync {
    /// Called before the stage body runs.
    async fn before_call(&self, call: &StageCall);

    /// Called after the stage body finished. Observation only.
    async fn after_call(&self, _call: &StageCall, _outcome: &StageOutcome) {}
}

/// Progress-reporting observer for one stage slot.
///
/// Every `before_call` advances the shared gauge by the resolved
/// increment, formats the display label, and pushes both to the UI
/// surface with a forced refresh, so the user sees the label before a
/// potentially slow stage body starts, not after.
pub struct ProgressObserver {
    spec: StageSpec,
    gauge: Arc<ProgressGauge>,
    surface: Arc<dyn UiSurface>,
    /// Ordinal of the next item, starting at 1. Dies with the observer.
    next_item: AtomicU32,
}

impl ProgressObserver {
    /// Creates an observer for a resolved stage spec.
    #[must_use]
    pub fn new(spec: StageSpec, gauge: Arc<ProgressGauge>, surface: Arc<dyn UiSurface>) -> Self {
        Self {
            spec,
            gauge,
            surface,
            next_item: AtomicU32::new(1),
        }
    }

    /// The resolved spec this observer reports for.
    #[must_use]
    pub fn spec(&self) -> &StageSpec {
        &self.spec
    }

    fn display_label(&self) -> String {
        match self.spec.mode {
            StageMode::PerItem => {
                let ordinal = self.next_item.fetch_add(1, Ordering::SeqCst);
                format!("File #{ordinal}: {}", self.spec.label)
            }
            StageMode::PerBatch => self.spec.label.clone(),
        }
    }
}

impl fmt::Debug for ProgressObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressObserver")
            .field("spec", &self.spec)
            .field("next_item", &self.next_item)
            .finish()
    }
}

#[async_trait]
impl StageObserver for ProgressObserver {
    async fn before_call(&self, call: &StageCall) {
        let value = self.gauge.advance(self.spec.increment);
        let label = self.display_label();
        self.surface.set_progress(value);
        self.surface.set_label(&label);
        self.surface.refresh();
        debug!(
            stage = %call.stage,
            run_id = %call.identity.run_id,
            progress = value,
            "stage invocation starting"
        );
    }

    async fn after_call(&self, call: &StageCall, outcome: &StageOutcome) {
        match outcome {
            StageOutcome::Completed => {
                trace!(stage = %call.stage, run_id = %call.identity.run_id, "stage invocation completed");
            }
            StageOutcome::Failed(message) => {
                debug!(
                    stage = %call.stage,
                    run_id = %call.identity.run_id,
                    error = %message,
                    "stage invocation failed"
                );
            }
        }
    }
}

/// The per-run set of stage observers, keyed by stage slot.
///
/// Built fresh for every run and dropped at teardown. A dropped rig is
/// the uninstalled state: there is no restore step, so re-running can
/// never double-instrument a stage.
pub struct ObserverRig {
    identity: RunIdentity,
    observers: HashMap<StageId, Arc<dyn StageObserver>>,
}

impl ObserverRig {
    /// Builds one [`ProgressObserver`] per weight entry, resolved against
    /// the run's item count.
    #[must_use]
    pub fn build(
        weights: &[StageWeight],
        n_items: usize,
        gauge: &Arc<ProgressGauge>,
        surface: &Arc<dyn UiSurface>,
        identity: RunIdentity,
    ) -> Self {
        let observers = weights
            .iter()
            .map(|weight| {
                let spec = weight.resolve(n_items);
                let observer: Arc<dyn StageObserver> = Arc::new(ProgressObserver::new(
                    spec,
                    Arc::clone(gauge),
                    Arc::clone(surface),
                ));
                (weight.stage, observer)
            })
            .collect();
        Self {
            identity,
            observers,
        }
    }

    /// A rig with no stages instrumented.
    #[must_use]
    pub fn empty(identity: RunIdentity) -> Self {
        Self {
            identity,
            observers: HashMap::new(),
        }
    }

    /// Replaces or installs the observer for one stage slot.
    #[must_use]
    pub fn with_observer(mut self, stage: StageId, observer: Arc<dyn StageObserver>) -> Self {
        self.observers.insert(stage, observer);
        self
    }

    /// Identity of the run this rig belongs to.
    #[must_use]
    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Creates a call context for a stage of this run.
    #[must_use]
    pub fn stage_call(&self, stage: StageId) -> StageCall {
        StageCall::new(stage, self.identity.clone())
    }

    /// The observer bound to a stage slot, if any.
    #[must_use]
    pub fn observer(&self, stage: StageId) -> Option<&Arc<dyn StageObserver>> {
        self.observers.get(&stage)
    }

    /// Notifies the stage's observer that its body is about to run.
    pub async fn notify_before(&self, call: &StageCall) {
        if let Some(observer) = self.observers.get(&call.stage) {
            observer.before_call(call).await;
        }
    }

    /// Notifies the stage's observer of the invocation's outcome.
    pub async fn notify_after(&self, call: &StageCall, outcome: &StageOutcome) {
        if let Some(observer) = self.observers.get(&call.stage) {
            observer.after_call(call, outcome).await;
        }
    }

    /// Number of instrumented stage slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if no stage is instrumented.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverRig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRig")
            .field("run_id", &self.identity.run_id)
            .field("stages", &self.observers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::default_weights;
    use crate::ui::{CollectingSurface, SurfaceUpdate};
    use pretty_assertions::assert_eq;

    fn rig_with_collecting_surface(n_items: usize) -> (ObserverRig, Arc<CollectingSurface>) {
        let gauge = Arc::new(ProgressGauge::new());
        let collecting = Arc::new(CollectingSurface::new());
        let surface: Arc<dyn UiSurface> = collecting.clone();
        let rig = ObserverRig::build(
            &default_weights(),
            n_items,
            &gauge,
            &surface,
            RunIdentity::new(),
        );
        (rig, collecting)
    }

    #[tokio::test]
    async fn test_rig_builds_one_observer_per_stage() {
        let (rig, _surface) = rig_with_collecting_surface(2);
        assert_eq!(rig.len(), 4);
        for stage in StageId::ALL {
            assert!(rig.observer(stage).is_some());
        }
    }

    #[tokio::test]
    async fn test_before_call_pushes_progress_label_refresh_in_order() {
        let (rig, surface) = rig_with_collecting_surface(2);

        let call = rig.stage_call(StageId::Initialize).with_item("a.png");
        rig.notify_before(&call).await;

        assert_eq!(
            surface.updates(),
            vec![
                SurfaceUpdate::Progress(2),
                SurfaceUpdate::Label("File #1: Initializing image...".to_string()),
                SurfaceUpdate::Refresh,
            ]
        );
    }

    #[tokio::test]
    async fn test_per_item_ordinals_count_up() {
        let (rig, surface) = rig_with_collecting_surface(3);

        let call = rig.stage_call(StageId::FlowField);
        for _ in 0..3 {
            rig.notify_before(&call).await;
        }

        let labels = surface.labels();
        assert_eq!(
            labels,
            vec![
                "File #1: Generating diffeomorphic flow field...",
                "File #2: Generating diffeomorphic flow field...",
                "File #3: Generating diffeomorphic flow field...",
            ]
        );
    }

    #[tokio::test]
    async fn test_per_batch_label_is_verbatim() {
        let (rig, surface) = rig_with_collecting_surface(2);

        let call = rig.stage_call(StageId::Save);
        rig.notify_before(&call).await;

        assert_eq!(
            surface.labels(),
            vec!["Saving files (do not close window!)..."]
        );
    }

    #[tokio::test]
    async fn test_fresh_rigs_restart_ordinals() {
        let (first, surface) = rig_with_collecting_surface(2);
        let call = first.stage_call(StageId::Initialize);
        first.notify_before(&call).await;
        first.notify_before(&call).await;
        drop(first);
        surface.clear();

        let (second, surface) = rig_with_collecting_surface(2);
        let call = second.stage_call(StageId::Initialize);
        second.notify_before(&call).await;

        assert_eq!(surface.labels(), vec!["File #1: Initializing image..."]);
    }

    #[tokio::test]
    async fn test_after_call_pushes_nothing() {
        let (rig, surface) = rig_with_collecting_surface(1);

        let call = rig.stage_call(StageId::Interpolate);
        rig.notify_after(&call, &StageOutcome::Completed).await;
        rig.notify_after(&call, &StageOutcome::Failed("boom".into()))
            .await;

        assert!(surface.is_empty());
    }

    #[tokio::test]
    async fn test_empty_rig_ignores_notifications() {
        let rig = ObserverRig::empty(RunIdentity::new());
        assert!(rig.is_empty());

        let call = rig.stage_call(StageId::Save);
        rig.notify_before(&call).await;
        rig.notify_after(&call, &StageOutcome::Completed).await;
    }
}
