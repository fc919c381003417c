//! Stage weight table and per-run increment resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an instrumented pipeline stage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    /// Image loading and normalization.
    Initialize,
    /// Diffeomorphic flow-field generation.
    FlowField,
    /// Image interpolation along the flow field.
    Interpolate,
    /// Writing the batch's outputs to disk.
    Save,
}

impl StageId {
    /// All instrumented stage slots, in pipeline order.
    pub const ALL: [Self; 4] = [
        Self::Initialize,
        Self::FlowField,
        Self::Interpolate,
        Self::Save,
    ];

    /// Stable string form used in logs and serialized data.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::FlowField => "flow_field",
            Self::Interpolate => "interpolate",
            Self::Save => "save",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution mode of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageMode {
    /// Invoked once per input item.
    PerItem,
    /// Invoked once for the whole batch.
    PerBatch,
}

impl StageMode {
    /// Returns true for the per-item mode.
    #[must_use]
    pub fn is_per_item(self) -> bool {
        matches!(self, Self::PerItem)
    }
}

impl fmt::Display for StageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerItem => write!(f, "per_item"),
            Self::PerBatch => write!(f, "per_batch"),
        }
    }
}

/// One stage's share of the progress budget.
///
/// Weights across a run's stages are a configuration contract: they are
/// chosen to sum to at most 100 and the model does not enforce the sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWeight {
    /// The stage this entry configures.
    pub stage: StageId,
    /// Share of the total progress budget (0-100).
    pub weight: u32,
    /// Whether the stage runs per item or per batch.
    pub mode: StageMode,
    /// Label template shown while the stage runs.
    pub label: String,
}

impl StageWeight {
    /// Creates a per-item weight entry.
    #[must_use]
    pub fn per_item(stage: StageId, weight: u32, label: impl Into<String>) -> Self {
        Self {
            stage,
            weight,
            mode: StageMode::PerItem,
            label: label.into(),
        }
    }

    /// Creates a per-batch weight entry.
    #[must_use]
    pub fn per_batch(stage: StageId, weight: u32, label: impl Into<String>) -> Self {
        Self {
            stage,
            weight,
            mode: StageMode::PerBatch,
            label: label.into(),
        }
    }

    /// Resolves this entry against the run's item count.
    ///
    /// Per-item stages get `increment = weight / n_items` (floor), so
    /// their total contribution over the run is at most `weight`; the
    /// rounding loss is masked on the success path by forcing the gauge
    /// to its maximum. Per-batch stages get the full weight once.
    ///
    /// Callers guarantee `n_items >= 1`; the orchestrator rejects empty
    /// batches before any weight is resolved.
    #[must_use]
    pub fn resolve(&self, n_items: usize) -> StageSpec {
        let increment = match self.mode {
            StageMode::PerItem => self.weight / n_items as u32,
            StageMode::PerBatch => self.weight,
        };
        StageSpec {
            stage: self.stage,
            increment,
            mode: self.mode,
            label: self.label.clone(),
        }
    }
}

/// Per-run resolved stage descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    /// The stage this spec describes.
    pub stage: StageId,
    /// Gauge increment applied per invocation.
    pub increment: u32,
    /// Whether the stage runs per item or per batch.
    pub mode: StageMode,
    /// Label template shown while the stage runs.
    pub label: String,
}

/// The default weight table for the diffeomorph pipeline.
///
/// Initialization, flow-field generation, and interpolation run once per
/// input item; saving runs once for the batch. The weights sum to 100.
#[must_use]
pub fn default_weights() -> Vec<StageWeight> {
    vec![
        StageWeight::per_item(StageId::Initialize, 5, "Initializing image..."),
        StageWeight::per_item(
            StageId::FlowField,
            25,
            "Generating diffeomorphic flow field...",
        ),
        StageWeight::per_item(
            StageId::Interpolate,
            65,
            "Interpolating image (this may take a while; do not close window!)...",
        ),
        StageWeight::per_batch(StageId::Save, 5, "Saving files (do not close window!)..."),
    ]
}
