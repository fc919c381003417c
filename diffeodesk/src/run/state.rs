//! Run state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of the orchestrator.
///
/// Transitions: `Idle → Validating → Running → {Succeeded, Failed} →
/// Idle`. A precondition failure short-circuits `Validating → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run in flight.
    Idle,
    /// Checking run preconditions.
    Validating,
    /// The pipeline is executing.
    Running,
    /// The pipeline returned normally.
    Succeeded,
    /// The pipeline failed.
    Failed,
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl RunState {
    /// Returns true while a run occupies the orchestrator.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Validating | Self::Running)
    }

    /// Returns true for the post-run states before returning to idle.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}
