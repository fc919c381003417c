//! Per-run identity for correlating progress events.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one run of the pipeline.
///
/// A fresh identity is generated each time the orchestrator enters
/// `Running`; it is carried in every stage-call context and tracing event
/// so the events of overlapping log files can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this run.
    pub run_id: Uuid,
    /// When the run started (ISO 8601).
    pub started_at: String,
}

impl RunIdentity {
    /// Creates a new identity with a generated run ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now().to_rfc3339(),
        }
    }

    /// Creates an identity with a specific run ID.
    #[must_use]
    pub fn with_run_id(run_id: Uuid) -> Self {
        Self {
            run_id,
            started_at: Utc::now().to_rfc3339(),
        }
    }

    /// Returns the run ID as a string.
    #[must_use]
    pub fn run_id_str(&self) -> String {
        self.run_id.to_string()
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}
