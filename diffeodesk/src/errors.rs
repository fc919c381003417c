//! Error types for the diffeodesk control layer.
//!
//! Two taxonomies exist on purpose: precondition errors are detected
//! before a run mutates any state, pipeline errors are raised by the
//! external pipeline while a run is in flight. Only the missing-file
//! class of pipeline error is ever recovered by the orchestrator.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Precondition errors for a run request.
///
/// The `Display` form of each variant is the user-visible message shown
/// on the front-end's error line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// Neither inputs nor an output target were supplied.
    #[error("ERROR: One or more files/folders must be supplied as an input; exactly one folder must be supplied as an output")]
    MissingInputsAndOutput,

    /// The input list is empty.
    #[error("ERROR: One or more files/folders must be supplied as an input")]
    MissingInputs,

    /// No output folder was supplied.
    #[error("ERROR: Exactly one folder must be supplied as an output")]
    MissingOutput,
}

/// Failures raised by the pipeline collaborator during a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more input paths do not exist.
    ///
    /// The only failure class the orchestrator recovers from: it clears
    /// the path fields and surfaces a message instead of propagating.
    #[error("one or more files not found: {}", format_paths(.paths))]
    MissingFiles {
        /// The paths that could not be found.
        paths: Vec<PathBuf>,
    },

    /// A stage failed for a reason other than a missing file.
    #[error("stage '{stage}' failed: {message}")]
    Stage {
        /// The stage that failed.
        stage: String,
        /// What went wrong.
        message: String,
    },

    /// IO error outside any particular stage.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Creates a missing-files error.
    #[must_use]
    pub fn missing_files(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self::MissingFiles {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a stage failure.
    #[must_use]
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is the recovered missing-file class.
    #[must_use]
    pub fn is_missing_files(&self) -> bool {
        matches!(self, Self::MissingFiles { .. })
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        assert!(ValidationError::MissingInputs
            .to_string()
            .starts_with("ERROR: One or more files/folders"));
        assert!(ValidationError::MissingOutput
            .to_string()
            .starts_with("ERROR: Exactly one folder"));
        assert!(ValidationError::MissingInputsAndOutput
            .to_string()
            .contains("exactly one folder must be supplied as an output"));
    }

    #[test]
    fn test_validation_error_serialize() {
        let json = serde_json::to_string(&ValidationError::MissingInputs).unwrap();
        assert_eq!(json, r#""missing_inputs""#);
    }

    #[test]
    fn test_missing_files_classification() {
        let err = PipelineError::missing_files(["a.png", "b.png"]);
        assert!(err.is_missing_files());
        assert!(err.to_string().contains("a.png"));

        let err = PipelineError::stage("interpolate", "out of memory");
        assert!(!err.is_missing_files());
        assert!(err.to_string().contains("interpolate"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PipelineError::from(io);
        assert!(!err.is_missing_files());
    }
}
