//! Run request and options collected from the front-end.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default maximum distortion applied by the warp.
pub const DEFAULT_MAX_DISTORTION: u32 = 80;

/// Default number of morph steps.
pub const DEFAULT_STEPS: u32 = 20;

/// Numeric and boolean knobs passed through to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Maximum distortion of the flow field.
    pub max_distortion: u32,
    /// Number of interpolation steps.
    pub steps: u32,
    /// Whether every intermediate step is written out.
    pub save_each_step: bool,
    /// Whether images are upscaled before warping.
    pub upscale: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_distortion: DEFAULT_MAX_DISTORTION,
            steps: DEFAULT_STEPS,
            save_each_step: false,
            upscale: true,
        }
    }
}

impl RunOptions {
    /// Creates options with the default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum distortion.
    #[must_use]
    pub fn with_max_distortion(mut self, max_distortion: u32) -> Self {
        self.max_distortion = max_distortion;
        self
    }

    /// Sets the step count.
    #[must_use]
    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Sets whether intermediate steps are saved.
    #[must_use]
    pub fn with_save_each_step(mut self, save_each_step: bool) -> Self {
        self.save_each_step = save_each_step;
        self
    }

    /// Sets the upscale flag from the front-end's inverted checkbox.
    #[must_use]
    pub fn with_disable_upscaling(mut self, disable: bool) -> Self {
        self.upscale = !disable;
        self
    }
}

/// One batch-transform request, as assembled from the front-end fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    /// Input image paths.
    pub inputs: Vec<PathBuf>,
    /// Output folder, if one was selected.
    pub output: Option<PathBuf>,
    /// Pipeline knobs.
    pub options: RunOptions,
}

impl RunRequest {
    /// Creates a request with default options.
    pub fn new(
        inputs: impl IntoIterator<Item = impl Into<PathBuf>>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: Some(output.into()),
            options: RunOptions::default(),
        }
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of input items in the batch.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.inputs.len()
    }

    /// Checks the run preconditions: at least one input and exactly one
    /// output target.
    ///
    /// # Errors
    ///
    /// Returns the precondition error whose `Display` form is shown to
    /// the user.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.inputs.is_empty(), self.output.is_none()) {
            (true, true) => Err(ValidationError::MissingInputsAndOutput),
            (true, false) => Err(ValidationError::MissingInputs),
            (false, true) => Err(ValidationError::MissingOutput),
            (false, false) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let options = RunOptions::default();
        assert_eq!(options.max_distortion, 80);
        assert_eq!(options.steps, 20);
        assert!(!options.save_each_step);
        assert!(options.upscale);
    }

    #[test]
    fn test_disable_upscaling_is_inverted() {
        let options = RunOptions::new().with_disable_upscaling(true);
        assert!(!options.upscale);

        let options = RunOptions::new().with_disable_upscaling(false);
        assert!(options.upscale);
    }

    #[test]
    fn test_validate_ok() {
        let request = RunRequest::new(["a.png"], "out");
        assert!(request.validate().is_ok());
        assert_eq!(request.item_count(), 1);
    }

    #[test]
    fn test_validate_missing_inputs() {
        let request = RunRequest::new(Vec::<PathBuf>::new(), "out");
        assert_eq!(request.validate(), Err(ValidationError::MissingInputs));
    }

    #[test]
    fn test_validate_missing_output() {
        let request = RunRequest {
            inputs: vec![PathBuf::from("a.png")],
            output: None,
            options: RunOptions::default(),
        };
        assert_eq!(request.validate(), Err(ValidationError::MissingOutput));
    }

    #[test]
    fn test_validate_missing_both() {
        let request = RunRequest::default();
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingInputsAndOutput)
        );
    }

    #[test]
    fn test_request_roundtrip() {
        let request = RunRequest::new(["a.png", "b.png"], "out")
            .with_options(RunOptions::new().with_steps(10));
        let json = serde_json::to_string(&request).unwrap();
        let deserialized: RunRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, deserialized);
    }
}
