//! Request fixtures.

use crate::config::RunRequest;
use std::path::PathBuf;

/// Fabricated input paths `image_001.png` through `image_{n:03}.png`.
///
/// The paths do not exist on disk; pair them with
/// [`ScriptedPipeline::new`] (which never touches the filesystem) or
/// create real files when testing the verifying variant.
///
/// [`ScriptedPipeline::new`]: crate::testing::ScriptedPipeline::new
#[must_use]
pub fn fake_inputs(n: usize) -> Vec<PathBuf> {
    (1..=n)
        .map(|i| PathBuf::from(format!("image_{i:03}.png")))
        .collect()
}

/// A valid request with `n` fabricated inputs and an output folder.
#[must_use]
pub fn batch_request(n: usize) -> RunRequest {
    RunRequest::new(fake_inputs(n), "out")
}
