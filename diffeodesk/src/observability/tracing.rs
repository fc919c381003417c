//! Tracing setup and run timing.

use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber from `RUST_LOG`, defaulting
/// to `info` when the variable is unset.
///
/// Intended for binary front-ends embedding this crate. Calling it more
/// than once is harmless; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Wall-clock timer for one run, reported in tracing events.
#[derive(Debug)]
pub struct RunTimer {
    started: Instant,
}

impl RunTimer {
    /// Starts timing.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_timer_is_monotonic() {
        let timer = RunTimer::start();
        let first = timer.elapsed_ms();
        let second = timer.elapsed_ms();
        assert!(second >= first);
        assert!(first >= 0.0);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
        // Should not panic
    }
}
